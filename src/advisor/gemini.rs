use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

use super::TextAdvisor;
use crate::settings::AdvisorSettings;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Google Gemini `generateContent` over REST.
pub struct GeminiAdvisor {
    http_client: HttpClient,
    endpoint: String,
    model: String,
    api_key: String,
    thinking_budget: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    thinking_config: ThinkingConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ResponseContent {
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ResponsePart {
    text: Option<String>,
    /// Thought summaries are not part of the answer.
    thought: bool,
}

impl GenerateResponse {
    /// Concatenated answer text of the first candidate.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter(|part| !part.thought)
                    .filter_map(|part| part.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

impl GeminiAdvisor {
    pub fn new(settings: &AdvisorSettings, api_key: String) -> Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            http_client,
            endpoint: settings.endpoint.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            api_key,
            thinking_budget: settings.thinking_budget,
        })
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

#[async_trait]
impl TextAdvisor for GeminiAdvisor {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                thinking_config: ThinkingConfig {
                    thinking_budget: self.thinking_budget,
                },
            },
        };

        let response = self
            .http_client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .with_context(|| format!("request to {} failed", self.model))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("{} returned {status}: {body}", self.model));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .context("invalid generateContent response")?;
        Ok(parsed.text())
    }
}
