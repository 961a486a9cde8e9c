//! Optional natural-language summaries over the logged data.
//!
//! Every call resolves to text. Failures and a missing backend turn into
//! fixed fallback messages so they can never block the CRUD paths.

pub mod commands;
pub mod gemini;
mod prompts;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use log::{error, info};

use crate::{
    db::models::{Campaign, LogEntry},
    logs::filter::most_recent,
    settings::AdvisorSettings,
};

pub use gemini::GeminiAdvisor;

/// How many recent entries the deep analysis looks at.
pub const ANALYSIS_LOG_LIMIT: usize = 20;

pub const NO_ENTRIES: &str = "There are no entries for this day yet.";
pub const SUMMARY_EMPTY: &str = "The summary could not be produced.";
pub const SUMMARY_UNAVAILABLE: &str = "The AI summary is unavailable right now.";
pub const ANALYSIS_EMPTY: &str = "The analysis report could not be produced.";
pub const ANALYSIS_UNAVAILABLE: &str = "The deep analysis cannot be run right now.";

/// A text generation backend.
#[async_trait]
pub trait TextAdvisor: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

#[derive(Clone)]
pub struct Advisor {
    backend: Option<Arc<dyn TextAdvisor>>,
    language: String,
}

impl Advisor {
    pub fn new(backend: Option<Arc<dyn TextAdvisor>>, language: impl Into<String>) -> Self {
        Self {
            backend,
            language: language.into(),
        }
    }

    /// Builds the HTTP backend when enabled and a key is available.
    pub fn from_settings(settings: &AdvisorSettings, api_key: Option<String>) -> Result<Self> {
        let backend: Option<Arc<dyn TextAdvisor>> = match api_key {
            Some(key) if settings.enabled => {
                Some(Arc::new(GeminiAdvisor::new(settings, key)?) as Arc<dyn TextAdvisor>)
            }
            Some(_) => {
                info!("Advisor disabled in settings");
                None
            }
            None => {
                info!("No advisor API key configured; summaries will use fallback text");
                None
            }
        };
        Ok(Self::new(backend, settings.language.clone()))
    }

    pub fn is_configured(&self) -> bool {
        self.backend.is_some()
    }

    /// Short digest of one day's entries.
    pub async fn summarize(&self, logs: &[LogEntry], day: NaiveDate) -> String {
        if logs.is_empty() {
            return NO_ENTRIES.to_string();
        }
        let prompt = prompts::daily_summary(logs, day, &self.language);
        self.ask(&prompt, SUMMARY_EMPTY, SUMMARY_UNAVAILABLE).await
    }

    /// Advisory report over the most recent entries and the given campaigns.
    pub async fn analyze(&self, logs: &[LogEntry], campaigns: &[Campaign]) -> String {
        let recent = most_recent(logs, ANALYSIS_LOG_LIMIT);
        let prompt = prompts::deep_analysis(&recent, campaigns, &self.language);
        self.ask(&prompt, ANALYSIS_EMPTY, ANALYSIS_UNAVAILABLE).await
    }

    async fn ask(&self, prompt: &str, empty: &str, unavailable: &str) -> String {
        let Some(backend) = &self.backend else {
            return unavailable.to_string();
        };

        match backend.generate(prompt).await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => empty.to_string(),
            Err(err) => {
                error!("Advisor request failed: {err:#}");
                unavailable.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use anyhow::anyhow;
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::db::models::WorkTag;

    #[derive(Default)]
    struct Recording {
        prompts: Mutex<Vec<String>>,
        reply: String,
    }

    #[async_trait]
    impl TextAdvisor for Recording {
        async fn generate(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.reply.clone())
        }
    }

    struct Failing;

    #[async_trait]
    impl TextAdvisor for Failing {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            Err(anyhow!("connection reset"))
        }
    }

    fn log(i: i64) -> LogEntry {
        LogEntry {
            id: format!("l{i}"),
            user_id: "u".into(),
            user_name: "Ayse".into(),
            date: NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
            content: format!("task-{i:02}"),
            tag: WorkTag::Advertising,
            created_at: Utc.timestamp_millis_opt(i).unwrap(),
            campaign_id: None,
            is_deleted: false,
        }
    }

    fn advisor_with<B: TextAdvisor + 'static>(backend: Arc<B>) -> Advisor {
        let backend: Arc<dyn TextAdvisor> = backend;
        Advisor::new(Some(backend), "English")
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    #[tokio::test]
    async fn empty_day_skips_the_backend() {
        let backend = Arc::new(Recording::default());
        let advisor = advisor_with(backend.clone());

        assert_eq!(advisor.summarize(&[], day()).await, NO_ENTRIES);
        assert!(backend.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn summary_prompt_lists_entries() {
        let backend = Arc::new(Recording {
            reply: "  Great day.  ".into(),
            ..Default::default()
        });
        let advisor = advisor_with(backend.clone());

        assert_eq!(advisor.summarize(&[log(1)], day()).await, "Great day.");
        let prompts = backend.prompts.lock().unwrap();
        assert!(prompts[0].contains("Ayse: task-01 (Reklam)"));
        assert!(prompts[0].contains("Language: English"));
    }

    #[tokio::test]
    async fn failures_fall_back_to_fixed_text() {
        let failing = advisor_with(Arc::new(Failing));
        assert_eq!(failing.summarize(&[log(1)], day()).await, SUMMARY_UNAVAILABLE);
        assert_eq!(failing.analyze(&[log(1)], &[]).await, ANALYSIS_UNAVAILABLE);

        let absent = Advisor::new(None, "English");
        assert!(!absent.is_configured());
        assert_eq!(absent.summarize(&[log(1)], day()).await, SUMMARY_UNAVAILABLE);

        let silent = advisor_with(Arc::new(Recording::default()));
        assert_eq!(silent.summarize(&[log(1)], day()).await, SUMMARY_EMPTY);
        assert_eq!(silent.analyze(&[], &[]).await, ANALYSIS_EMPTY);
    }

    #[tokio::test]
    async fn analysis_uses_only_recent_entries() {
        let backend = Arc::new(Recording {
            reply: "Focus on launches.".into(),
            ..Default::default()
        });
        let advisor = advisor_with(backend.clone());
        let logs: Vec<_> = (0..30).map(log).collect();

        assert_eq!(advisor.analyze(&logs, &[]).await, "Focus on launches.");
        let prompt = backend.prompts.lock().unwrap()[0].clone();
        assert!(prompt.contains("task-29"));
        assert!(prompt.contains("task-10"));
        assert!(!prompt.contains("task-09"));
    }
}
