use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock};

/// Environment variables checked, in order, for the advisory API key.
pub const API_KEY_VARS: [&str; 2] = ["WORKLOG_API_KEY", "GEMINI_API_KEY"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdvisorSettings {
    pub enabled: bool,
    pub model: String,
    /// Language the summaries are written in.
    pub language: String,
    pub endpoint: String,
    pub thinking_budget: u32,
}

impl Default for AdvisorSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            model: "gemini-3-pro-preview".into(),
            language: "Turkish".into(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta".into(),
            thinking_budget: 32_768,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct UserSettings {
    advisor: AdvisorSettings,
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                warn!("Settings at {} are unreadable, using defaults: {err}", path.display());
                UserSettings::default()
            })
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn advisor(&self) -> AdvisorSettings {
        match self.data.read() {
            Ok(guard) => guard.advisor.clone(),
            Err(poisoned) => poisoned.into_inner().advisor.clone(),
        }
    }

    pub fn update_advisor(&self, settings: AdvisorSettings) -> Result<()> {
        let mut guard = match self.data.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let mut next = guard.clone();
        next.advisor = settings;
        self.persist(&next)?;
        *guard = next;
        Ok(())
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, serialized)
            .with_context(|| format!("Failed to write settings to {}", staging.display()))?;
        fs::rename(&staging, &self.path)
            .with_context(|| format!("Failed to replace settings at {}", self.path.display()))
    }
}

/// First non-empty API key found in the environment.
pub fn api_key_from_env() -> Option<String> {
    API_KEY_VARS
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}
