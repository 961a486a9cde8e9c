//! Daily activity entries.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::db::helpers::deleted_flag;

/// Work category. Serialized with the labels the team sees in the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkTag {
    #[default]
    #[serde(rename = "Reklam", alias = "ADVERTISING")]
    Advertising,
    #[serde(rename = "Tasarım", alias = "DESIGN")]
    Design,
}

impl WorkTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkTag::Advertising => "Reklam",
            WorkTag::Design => "Tasarım",
        }
    }
}

impl fmt::Display for WorkTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub date: NaiveDate,
    pub content: String,
    pub tag: WorkTag,
    /// Set once at creation; edits keep it.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign_id: Option<String>,
    #[serde(default, deserialize_with = "deleted_flag")]
    pub is_deleted: bool,
}
