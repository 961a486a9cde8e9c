pub mod commands;
pub mod filter;

use chrono::{NaiveDate, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    db::models::{LogEntry, User, WorkTag},
    error::{AppError, AppResult},
    session::ensure_owner,
    store::EntityStore,
};

const KIND: &str = "log";

/// Form input for a new entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLog {
    pub date: NaiveDate,
    pub content: String,
    pub tag: WorkTag,
    pub campaign_id: Option<String>,
}

fn validated_content(content: &str) -> AppResult<String> {
    let content = content.trim();
    if content.is_empty() {
        return Err(AppError::Validation("log content must not be empty".into()));
    }
    Ok(content.to_string())
}

/// Daily activity entries as the views see them.
#[derive(Clone)]
pub struct LogBook {
    store: EntityStore<LogEntry>,
}

impl LogBook {
    pub fn new(store: EntityStore<LogEntry>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &EntityStore<LogEntry> {
        &self.store
    }

    pub async fn day(&self, day: NaiveDate) -> Vec<LogEntry> {
        filter::for_day(&self.store.list_visible().await, day)
    }

    pub async fn create(&self, user: &User, input: NewLog) -> AppResult<LogEntry> {
        let entry = LogEntry {
            id: Uuid::new_v4().simple().to_string(),
            user_id: user.id.clone(),
            user_name: user.display_name.clone(),
            date: input.date,
            content: validated_content(&input.content)?,
            tag: input.tag,
            created_at: Utc::now().trunc_subsecs(3),
            campaign_id: input.campaign_id.filter(|id| !id.trim().is_empty()),
            is_deleted: false,
        };

        self.store.upsert(entry.clone()).await?;
        Ok(entry)
    }

    /// Changes content and/or tag of a visible entry. Id, day, creation time,
    /// and owner stay.
    pub async fn edit(
        &self,
        user: &User,
        id: &str,
        content: Option<String>,
        tag: Option<WorkTag>,
    ) -> AppResult<LogEntry> {
        let mut entry = self.find(id).await?;
        if entry.is_deleted {
            return Err(not_found(id));
        }
        ensure_owner(user, &entry, KIND)?;

        if let Some(content) = content {
            entry.content = validated_content(&content)?;
        }
        if let Some(tag) = tag {
            entry.tag = tag;
        }
        entry.user_name = user.display_name.clone();

        self.store.upsert(entry.clone()).await?;
        Ok(entry)
    }

    pub async fn hide(&self, user: &User, id: &str) -> AppResult<()> {
        let entry = self.find(id).await?;
        ensure_owner(user, &entry, KIND)?;
        self.store.hide(id).await?;
        Ok(())
    }

    async fn find(&self, id: &str) -> AppResult<LogEntry> {
        self.store.get(id).await?.ok_or_else(|| not_found(id))
    }
}

fn not_found(id: &str) -> AppError {
    AppError::NotFound {
        kind: KIND,
        id: id.to_string(),
    }
}
