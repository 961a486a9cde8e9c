pub mod commands;

use log::info;
use serde::Serialize;

use crate::{
    db::models::{Campaign, LogEntry, User},
    error::{AppError, AppResult},
    session::ensure_owner,
    store::{EntityStore, Record},
};

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BinContents {
    pub logs: Vec<LogEntry>,
    pub campaigns: Vec<Campaign>,
}

impl BinContents {
    pub fn is_empty(&self) -> bool {
        self.logs.is_empty() && self.campaigns.is_empty()
    }
}

/// Hidden records of both collections, with restore and permanent delete.
#[derive(Clone)]
pub struct RecycleBin {
    logs: EntityStore<LogEntry>,
    campaigns: EntityStore<Campaign>,
}

impl RecycleBin {
    pub fn new(logs: EntityStore<LogEntry>, campaigns: EntityStore<Campaign>) -> Self {
        Self { logs, campaigns }
    }

    pub async fn contents(&self) -> BinContents {
        BinContents {
            logs: self.logs.list_hidden().await,
            campaigns: self.campaigns.list_hidden().await,
        }
    }

    pub async fn restore_log(&self, id: &str) -> AppResult<()> {
        restore(&self.logs, id, "log").await
    }

    pub async fn restore_campaign(&self, id: &str) -> AppResult<()> {
        restore(&self.campaigns, id, "campaign").await
    }

    pub async fn purge_log(&self, user: &User, id: &str) -> AppResult<()> {
        purge(&self.logs, user, id, "log").await
    }

    pub async fn purge_campaign(&self, user: &User, id: &str) -> AppResult<()> {
        purge(&self.campaigns, user, id, "campaign").await
    }
}

/// Looks a record up for a bin action. `Ok(None)` means it is no longer in
/// storage at all; a record that exists but is not hidden is not in the bin.
async fn find_in_bin<T: Record>(
    store: &EntityStore<T>,
    id: &str,
    kind: &'static str,
) -> AppResult<Option<T>> {
    match store.get(id).await? {
        Some(record) if !record.is_deleted() => Err(AppError::NotFound {
            kind,
            id: id.to_string(),
        }),
        found => Ok(found),
    }
}

async fn restore<T: Record>(store: &EntityStore<T>, id: &str, kind: &'static str) -> AppResult<()> {
    if find_in_bin(store, id, kind).await?.is_some() {
        store.restore(id).await?;
    }
    Ok(())
}

async fn purge<T: Record>(
    store: &EntityStore<T>,
    user: &User,
    id: &str,
    kind: &'static str,
) -> AppResult<()> {
    let Some(record) = find_in_bin(store, id, kind).await? else {
        return Ok(());
    };
    ensure_owner(user, &record, kind)?;
    store.purge(id).await?;
    info!("{} permanently deleted {kind} {id}", user.email);
    Ok(())
}
