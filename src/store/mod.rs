//! Soft-delete collections kept as one JSON array per slot.
//!
//! Every mutation is a read-modify-write of the whole collection inside a
//! single transaction on the database worker, so a reader never sees a half
//! applied change. Listing never fails: a missing or corrupt slot lists as
//! empty. A single record that no longer decodes is skipped on read and
//! written back untouched, so it cannot take the rest of the collection down.

use std::marker::PhantomData;

use log::{error, info, warn};
use rusqlite::Connection;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::db::{
    models::{Campaign, LogEntry},
    repositories::slots::{read_slot, write_slot, CAMPAIGNS_KEY, LOGS_KEY},
    Database,
};

/// A record that can live in an [`EntityStore`].
pub trait Record: Serialize + DeserializeOwned + Clone + Send + 'static {
    /// Slot key holding the collection.
    const SLOT: &'static str;

    fn id(&self) -> &str;
    fn owner_id(&self) -> &str;
    fn is_deleted(&self) -> bool;
    fn set_deleted(&mut self, deleted: bool);
}

impl Record for LogEntry {
    const SLOT: &'static str = LOGS_KEY;

    fn id(&self) -> &str {
        &self.id
    }

    fn owner_id(&self) -> &str {
        &self.user_id
    }

    fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    fn set_deleted(&mut self, deleted: bool) {
        self.is_deleted = deleted;
    }
}

impl Record for Campaign {
    const SLOT: &'static str = CAMPAIGNS_KEY;

    fn id(&self) -> &str {
        &self.id
    }

    fn owner_id(&self) -> &str {
        &self.user_id
    }

    fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    fn set_deleted(&mut self, deleted: bool) {
        self.is_deleted = deleted;
    }
}

/// The record was not saved.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("stored data under '{key}' is unreadable")]
    Corrupt {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode records for '{key}'")]
    Encode {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("storage write failed")]
    Storage(#[from] rusqlite::Error),
    #[error("database unavailable: {0}")]
    Unavailable(String),
}

pub struct EntityStore<T: Record> {
    db: Database,
    _records: PhantomData<fn() -> T>,
}

impl<T: Record> Clone for EntityStore<T> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            _records: PhantomData,
        }
    }
}

/// Decoded contents of a slot.
struct Collection<T> {
    records: Vec<T>,
    /// Entries that no longer decode as `T`; kept verbatim on write.
    unreadable: Vec<Value>,
}

fn load<T: Record>(conn: &Connection) -> Result<Option<Collection<T>>, PersistenceError> {
    let Some(raw) = read_slot(conn, T::SLOT)? else {
        return Ok(None);
    };
    let entries: Vec<Value> =
        serde_json::from_str(&raw).map_err(|source| PersistenceError::Corrupt {
            key: T::SLOT,
            source,
        })?;

    let mut collection = Collection {
        records: Vec::with_capacity(entries.len()),
        unreadable: Vec::new(),
    };
    for entry in entries {
        match T::deserialize(&entry) {
            Ok(record) => collection.records.push(record),
            Err(err) => {
                warn!("Skipping unreadable record in '{}': {err}", T::SLOT);
                collection.unreadable.push(entry);
            }
        }
    }
    Ok(Some(collection))
}

fn save<T: Record>(conn: &Connection, collection: &Collection<T>) -> Result<(), PersistenceError> {
    let encode = |source| PersistenceError::Encode {
        key: T::SLOT,
        source,
    };

    let mut entries = collection
        .records
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()
        .map_err(encode)?;
    entries.extend(collection.unreadable.iter().cloned());

    let encoded = serde_json::to_string(&entries).map_err(encode)?;
    write_slot(conn, T::SLOT, &encoded)?;
    Ok(())
}

fn apply_in_transaction<T, R, F>(
    conn: &mut Connection,
    create_missing: bool,
    apply: F,
) -> Result<Option<R>, PersistenceError>
where
    T: Record,
    F: FnOnce(&mut Vec<T>) -> (R, bool),
{
    let tx = conn.transaction()?;
    let mut collection = match load::<T>(&tx)? {
        Some(collection) => collection,
        None if create_missing => Collection {
            records: Vec::new(),
            unreadable: Vec::new(),
        },
        None => return Ok(None),
    };

    let (result, dirty) = apply(&mut collection.records);
    if dirty {
        save(&tx, &collection)?;
    }
    tx.commit()?;
    Ok(Some(result))
}

impl<T: Record> EntityStore<T> {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            _records: PhantomData,
        }
    }

    /// Every record in storage order, hidden ones included.
    pub async fn list_all(&self) -> Vec<T> {
        match self.load_records().await {
            Ok(records) => records,
            Err(err) => {
                error!("Failed to load '{}', treating as empty: {err}", T::SLOT);
                Vec::new()
            }
        }
    }

    pub async fn list_visible(&self) -> Vec<T> {
        self.list_all()
            .await
            .into_iter()
            .filter(|record| !record.is_deleted())
            .collect()
    }

    pub async fn list_hidden(&self) -> Vec<T> {
        self.list_all()
            .await
            .into_iter()
            .filter(|record| record.is_deleted())
            .collect()
    }

    /// Looks a record up in either scope. Unlike the listings this does not
    /// degrade: a corrupt or unreachable slot is an error, so callers about to
    /// mutate never mistake a broken store for a missing record.
    pub async fn get(&self, id: &str) -> Result<Option<T>, PersistenceError> {
        Ok(self
            .load_records()
            .await?
            .into_iter()
            .find(|record| record.id() == id))
    }

    async fn load_records(&self) -> Result<Vec<T>, PersistenceError> {
        self.db
            .execute(|conn| Ok(load::<T>(conn)))
            .await
            .map_err(|err| PersistenceError::Unavailable(format!("{err:#}")))?
            .map(|loaded| loaded.map(|collection| collection.records).unwrap_or_default())
    }

    /// Replaces the record with the same id in place, or appends it.
    /// Returns `true` when an existing record was replaced.
    pub async fn upsert(&self, record: T) -> Result<bool, PersistenceError> {
        let id = record.id().to_string();
        let replaced = self
            .mutate(true, move |records| {
                match records.iter().position(|existing| existing.id() == record.id()) {
                    Some(index) => {
                        records[index] = record;
                        (true, true)
                    }
                    None => {
                        records.push(record);
                        (false, true)
                    }
                }
            })
            .await?
            .unwrap_or(false);

        info!(
            "{} record {id} in '{}'",
            if replaced { "Updated" } else { "Inserted" },
            T::SLOT
        );
        Ok(replaced)
    }

    pub async fn hide(&self, id: &str) -> Result<bool, PersistenceError> {
        self.set_flag(id, true).await
    }

    pub async fn restore(&self, id: &str) -> Result<bool, PersistenceError> {
        self.set_flag(id, false).await
    }

    /// Hides every record. Returns how many were visible before.
    pub async fn hide_all(&self) -> Result<usize, PersistenceError> {
        let flipped = self
            .mutate(false, |records| {
                let mut flipped = 0;
                for record in records.iter_mut().filter(|record| !record.is_deleted()) {
                    record.set_deleted(true);
                    flipped += 1;
                }
                (flipped, flipped > 0)
            })
            .await?
            .unwrap_or(0);

        info!("Hid {flipped} record(s) in '{}'", T::SLOT);
        Ok(flipped)
    }

    /// Removes the record for good. A second purge of the same id is a no-op.
    pub async fn purge(&self, id: &str) -> Result<bool, PersistenceError> {
        let target = id.to_string();
        let removed = self
            .mutate(false, move |records| {
                let before = records.len();
                records.retain(|record| record.id() != target);
                let removed = records.len() != before;
                (removed, removed)
            })
            .await?
            .unwrap_or(false);

        if removed {
            info!("Purged record {id} from '{}'", T::SLOT);
        }
        Ok(removed)
    }

    async fn set_flag(&self, id: &str, deleted: bool) -> Result<bool, PersistenceError> {
        let target = id.to_string();
        let changed = self
            .mutate(false, move |records| {
                match records.iter_mut().find(|record| record.id() == target) {
                    Some(record) => {
                        record.set_deleted(deleted);
                        (true, true)
                    }
                    None => (false, false),
                }
            })
            .await?
            .unwrap_or(false);

        if changed {
            info!(
                "{} record {id} in '{}'",
                if deleted { "Hid" } else { "Restored" },
                T::SLOT
            );
        }
        Ok(changed)
    }

    /// Runs `apply` over the full collection inside one transaction and writes
    /// it back when `apply` reports a change. Yields `None` without touching
    /// storage when the slot is absent and `create_missing` is false.
    async fn mutate<R, F>(
        &self,
        create_missing: bool,
        apply: F,
    ) -> Result<Option<R>, PersistenceError>
    where
        F: FnOnce(&mut Vec<T>) -> (R, bool) + Send + 'static,
        R: Send + 'static,
    {
        self.db
            .execute(move |conn| Ok(apply_in_transaction(conn, create_missing, apply)))
            .await
            .map_err(|err| PersistenceError::Unavailable(format!("{err:#}")))?
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};
    use tempfile::TempDir;

    use super::*;
    use crate::db::models::WorkTag;

    fn open() -> (TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("store.sqlite3")).unwrap();
        (dir, db)
    }

    fn entry(id: &str, content: &str) -> LogEntry {
        LogEntry {
            id: id.into(),
            user_id: "owner".into(),
            user_name: "Owner".into(),
            date: NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
            content: content.into(),
            tag: WorkTag::Advertising,
            created_at: Utc.timestamp_millis_opt(100).unwrap(),
            campaign_id: None,
            is_deleted: false,
        }
    }

    fn ids(records: &[LogEntry]) -> Vec<&str> {
        records.iter().map(|r| r.id.as_str()).collect()
    }

    #[tokio::test]
    async fn upsert_replaces_in_place() {
        let (_dir, db) = open();
        let store = EntityStore::<LogEntry>::new(db);

        assert!(!store.upsert(entry("a", "first")).await.unwrap());
        assert!(!store.upsert(entry("b", "second")).await.unwrap());
        assert!(store.upsert(entry("a", "edited")).await.unwrap());

        let visible = store.list_visible().await;
        assert_eq!(ids(&visible), vec!["a", "b"]);
        assert_eq!(visible[0].content, "edited");
    }

    #[tokio::test]
    async fn hide_and_restore_are_inverse() {
        let (_dir, db) = open();
        let store = EntityStore::<LogEntry>::new(db);
        store.upsert(entry("a", "x")).await.unwrap();
        store.upsert(entry("b", "y")).await.unwrap();

        assert!(store.hide("a").await.unwrap());
        assert_eq!(ids(&store.list_visible().await), vec!["b"]);
        assert_eq!(ids(&store.list_hidden().await), vec!["a"]);
        assert!(store.get("a").await.unwrap().unwrap().is_deleted);

        assert!(store.restore("a").await.unwrap());
        assert_eq!(ids(&store.list_visible().await), vec!["a", "b"]);
        assert!(store.list_hidden().await.is_empty());

        assert!(!store.hide("missing").await.unwrap());
    }

    #[tokio::test]
    async fn purge_is_final_and_repeatable() {
        let (_dir, db) = open();
        let store = EntityStore::<LogEntry>::new(db);
        store.upsert(entry("a", "x")).await.unwrap();
        store.hide("a").await.unwrap();

        assert!(store.purge("a").await.unwrap());
        assert!(!store.purge("a").await.unwrap());
        assert!(store.list_all().await.is_empty());
    }

    #[tokio::test]
    async fn mutations_on_missing_slot_are_noops() {
        let (_dir, db) = open();
        let store = EntityStore::<Campaign>::new(db.clone());

        assert!(!store.hide("x").await.unwrap());
        assert!(!store.restore("x").await.unwrap());
        assert!(!store.purge("x").await.unwrap());
        assert_eq!(store.hide_all().await.unwrap(), 0);
        assert_eq!(db.get_slot(CAMPAIGNS_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn missing_flag_reads_as_visible() {
        let (_dir, db) = open();
        db.put_slot(
            LOGS_KEY,
            r#"[{"id":"old","userId":"u","userName":"n","date":"2026-03-10",
                 "content":"legacy","tag":"Reklam","createdAt":5}]"#
                .into(),
        )
        .await
        .unwrap();

        let store = EntityStore::<LogEntry>::new(db.clone());
        assert_eq!(ids(&store.list_visible().await), vec!["old"]);

        store.hide("old").await.unwrap();
        let raw = db.get_slot(LOGS_KEY).await.unwrap().unwrap();
        assert!(raw.contains(r#""isDeleted":true"#));
    }

    #[tokio::test]
    async fn corrupt_slot_lists_empty_and_refuses_writes() {
        let (_dir, db) = open();
        db.put_slot(LOGS_KEY, "{not json".into()).await.unwrap();
        let store = EntityStore::<LogEntry>::new(db.clone());

        assert!(store.list_visible().await.is_empty());
        assert!(store.list_hidden().await.is_empty());

        let err = store.upsert(entry("a", "x")).await.unwrap_err();
        assert!(matches!(err, PersistenceError::Corrupt { key: LOGS_KEY, .. }));
        assert!(matches!(
            store.hide("a").await,
            Err(PersistenceError::Corrupt { .. })
        ));

        assert!(matches!(
            store.get("a").await,
            Err(PersistenceError::Corrupt { .. })
        ));

        assert_eq!(
            db.get_slot(LOGS_KEY).await.unwrap().as_deref(),
            Some("{not json")
        );
    }

    #[tokio::test]
    async fn unreadable_record_is_skipped_and_kept() {
        let (_dir, db) = open();
        db.put_slot(
            CAMPAIGNS_KEY,
            r#"[{"id":"ok","userId":"u","userName":"n","brandName":"Acme",
                 "campaignName":"Spring","startDate":"2026-03-10T09:00",
                 "endDate":"2026-03-12T18:00","createdAt":5},
                {"id":"bad","userId":"u","userName":"n","brandName":"Acme",
                 "campaignName":"Broken","startDate":"next week",
                 "endDate":"","createdAt":6}]"#
                .into(),
        )
        .await
        .unwrap();

        let store = EntityStore::<Campaign>::new(db.clone());
        let listed = store.list_visible().await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, "ok");

        assert!(store.hide("ok").await.unwrap());
        assert!(store.get("ok").await.unwrap().unwrap().is_deleted);

        let raw = db.get_slot(CAMPAIGNS_KEY).await.unwrap().unwrap();
        assert!(raw.contains(r#""startDate":"next week""#));
    }

    #[tokio::test]
    async fn hide_all_counts_only_visible_records() {
        let (_dir, db) = open();
        let store = EntityStore::<LogEntry>::new(db);
        for id in ["a", "b", "c"] {
            store.upsert(entry(id, "x")).await.unwrap();
        }
        store.hide("b").await.unwrap();

        assert_eq!(store.hide_all().await.unwrap(), 2);
        assert!(store.list_visible().await.is_empty());
        assert_eq!(store.list_hidden().await.len(), 3);
        assert_eq!(store.hide_all().await.unwrap(), 0);
    }
}
