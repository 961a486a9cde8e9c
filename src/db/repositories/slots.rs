use anyhow::Result;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use crate::db::Database;

/// Stable slot keys. They match the keys the browser build used so exported
/// data can be imported as-is.
pub const LOGS_KEY: &str = "ess_logs_v1";
pub const CAMPAIGNS_KEY: &str = "ess_campaigns_v1";
pub const CURRENT_USER_KEY: &str = "ess_current_user";

pub fn read_slot(conn: &Connection, key: &str) -> rusqlite::Result<Option<String>> {
    conn.query_row(
        "SELECT value FROM slots WHERE key = ?1",
        params![key],
        |row| row.get(0),
    )
    .optional()
}

pub fn write_slot(conn: &Connection, key: &str, value: &str) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO slots (key, value, updated_at)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        params![key, value, Utc::now().to_rfc3339()],
    )?;
    Ok(())
}

pub fn delete_slot(conn: &Connection, key: &str) -> rusqlite::Result<bool> {
    let rows_affected = conn.execute("DELETE FROM slots WHERE key = ?1", params![key])?;
    Ok(rows_affected > 0)
}

impl Database {
    pub async fn get_slot(&self, key: &'static str) -> Result<Option<String>> {
        self.execute(move |conn| Ok(read_slot(conn, key)?)).await
    }

    pub async fn put_slot(&self, key: &'static str, value: String) -> Result<()> {
        self.execute(move |conn| Ok(write_slot(conn, key, &value)?))
            .await
    }

    pub async fn clear_slot(&self, key: &'static str) -> Result<bool> {
        self.execute(move |conn| Ok(delete_slot(conn, key)?)).await
    }
}
