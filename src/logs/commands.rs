use chrono::NaiveDate;

use crate::{
    db::models::{LogEntry, WorkTag},
    logs::NewLog,
    AppState,
};

pub async fn list_logs(state: &AppState, day: NaiveDate) -> Result<Vec<LogEntry>, String> {
    state.session.require().map_err(|e| e.to_string())?;
    Ok(state.logs.day(day).await)
}

pub async fn create_log(state: &AppState, input: NewLog) -> Result<LogEntry, String> {
    let user = state.session.require().map_err(|e| e.to_string())?;
    state
        .logs
        .create(&user, input)
        .await
        .map_err(|e| e.to_string())
}

pub async fn update_log(
    state: &AppState,
    log_id: String,
    content: Option<String>,
    tag: Option<WorkTag>,
) -> Result<LogEntry, String> {
    let user = state.session.require().map_err(|e| e.to_string())?;
    state
        .logs
        .edit(&user, &log_id, content, tag)
        .await
        .map_err(|e| e.to_string())
}

pub async fn hide_log(state: &AppState, log_id: String) -> Result<(), String> {
    let user = state.session.require().map_err(|e| e.to_string())?;
    state
        .logs
        .hide(&user, &log_id)
        .await
        .map_err(|e| e.to_string())
}
