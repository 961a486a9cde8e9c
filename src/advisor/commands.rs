use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::{logs::filter::activity_days, settings::AdvisorSettings, AppState};

pub async fn daily_summary(state: &AppState, day: NaiveDate) -> Result<String, String> {
    state.session.require().map_err(|e| e.to_string())?;
    let logs = state.logs.day(day).await;
    Ok(state.advisor.summarize(&logs, day).await)
}

pub async fn deep_analysis(state: &AppState) -> Result<String, String> {
    state.session.require().map_err(|e| e.to_string())?;
    let logs = state.logs.store().list_visible().await;
    let campaigns = state.campaigns.store().list_visible().await;
    Ok(state.advisor.analyze(&logs, &campaigns).await)
}

pub async fn get_activity_days(state: &AppState) -> Result<BTreeSet<NaiveDate>, String> {
    state.session.require().map_err(|e| e.to_string())?;
    let logs = state.logs.store().list_visible().await;
    let campaigns = state.campaigns.store().list_visible().await;
    Ok(activity_days(&logs, &campaigns))
}

pub fn get_advisor_settings(state: &AppState) -> AdvisorSettings {
    state.settings.advisor()
}

pub fn set_advisor_settings(state: &AppState, settings: AdvisorSettings) -> Result<(), String> {
    state
        .settings
        .update_advisor(settings)
        .map_err(|e| e.to_string())
}
