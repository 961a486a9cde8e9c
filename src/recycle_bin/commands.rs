use crate::{recycle_bin::BinContents, AppState};

pub async fn get_bin(state: &AppState) -> Result<BinContents, String> {
    state.session.require().map_err(|e| e.to_string())?;
    Ok(state.bin.contents().await)
}

pub async fn restore_log(state: &AppState, log_id: String) -> Result<(), String> {
    state.session.require().map_err(|e| e.to_string())?;
    state
        .bin
        .restore_log(&log_id)
        .await
        .map_err(|e| e.to_string())
}

pub async fn restore_campaign(state: &AppState, campaign_id: String) -> Result<(), String> {
    state.session.require().map_err(|e| e.to_string())?;
    state
        .bin
        .restore_campaign(&campaign_id)
        .await
        .map_err(|e| e.to_string())
}

pub async fn purge_log(state: &AppState, log_id: String) -> Result<(), String> {
    let user = state.session.require().map_err(|e| e.to_string())?;
    state
        .bin
        .purge_log(&user, &log_id)
        .await
        .map_err(|e| e.to_string())
}

pub async fn purge_campaign(state: &AppState, campaign_id: String) -> Result<(), String> {
    let user = state.session.require().map_err(|e| e.to_string())?;
    state
        .bin
        .purge_campaign(&user, &campaign_id)
        .await
        .map_err(|e| e.to_string())
}
