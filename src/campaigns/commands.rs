use chrono::{NaiveDate, NaiveDateTime};

use crate::{
    campaigns::{CampaignDraft, CampaignRow},
    db::models::Campaign,
    AppState,
};

pub async fn list_campaigns(
    state: &AppState,
    day: NaiveDate,
    show_all: bool,
    now: NaiveDateTime,
) -> Result<Vec<CampaignRow>, String> {
    state.session.require().map_err(|e| e.to_string())?;
    Ok(state.campaigns.view(day, show_all, now).await)
}

pub async fn get_campaign(state: &AppState, campaign_id: String) -> Result<Campaign, String> {
    state.session.require().map_err(|e| e.to_string())?;
    state
        .campaigns
        .find(&campaign_id)
        .await
        .map_err(|e| e.to_string())
}

pub async fn create_campaign(state: &AppState, draft: CampaignDraft) -> Result<Campaign, String> {
    let user = state.session.require().map_err(|e| e.to_string())?;
    state
        .campaigns
        .create(&user, draft)
        .await
        .map_err(|e| e.to_string())
}

pub async fn update_campaign(
    state: &AppState,
    campaign_id: String,
    draft: CampaignDraft,
) -> Result<Campaign, String> {
    let user = state.session.require().map_err(|e| e.to_string())?;
    state
        .campaigns
        .edit(&user, &campaign_id, draft)
        .await
        .map_err(|e| e.to_string())
}

pub async fn hide_campaign(state: &AppState, campaign_id: String) -> Result<(), String> {
    let user = state.session.require().map_err(|e| e.to_string())?;
    state
        .campaigns
        .hide(&user, &campaign_id)
        .await
        .map_err(|e| e.to_string())
}

pub async fn hide_all_campaigns(state: &AppState) -> Result<usize, String> {
    state.session.require().map_err(|e| e.to_string())?;
    state.campaigns.hide_all().await.map_err(|e| e.to_string())
}
