pub mod commands;
pub mod filter;
pub mod status;

use chrono::{NaiveDate, NaiveDateTime, SubsecRound, Utc};
use log::warn;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    db::models::{Campaign, User},
    error::{AppError, AppResult},
    session::ensure_owner,
    store::EntityStore,
};

pub use status::CampaignStatus;

const KIND: &str = "campaign";

/// Form input for creating or editing a campaign.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignDraft {
    pub brand_name: String,
    pub campaign_name: String,
    pub notes: String,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
}

impl CampaignDraft {
    fn validate(self) -> AppResult<Self> {
        let brand_name = self.brand_name.trim().to_string();
        let campaign_name = self.campaign_name.trim().to_string();
        if brand_name.is_empty() {
            return Err(AppError::Validation("brand name must not be empty".into()));
        }
        if campaign_name.is_empty() {
            return Err(AppError::Validation("campaign name must not be empty".into()));
        }
        if self.end_date < self.start_date {
            warn!(
                "Campaign '{campaign_name}' ends ({}) before it starts ({})",
                self.end_date, self.start_date
            );
        }

        Ok(Self {
            brand_name,
            campaign_name,
            notes: self.notes.trim().to_string(),
            ..self
        })
    }
}

/// A campaign row with its status at render time.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignRow {
    #[serde(flatten)]
    pub campaign: Campaign,
    pub status: CampaignStatus,
}

#[derive(Clone)]
pub struct CampaignBoard {
    store: EntityStore<Campaign>,
}

impl CampaignBoard {
    pub fn new(store: EntityStore<Campaign>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &EntityStore<Campaign> {
        &self.store
    }

    /// Reloads visible campaigns, filters them for the view, and resolves
    /// each status against `now`.
    pub async fn view(&self, day: NaiveDate, show_all: bool, now: NaiveDateTime) -> Vec<CampaignRow> {
        filter::for_view(&self.store.list_visible().await, day, show_all)
            .into_iter()
            .map(|campaign| CampaignRow {
                status: status::resolve(campaign.start_date, campaign.end_date, now),
                campaign,
            })
            .collect()
    }

    pub async fn create(&self, user: &User, draft: CampaignDraft) -> AppResult<Campaign> {
        let draft = draft.validate()?;
        let campaign = Campaign {
            id: Uuid::new_v4().simple().to_string(),
            user_id: user.id.clone(),
            user_name: user.display_name.clone(),
            brand_name: draft.brand_name,
            campaign_name: draft.campaign_name,
            notes: draft.notes,
            start_date: draft.start_date,
            end_date: draft.end_date,
            created_at: Utc::now().trunc_subsecs(3),
            is_deleted: false,
        };

        self.store.upsert(campaign.clone()).await?;
        Ok(campaign)
    }

    pub async fn edit(&self, user: &User, id: &str, draft: CampaignDraft) -> AppResult<Campaign> {
        let existing = self.find(id).await?;
        if existing.is_deleted {
            return Err(not_found(id));
        }
        ensure_owner(user, &existing, KIND)?;
        let draft = draft.validate()?;

        let campaign = Campaign {
            user_name: user.display_name.clone(),
            brand_name: draft.brand_name,
            campaign_name: draft.campaign_name,
            notes: draft.notes,
            start_date: draft.start_date,
            end_date: draft.end_date,
            ..existing
        };

        self.store.upsert(campaign.clone()).await?;
        Ok(campaign)
    }

    pub async fn hide(&self, user: &User, id: &str) -> AppResult<()> {
        let campaign = self.find(id).await?;
        ensure_owner(user, &campaign, KIND)?;
        self.store.hide(id).await?;
        Ok(())
    }

    /// Moves every campaign to the recycle bin, whoever owns it.
    pub async fn hide_all(&self) -> AppResult<usize> {
        Ok(self.store.hide_all().await?)
    }

    pub async fn find(&self, id: &str) -> AppResult<Campaign> {
        self.store.get(id).await?.ok_or_else(|| not_found(id))
    }
}

fn not_found(id: &str) -> AppError {
    AppError::NotFound {
        kind: KIND,
        id: id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::{helpers::parse_wall_clock, Database},
        session::identity::user_for_login,
    };

    fn board() -> (tempfile::TempDir, CampaignBoard) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("campaigns.sqlite3")).unwrap();
        (dir, CampaignBoard::new(EntityStore::new(db)))
    }

    fn draft(name: &str, start: &str, end: &str) -> CampaignDraft {
        CampaignDraft {
            brand_name: "Acme".into(),
            campaign_name: name.into(),
            notes: String::new(),
            start_date: parse_wall_clock(start, "start").unwrap(),
            end_date: parse_wall_clock(end, "end").unwrap(),
        }
    }

    #[tokio::test]
    async fn view_attaches_status_and_filters_by_day() {
        let (_dir, board) = board();
        let user = user_for_login("mert@agency.com", None).unwrap();
        board
            .create(&user, draft("Spring", "2026-03-10T09:00", "2026-03-12T18:00"))
            .await
            .unwrap();
        board
            .create(&user, draft("Summer", "2026-06-01T09:00", "2026-06-30T18:00"))
            .await
            .unwrap();

        let now = parse_wall_clock("2026-03-11T12:00", "now").unwrap();
        let day = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();

        let rows = board.view(day, false, now).await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].campaign.campaign_name, "Spring");
        assert_eq!(rows[0].status, CampaignStatus::Active);

        let all = board.view(day, true, now).await;
        let statuses: Vec<_> = all.iter().map(|r| r.status).collect();
        assert_eq!(statuses, vec![CampaignStatus::Active, CampaignStatus::Upcoming]);
    }

    #[tokio::test]
    async fn edit_preserves_identity_and_requires_owner() {
        let (_dir, board) = board();
        let owner = user_for_login("mert@agency.com", None).unwrap();
        let other = user_for_login("ayse@agency.com", None).unwrap();
        let created = board
            .create(&owner, draft("Spring", "2026-03-10T09:00", "2026-03-12T18:00"))
            .await
            .unwrap();

        let changed = draft("Spring Sale", "2026-03-11T09:00", "2026-03-13T18:00");
        assert!(matches!(
            board.edit(&other, &created.id, changed.clone()).await,
            Err(AppError::NotOwner { .. })
        ));

        let edited = board.edit(&owner, &created.id, changed).await.unwrap();
        assert_eq!(edited.id, created.id);
        assert_eq!(edited.created_at, created.created_at);
        assert_eq!(edited.campaign_name, "Spring Sale");
        assert_eq!(board.store().list_all().await.len(), 1);
    }

    #[tokio::test]
    async fn rejects_missing_names_but_accepts_inverted_window() {
        let (_dir, board) = board();
        let user = user_for_login("mert@agency.com", None).unwrap();

        let mut blank = draft("x", "2026-03-10T09:00", "2026-03-12T18:00");
        blank.brand_name = "  ".into();
        assert!(matches!(
            board.create(&user, blank).await,
            Err(AppError::Validation(_))
        ));

        let inverted = draft("Backwards", "2026-03-12T09:00", "2026-03-10T09:00");
        assert!(board.create(&user, inverted).await.is_ok());
    }

    #[tokio::test]
    async fn hide_all_ignores_ownership() {
        let (_dir, board) = board();
        let mert = user_for_login("mert@agency.com", None).unwrap();
        let ayse = user_for_login("ayse@agency.com", None).unwrap();
        board
            .create(&mert, draft("A", "2026-03-10T09:00", "2026-03-12T18:00"))
            .await
            .unwrap();
        board
            .create(&ayse, draft("B", "2026-03-10T09:00", "2026-03-12T18:00"))
            .await
            .unwrap();

        assert_eq!(board.hide_all().await.unwrap(), 2);
        let now = parse_wall_clock("2026-03-11T12:00", "now").unwrap();
        let day = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        assert!(board.view(day, true, now).await.is_empty());
    }

    #[tokio::test]
    async fn hidden_campaigns_cannot_be_edited() {
        let (_dir, board) = board();
        let user = user_for_login("mert@agency.com", None).unwrap();
        let created = board
            .create(&user, draft("Spring", "2026-03-10T09:00", "2026-03-12T18:00"))
            .await
            .unwrap();
        board.hide(&user, &created.id).await.unwrap();

        let changed = draft("Renamed", "2026-03-10T09:00", "2026-03-12T18:00");
        assert!(matches!(
            board.edit(&user, &created.id, changed).await,
            Err(AppError::NotFound { .. })
        ));
        assert_eq!(board.find(&created.id).await.unwrap().campaign_name, "Spring");
    }
}
