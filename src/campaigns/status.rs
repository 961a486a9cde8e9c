use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CampaignStatus {
    Upcoming,
    Active,
    Ended,
}

impl CampaignStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignStatus::Upcoming => "Upcoming",
            CampaignStatus::Active => "Active",
            CampaignStatus::Ended => "Ended",
        }
    }
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle phase at `now`. Both window edges count as active.
pub fn resolve(start: NaiveDateTime, end: NaiveDateTime, now: NaiveDateTime) -> CampaignStatus {
    if now < start {
        CampaignStatus::Upcoming
    } else if now > end {
        CampaignStatus::Ended
    } else {
        CampaignStatus::Active
    }
}
