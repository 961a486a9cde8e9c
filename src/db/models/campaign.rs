use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::helpers::{deleted_flag, wall_clock};

/// A marketing campaign window. Instants are local wall-clock times; the
/// lifecycle status is derived on read and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub brand_name: String,
    pub campaign_name: String,
    #[serde(default)]
    pub notes: String,
    #[serde(with = "wall_clock")]
    pub start_date: NaiveDateTime,
    #[serde(with = "wall_clock")]
    pub end_date: NaiveDateTime,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "deleted_flag")]
    pub is_deleted: bool,
}

impl Campaign {
    /// Calendar day the campaign starts on.
    pub fn start_day(&self) -> NaiveDate {
        self.start_date.date()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_minute_precision_instants() {
        let raw = r#"{
            "id": "lx2abc12345",
            "userId": "u",
            "userName": "mert",
            "brandName": "Acme",
            "campaignName": "Spring Sale",
            "notes": "",
            "startDate": "2026-03-10T09:00",
            "endDate": "2026-03-12T18:30",
            "createdAt": 1773136800000,
            "isDeleted": true
        }"#;

        let campaign: Campaign = serde_json::from_str(raw).unwrap();
        assert!(campaign.is_deleted);
        assert_eq!(campaign.start_day(), NaiveDate::from_ymd_opt(2026, 3, 10).unwrap());

        let written = serde_json::to_value(&campaign).unwrap();
        assert_eq!(written["startDate"], "2026-03-10T09:00");
        assert_eq!(written["endDate"], "2026-03-12T18:30");
    }
}
