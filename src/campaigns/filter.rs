use chrono::NaiveDate;

use crate::db::models::Campaign;

/// Visible campaigns starting on `day` (or all of them when `show_all`),
/// soonest start first.
pub fn for_view(campaigns: &[Campaign], day: NaiveDate, show_all: bool) -> Vec<Campaign> {
    let mut selected: Vec<Campaign> = campaigns
        .iter()
        .filter(|c| !c.is_deleted && (show_all || c.start_day() == day))
        .cloned()
        .collect();
    selected.sort_by_key(|c| c.start_date);
    selected
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::db::helpers::{parse_day, parse_wall_clock};

    fn campaign(id: &str, start: &str, deleted: bool) -> Campaign {
        let start = parse_wall_clock(start, "start").unwrap();
        Campaign {
            id: id.into(),
            user_id: "u".into(),
            user_name: "n".into(),
            brand_name: "Acme".into(),
            campaign_name: id.into(),
            notes: String::new(),
            start_date: start,
            end_date: start + chrono::Duration::days(2),
            created_at: Utc::now(),
            is_deleted: deleted,
        }
    }

    fn day(value: &str) -> NaiveDate {
        parse_day(value, "day").unwrap()
    }

    #[test]
    fn filters_by_start_day_unless_showing_all() {
        let all = vec![campaign("spring", "2026-03-10T09:00", false)];

        assert_eq!(for_view(&all, day("2026-03-10"), false).len(), 1);
        assert!(for_view(&all, day("2026-03-11"), false).is_empty());
        assert_eq!(for_view(&all, day("2026-03-11"), true).len(), 1);
    }

    #[test]
    fn excludes_hidden_and_orders_by_start() {
        let all = vec![
            campaign("late", "2026-03-20T10:00", false),
            campaign("hidden", "2026-03-01T10:00", true),
            campaign("early", "2026-03-05T08:30", false),
            campaign("mid", "2026-03-05T12:00", false),
        ];

        let ids: Vec<_> = for_view(&all, day("2026-03-05"), true)
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec!["early", "mid", "late"]);
    }
}
