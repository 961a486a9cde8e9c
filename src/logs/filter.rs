use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::db::models::{Campaign, LogEntry};

/// Visible entries for `day`, newest first.
pub fn for_day(logs: &[LogEntry], day: NaiveDate) -> Vec<LogEntry> {
    let mut selected: Vec<LogEntry> = logs
        .iter()
        .filter(|log| !log.is_deleted && log.date == day)
        .cloned()
        .collect();
    selected.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    selected
}

/// The `limit` most recently created visible entries, newest first.
pub fn most_recent(logs: &[LogEntry], limit: usize) -> Vec<LogEntry> {
    let mut visible: Vec<LogEntry> = logs.iter().filter(|log| !log.is_deleted).cloned().collect();
    visible.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    visible.truncate(limit);
    visible
}

/// Days that get an activity marker on the calendar: any visible entry, or
/// any visible campaign starting that day.
pub fn activity_days(logs: &[LogEntry], campaigns: &[Campaign]) -> BTreeSet<NaiveDate> {
    logs.iter()
        .filter(|log| !log.is_deleted)
        .map(|log| log.date)
        .chain(
            campaigns
                .iter()
                .filter(|c| !c.is_deleted)
                .map(Campaign::start_day),
        )
        .collect()
}
