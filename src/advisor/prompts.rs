use chrono::NaiveDate;

use crate::db::models::{Campaign, LogEntry};

pub fn daily_summary(logs: &[LogEntry], day: NaiveDate, language: &str) -> String {
    let lines = logs
        .iter()
        .map(|log| format!("{}: {} ({})", log.user_name, log.content, log.tag))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Analyze the work entries below and write a motivating, professional daily summary \
         for this team (at most 3 sentences). Language: {language}.\n\
         Date: {day}\n\
         Entries:\n{lines}"
    )
}

pub fn deep_analysis(logs: &[LogEntry], campaigns: &[Campaign], language: &str) -> String {
    let campaign_lines = campaigns
        .iter()
        .map(|c| format!("{} - {}", c.brand_name, c.campaign_name))
        .collect::<Vec<_>>()
        .join("\n");
    let log_lines = logs
        .iter()
        .map(|log| format!("[{}] {}: {}", log.date, log.user_name, log.content))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are a professional agency consultant. Review the recent work entries and the \
         active campaigns below. Analyze how the team could work more effectively and give \
         strategic recommendations. Keep the answer professional, constructive, and \
         forward-looking. Language: {language}.\n\n\
         ACTIVE CAMPAIGNS:\n{campaign_lines}\n\n\
         RECENT WORK ENTRIES:\n{log_lines}"
    )
}
