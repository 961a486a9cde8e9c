use std::path::PathBuf;

use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDate, NaiveDateTime};
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::{
    advisor::commands as advisor_cmd,
    campaigns::{commands as campaign_cmd, CampaignDraft, CampaignRow},
    db::{
        helpers::{format_wall_clock, parse_day, parse_wall_clock},
        models::{Campaign, LogEntry, WorkTag},
    },
    logs::{commands as log_cmd, NewLog},
    recycle_bin::commands as bin_cmd,
    session::commands as session_cmd,
    AppState,
};

#[derive(Debug, Parser)]
#[command(name = "worklog", version, about = "Daily work log and campaign tracker")]
pub struct Cli {
    /// Directory holding the database and settings.
    #[arg(long, env = "WORKLOG_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in with an email address (no password).
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: Option<String>,
    },
    Logout,
    Whoami,
    /// Daily work entries.
    #[command(subcommand)]
    Log(LogCommand),
    /// Campaign windows.
    #[command(subcommand)]
    Campaign(CampaignCommand),
    /// Hidden records.
    #[command(subcommand)]
    Bin(BinCommand),
    /// Days with activity, for the calendar.
    Days,
    /// AI digest of one day's entries.
    Summary {
        #[arg(long)]
        date: Option<String>,
    },
    /// AI advisory report over recent entries and campaigns.
    Analyze,
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Debug, Subcommand)]
pub enum LogCommand {
    Add {
        #[arg(long)]
        content: String,
        #[arg(long, value_enum, default_value_t = TagArg::Advertising)]
        tag: TagArg,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        campaign: Option<String>,
    },
    Edit {
        id: String,
        #[arg(long)]
        content: Option<String>,
        #[arg(long, value_enum)]
        tag: Option<TagArg>,
    },
    List {
        #[arg(long)]
        date: Option<String>,
    },
    Hide {
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct CampaignFields {
    #[arg(long)]
    brand: String,
    #[arg(long)]
    name: String,
    #[arg(long, default_value = "")]
    notes: String,
    /// Start, local time: YYYY-MM-DDTHH:MM
    #[arg(long)]
    start: String,
    /// End, local time: YYYY-MM-DDTHH:MM
    #[arg(long)]
    end: String,
}

#[derive(Debug, Subcommand)]
pub enum CampaignCommand {
    Add(CampaignFields),
    Edit {
        id: String,
        #[command(flatten)]
        fields: CampaignFields,
    },
    List {
        #[arg(long)]
        date: Option<String>,
        /// Ignore the date and list every campaign.
        #[arg(long)]
        all: bool,
    },
    Hide {
        id: String,
    },
    HideAll,
}

#[derive(Debug, Subcommand)]
pub enum BinCommand {
    List,
    Restore {
        #[arg(value_enum)]
        kind: KindArg,
        id: String,
    },
    /// Delete a hidden record for good.
    Purge {
        #[arg(value_enum)]
        kind: KindArg,
        id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    Show,
    Advisor {
        #[arg(long)]
        enabled: Option<bool>,
        #[arg(long)]
        model: Option<String>,
        #[arg(long)]
        language: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TagArg {
    Advertising,
    Design,
}

impl From<TagArg> for WorkTag {
    fn from(tag: TagArg) -> Self {
        match tag {
            TagArg::Advertising => WorkTag::Advertising,
            TagArg::Design => WorkTag::Design,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KindArg {
    Log,
    Campaign,
}

fn day_or_today(value: Option<&str>) -> Result<NaiveDate> {
    match value {
        Some(raw) => parse_day(raw, "date"),
        None => Ok(Local::now().date_naive()),
    }
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

impl CampaignFields {
    fn into_draft(self) -> Result<CampaignDraft> {
        Ok(CampaignDraft {
            brand_name: self.brand,
            campaign_name: self.name,
            notes: self.notes,
            start_date: parse_wall_clock(&self.start, "start")?,
            end_date: parse_wall_clock(&self.end, "end")?,
        })
    }
}

fn print_log(entry: &LogEntry) {
    println!(
        "{}  {}  [{}] {}: {}",
        entry.id,
        entry.created_at.with_timezone(&Local).format("%H:%M"),
        entry.tag,
        entry.user_name,
        entry.content
    );
}

fn print_campaign(campaign: &Campaign, status: Option<&str>) {
    println!(
        "{}  {} - {}  {} -> {}{}  ({})",
        campaign.id,
        campaign.brand_name,
        campaign.campaign_name,
        format_wall_clock(&campaign.start_date),
        format_wall_clock(&campaign.end_date),
        status.map(|s| format!("  {s}")).unwrap_or_default(),
        campaign.user_name
    );
    if !campaign.notes.is_empty() {
        println!("    {}", campaign.notes);
    }
}

fn print_rows(rows: &[CampaignRow]) {
    for row in rows {
        print_campaign(&row.campaign, Some(row.status.as_str()));
    }
}

/// Runs one command against an initialized state.
pub async fn dispatch(state: &AppState, command: Command) -> Result<()> {
    let cmd_err = |e: String| anyhow!(e);

    match command {
        Command::Login { email, name } => {
            let user = session_cmd::login(state, email, name).await.map_err(cmd_err)?;
            println!("Logged in as {} <{}>", user.display_name, user.email);
        }
        Command::Logout => {
            session_cmd::logout(state).await.map_err(cmd_err)?;
            println!("Logged out");
        }
        Command::Whoami => match session_cmd::current_user(state) {
            Some(user) => println!("{} <{}> id={}", user.display_name, user.email, user.id),
            None => println!("Not logged in"),
        },
        Command::Log(command) => match command {
            LogCommand::Add {
                content,
                tag,
                date,
                campaign,
            } => {
                let day = day_or_today(date.as_deref())?;
                let input = NewLog {
                    date: day,
                    content,
                    tag: tag.into(),
                    campaign_id: campaign,
                };
                let entry = log_cmd::create_log(state, input).await.map_err(cmd_err)?;
                println!("Saved log {}", entry.id);
                for entry in log_cmd::list_logs(state, day).await.map_err(cmd_err)? {
                    print_log(&entry);
                }
            }
            LogCommand::Edit { id, content, tag } => {
                let entry = log_cmd::update_log(state, id, content, tag.map(Into::into))
                    .await
                    .map_err(cmd_err)?;
                println!("Updated log {}", entry.id);
                for entry in log_cmd::list_logs(state, entry.date).await.map_err(cmd_err)? {
                    print_log(&entry);
                }
            }
            LogCommand::List { date } => {
                let day = day_or_today(date.as_deref())?;
                let entries = log_cmd::list_logs(state, day).await.map_err(cmd_err)?;
                println!("{day}: {} entr{}", entries.len(), if entries.len() == 1 { "y" } else { "ies" });
                for entry in &entries {
                    print_log(entry);
                }
            }
            LogCommand::Hide { id } => {
                log_cmd::hide_log(state, id.clone()).await.map_err(cmd_err)?;
                println!("Moved log {id} to the recycle bin");
            }
        },
        Command::Campaign(command) => match command {
            CampaignCommand::Add(fields) => {
                let draft = fields.into_draft()?;
                let start_day = draft.start_date.date();
                let campaign = campaign_cmd::create_campaign(state, draft)
                    .await
                    .map_err(cmd_err)?;
                println!("Saved campaign {}", campaign.id);
                let rows = campaign_cmd::list_campaigns(state, start_day, false, now())
                    .await
                    .map_err(cmd_err)?;
                print_rows(&rows);
            }
            CampaignCommand::Edit { id, fields } => {
                let draft = fields.into_draft()?;
                let campaign = campaign_cmd::update_campaign(state, id, draft)
                    .await
                    .map_err(cmd_err)?;
                println!("Updated campaign {}", campaign.id);
                let rows = campaign_cmd::list_campaigns(state, campaign.start_day(), false, now())
                    .await
                    .map_err(cmd_err)?;
                print_rows(&rows);
            }
            CampaignCommand::List { date, all } => {
                let day = day_or_today(date.as_deref())?;
                let rows = campaign_cmd::list_campaigns(state, day, all, now())
                    .await
                    .map_err(cmd_err)?;
                if all {
                    println!("All campaigns: {}", rows.len());
                } else {
                    println!("Campaigns starting {day}: {}", rows.len());
                }
                print_rows(&rows);
            }
            CampaignCommand::Hide { id } => {
                let campaign = campaign_cmd::get_campaign(state, id.clone())
                    .await
                    .map_err(cmd_err)?;
                campaign_cmd::hide_campaign(state, id.clone())
                    .await
                    .map_err(cmd_err)?;
                println!(
                    "Moved campaign {id} ({} - {}) to the recycle bin",
                    campaign.brand_name, campaign.campaign_name
                );
            }
            CampaignCommand::HideAll => {
                let hidden = campaign_cmd::hide_all_campaigns(state).await.map_err(cmd_err)?;
                println!("Moved {hidden} campaign(s) to the recycle bin");
            }
        },
        Command::Bin(command) => match command {
            BinCommand::List => {
                let contents = bin_cmd::get_bin(state).await.map_err(cmd_err)?;
                if contents.is_empty() {
                    println!("Recycle bin is empty");
                }
                if !contents.logs.is_empty() {
                    println!("Logs:");
                    for entry in &contents.logs {
                        print!("  {}  ", entry.date);
                        print_log(entry);
                    }
                }
                if !contents.campaigns.is_empty() {
                    println!("Campaigns:");
                    for campaign in &contents.campaigns {
                        print!("  ");
                        print_campaign(campaign, None);
                    }
                }
            }
            BinCommand::Restore { kind, id } => {
                let result = match kind {
                    KindArg::Log => bin_cmd::restore_log(state, id.clone()).await,
                    KindArg::Campaign => bin_cmd::restore_campaign(state, id.clone()).await,
                };
                result.map_err(cmd_err)?;
                println!("Restored {id}");
            }
            BinCommand::Purge { kind, id } => {
                let result = match kind {
                    KindArg::Log => bin_cmd::purge_log(state, id.clone()).await,
                    KindArg::Campaign => bin_cmd::purge_campaign(state, id.clone()).await,
                };
                result.map_err(cmd_err)?;
                println!("Permanently deleted {id}");
            }
        },
        Command::Days => {
            for day in advisor_cmd::get_activity_days(state).await.map_err(cmd_err)? {
                println!("{day}");
            }
        }
        Command::Summary { date } => {
            let day = day_or_today(date.as_deref())?;
            println!("{}", advisor_cmd::daily_summary(state, day).await.map_err(cmd_err)?);
        }
        Command::Analyze => {
            println!("{}", advisor_cmd::deep_analysis(state).await.map_err(cmd_err)?);
        }
        Command::Settings(command) => match command {
            SettingsCommand::Show => {
                let settings = advisor_cmd::get_advisor_settings(state);
                println!("{}", serde_json::to_string_pretty(&settings)?);
                println!(
                    "API key: {}",
                    if state.advisor.is_configured() { "configured" } else { "not configured" }
                );
            }
            SettingsCommand::Advisor {
                enabled,
                model,
                language,
            } => {
                let mut settings = advisor_cmd::get_advisor_settings(state);
                if let Some(enabled) = enabled {
                    settings.enabled = enabled;
                }
                if let Some(model) = model {
                    settings.model = model;
                }
                if let Some(language) = language {
                    settings.language = language;
                }
                advisor_cmd::set_advisor_settings(state, settings).map_err(cmd_err)?;
                println!("Advisor settings saved");
            }
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_campaign_add() {
        let cli = Cli::try_parse_from([
            "worklog",
            "campaign",
            "add",
            "--brand",
            "Acme",
            "--name",
            "Spring",
            "--start",
            "2026-03-10T09:00",
            "--end",
            "2026-03-12T18:00",
        ])
        .unwrap();

        let Command::Campaign(CampaignCommand::Add(fields)) = cli.command else {
            panic!("unexpected command");
        };
        let draft = fields.into_draft().unwrap();
        assert_eq!(format_wall_clock(&draft.start_date), "2026-03-10T09:00");
        assert!(draft.notes.is_empty());
    }

    #[test]
    fn parses_bin_restore() {
        let cli = Cli::try_parse_from(["worklog", "bin", "restore", "campaign", "abc"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Bin(BinCommand::Restore {
                kind: KindArg::Campaign,
                ..
            })
        ));
    }
}
