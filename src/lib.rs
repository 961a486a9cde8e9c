pub mod advisor;
pub mod campaigns;
mod cli;
pub mod db;
pub mod error;
pub mod logs;
pub mod recycle_bin;
pub mod session;
pub mod settings;
pub mod store;

use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::{anyhow, Context};
use clap::Parser;

use advisor::Advisor;
use campaigns::CampaignBoard;
use cli::Cli;
use db::Database;
use logs::LogBook;
use recycle_bin::RecycleBin;
use session::SessionManager;
use settings::{api_key_from_env, SettingsStore};
use store::EntityStore;

/// Everything a command needs, built once at startup and passed by reference.
pub struct AppState {
    pub settings: SettingsStore,
    pub session: SessionManager,
    pub logs: LogBook,
    pub campaigns: CampaignBoard,
    pub bin: RecycleBin,
    pub advisor: Advisor,
}

impl AppState {
    pub async fn init(data_dir: &Path, api_key: Option<String>) -> anyhow::Result<Self> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

        let database = Database::new(data_dir.join("worklog.sqlite3"))?;
        let settings = SettingsStore::new(data_dir.join("settings.json"))?;
        let advisor = Advisor::from_settings(&settings.advisor(), api_key)?;
        let session = SessionManager::restore(database.clone()).await;

        let log_store = EntityStore::new(database.clone());
        let campaign_store = EntityStore::new(database);

        Ok(Self {
            logs: LogBook::new(log_store.clone()),
            campaigns: CampaignBoard::new(campaign_store.clone()),
            bin: RecycleBin::new(log_store, campaign_store),
            settings,
            session,
            advisor,
        })
    }
}

fn default_data_dir() -> anyhow::Result<PathBuf> {
    home::home_dir()
        .map(|home| home.join(".worklog"))
        .ok_or_else(|| anyhow!("cannot locate a home directory; pass --data-dir"))
}

pub fn run() -> ExitCode {
    // Initialize logging (reads RUST_LOG env var)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = (|| -> anyhow::Result<()> {
        let data_dir = match cli.data_dir {
            Some(dir) => dir,
            None => default_data_dir()?,
        };

        let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
        runtime.block_on(async move {
            let state = AppState::init(&data_dir, api_key_from_env()).await?;
            cli::dispatch(&state, cli.command).await
        })
    })();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
