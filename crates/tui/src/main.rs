mod app;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::fs::{self, OpenOptions};
use tokio::sync::mpsc;
use tracing_subscriber::{prelude::*, EnvFilter};
use wmt_core::{
    config::{self, AppConfig},
    dataset::{DatasetLoader, DatasetSync, SnapshotSlot},
    detail::{build_unit_detail, build_warband_detail},
};

#[derive(Parser, Debug)]
#[command(
    name = "wmtui",
    version,
    about = "Terminal browser for the warband compendium"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print one unit's detail record and exit.
    Unit {
        /// Unit identifier.
        id: String,
        /// Output machine-readable JSON.
        #[arg(long)]
        json: bool,
    },
    /// Print one warband's detail record and exit.
    Warband {
        /// Warband identifier.
        id: String,
        /// Output machine-readable JSON.
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging()?;

    config::ensure_default_config()?;
    let config = AppConfig::load()?;
    let loader = DatasetLoader::new(&config)?;

    match cli.command {
        Some(Commands::Unit { id, json }) => show_unit(&loader, &id, json).await,
        Some(Commands::Warband { id, json }) => show_warband(&loader, &id, json).await,
        None => run_tui(config, loader).await,
    }
}

async fn run_tui(config: AppConfig, loader: DatasetLoader) -> Result<()> {
    let slot = SnapshotSlot::new();
    let (load_tx, load_rx) = mpsc::channel(8);

    // Initial load runs in the background so the UI comes up immediately
    // with a loading status.
    let sync = DatasetSync::new(loader.clone(), slot.clone());
    let startup_tx = load_tx.clone();
    tokio::spawn(async move {
        if let Err(err) = sync.run(startup_tx).await {
            tracing::error!("Initial load task error: {err}");
        }
    });

    let mut app = app::CompendiumApp::new(config, loader, slot, load_tx);
    app.attach_loads(load_rx);
    app.run().await
}

async fn show_unit(loader: &DatasetLoader, id: &str, json: bool) -> Result<()> {
    let snapshot = loader.load_all().await?;
    match snapshot.index.unit(id) {
        Some(unit) => {
            let detail = build_unit_detail(unit, &snapshot.index);
            if json {
                println!("{}", serde_json::to_string_pretty(&detail)?);
            } else {
                for line in detail.text_lines() {
                    println!("{line}");
                }
            }
        }
        None => println!("No unit with id '{id}'."),
    }
    Ok(())
}

async fn show_warband(loader: &DatasetLoader, id: &str, json: bool) -> Result<()> {
    let snapshot = loader.load_all().await?;
    match snapshot.index.warband(id) {
        Some(warband) => {
            let detail = build_warband_detail(warband, &snapshot.index);
            if json {
                println!("{}", serde_json::to_string_pretty(&detail)?);
            } else {
                for line in detail.text_lines() {
                    println!("{line}");
                }
            }
        }
        None => println!("No warband with id '{id}'."),
    }
    Ok(())
}

fn init_logging() -> Result<()> {
    let log_dir = std::env::current_dir()?.join("logs");
    fs::create_dir_all(&log_dir)?;
    let log_path = log_dir.join("wmtui.log");

    let env_filter = EnvFilter::from_default_env();

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .compact()
        .with_writer(std::io::stdout);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .compact()
        .with_writer(move || {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_path)
                .expect("failed to open log file")
        });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    Ok(())
}
