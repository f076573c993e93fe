//! hoverkit - headless host for the hover interaction layer
//!
//! Loads a scenario, drives scripted cursors frame by frame on a manual clock,
//! and reports every selection notification.

mod config;
mod headless;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::Scenario;
use headless::HeadlessConfig;
use hoverkit_ui3d::SelectionEventKind;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless host for hover item selection", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a scenario and report selection events
    Run {
        /// Scenario TOML file
        scenario: PathBuf,

        /// Stop after this many frames (defaults to the scenario's `frames`)
        #[arg(long)]
        frames: Option<u64>,

        /// Interaction settings TOML that replaces the scenario's [settings]
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Write one JSON line per selection event to this path
        #[arg(long)]
        events: Option<PathBuf>,
    },
    /// Validate a scenario without running it
    Check {
        /// Scenario TOML file
        scenario: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize tracing with WARN level by default (can be overridden via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    info!("Starting hoverkit v{}", env!("CARGO_PKG_VERSION"));
    hoverkit_ui3d::init();

    match Cli::parse().command {
        Command::Run {
            scenario,
            frames,
            settings,
            events,
        } => {
            let loaded = Scenario::load(&scenario)
                .with_context(|| format!("failed to load scenario {}", scenario.display()))?;
            let settings = settings.map(|path| config::load_settings_from_path(&path));

            let summary = headless::run(HeadlessConfig {
                scenario: loaded,
                settings,
                max_frames: frames,
                events_log: events,
            })?;

            for event in &summary.events {
                println!("{:>6} {:?} {}", event.tick.0, event.kind, event.item);
            }
            println!(
                "frames={} selected={} deselected={} color_commits={}",
                summary.frames,
                summary.count(SelectionEventKind::Selected),
                summary.count(SelectionEventKind::Deselected),
                summary.color_commits
            );
        }
        Command::Check { scenario } => {
            let loaded = Scenario::load(&scenario)
                .with_context(|| format!("invalid scenario {}", scenario.display()))?;
            println!(
                "ok: {} items, {} cursors, {} actions",
                loaded.items.len(),
                loaded.cursors.len(),
                loaded.actions.len()
            );
        }
    }

    Ok(())
}
