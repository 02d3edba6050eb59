//! probekeeper agent
//!
//! Deploys and supervises the prometheus-blackbox-exporter snap. Each
//! `hook` invocation dispatches one event into the reconciler actor and
//! persists the resulting flag state.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::Result;
use kameo::actor::Spawn;
use tokio::sync::broadcast;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use probekeeper_core::{
    modules, render, AgentActor, AgentActorArgs, Dispatch, HookEvent, StateStore,
};

mod config;
mod factory;

use config::Config;

#[derive(Parser)]
#[command(name = "probekeeper")]
#[command(about = "Deploys and supervises the blackbox exporter", long_about = None)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dispatch one hook event
    #[command(name = "hook")]
    Hook {
        /// Event name, e.g. install, config-changed, upgrade,
        /// nrpe-relation-joined
        event: String,
    },
    /// Show the persisted agent state
    #[command(name = "status")]
    Status,
    /// Print the candidate exporter configuration
    #[command(name = "render")]
    Render,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };

    init_tracing(&config.agent.log_level);

    match cli.command {
        Commands::Hook { event } => run_hook(&config, &event).await,
        Commands::Status => show_status(&config),
        Commands::Render => render_candidate(&config),
    }
}

fn init_tracing(log_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Dispatch a single hook event into the reconciler
async fn run_hook(config: &Config, event: &str) -> Result<()> {
    let event: HookEvent = event.parse().map_err(|e: String| eyre::eyre!(e))?;

    let store = StateStore::new(&config.agent.state_path);
    let state = store.load()?;

    let collaborators = factory::build(config).await?;
    let (event_tx, mut event_rx) = broadcast::channel(256);

    // Surface agent events in the hook log
    let event_log = tokio::spawn(async move {
        while let Ok(event) = event_rx.recv().await {
            debug!(?event, "agent event");
        }
    });

    let agent = AgentActor::spawn(AgentActorArgs {
        settings: config.exporter.clone(),
        state,
        store,
        installer: collaborators.installer,
        services: collaborators.services,
        firewall: collaborators.firewall,
        health_checks: collaborators.health_checks,
        scrape_targets: collaborators.scrape_targets,
        dashboards: collaborators.dashboards,
        event_tx,
    });

    let outcome = agent
        .ask(Dispatch {
            event,
            snapshot: config.deploy.clone(),
        })
        .await
        .map_err(|e| eyre::eyre!("dispatch failed: {e}"))?;

    agent
        .stop_gracefully()
        .await
        .map_err(|e| eyre::eyre!("agent shutdown failed: {e}"))?;
    event_log.abort();

    info!(event = %event, actions = ?outcome.actions, "hook completed");
    if let Some(status) = outcome.status {
        println!("{status}");
    }

    Ok(())
}

/// Print the persisted flag state as JSON
fn show_status(config: &Config) -> Result<()> {
    let state = StateStore::new(&config.agent.state_path).load()?;
    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}

/// Print what the exporter configuration would look like right now
fn render_candidate(config: &Config) -> Result<()> {
    match modules::load_modules(&config.deploy.modules) {
        Some(normalized) => {
            print!("{}", render::render_config(&normalized));
            Ok(())
        }
        None => Err(eyre::eyre!("configured module list cannot be parsed")),
    }
}
