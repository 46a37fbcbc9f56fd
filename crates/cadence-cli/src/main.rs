//! Cadence CLI Application
//!
//! Command-line front end for the guided routine planner.

mod args;
mod cli;
mod renderer;
mod walk;

use anyhow::{Context, Result};
use args::{Args, Commands, SelectionArgs};
use cadence_core::{Catalog, RoutineBuilder};
use clap::Parser;
use cli::Cli;
use log::info;
use renderer::TerminalRenderer;
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        data_file,
        backend,
        catalog,
        user,
        recent_days,
        no_color,
        command,
    } = Args::parse();

    let mut builder = RoutineBuilder::new()
        .with_backend(backend.into())
        .with_data_path(data_file)
        .with_owner(user);
    if let Some(path) = catalog {
        let catalog = Catalog::load(&path)
            .with_context(|| format!("Failed to load catalog {}", path.display()))?;
        builder = builder.with_catalog(catalog);
    }
    if let Some(days) = recent_days {
        builder = builder.with_recent_threshold_days(days);
    }

    let routine = builder
        .build()
        .await
        .context("Failed to initialize routine")?;
    let mut cli = Cli::new(routine, TerminalRenderer::new(!no_color));

    info!("Cadence started");

    match command {
        Some(Steps) => cli.list_steps(),
        Some(Plan(args)) => cli.show_plan(&args).await,
        Some(Start(args)) => cli.start(&args).await,
        Some(History) => cli.show_history().await,
        Some(Sessions(args)) => cli.list_sessions(&args).await,
        Some(Whoami(args)) => cli.whoami(args).await,
        None => cli.show_plan(&SelectionArgs::default()).await,
    }
}
