//! permitlens CLI
//!
//! Builds, renders, validates and serves the building permits dashboard.

#![warn(clippy::all)]
#![forbid(unsafe_code)]

use anyhow::{Context, Result};
use clap::Parser;
use permitlens_cli::serve::{self, AppState};
use permitlens_cli::{Args, Command, commands, config_handlers};
use permitlens_core::{ConfigManager, DashboardConfig};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config_path = args.config.as_deref();
    let load = || DashboardConfig::load(config_path).context("failed to load configuration");

    match args.command {
        Command::Spec { year, compact } => {
            let config = load()?;
            println!("{}", commands::spec_json(&config, year.as_deref(), compact)?);
        }
        Command::Render { year, out } => {
            let config = load()?;
            let report = commands::render_to_file(&config, year.as_deref(), &out)?;
            println!(
                "Rendered {} into {} ({} panels)",
                report.year,
                out.display(),
                report.interaction_order.len()
            );
        }
        Command::Page { year, out } => {
            let config = load()?;
            commands::write_page(&config, year.as_deref(), &out)?;
            println!("Page written to {}", out.display());
        }
        Command::Validate { file, data_dir } => {
            let config = load()?;
            let summary = commands::validate(&config, file.as_deref())?;
            print!("{}", summary.render());
            if let Some(dir) = data_dir {
                let path = commands::check_records(&config, &dir)?;
                println!("Records: {} has every required column", path.display());
            }
        }
        Command::Serve {
            host,
            port,
            data_dir,
        } => {
            let config = load()?;
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let data_dir = data_dir.unwrap_or_else(|| PathBuf::from(&config.server.data_dir));
            if let Err(e) = commands::check_records(&config, &data_dir) {
                tracing::warn!(error = %e, "records file will not render");
            }
            let state = AppState::new(config, data_dir)?;
            serve::run(state, &format!("{host}:{port}")).await?;
        }
        // Config commands must work even when the config file is broken.
        Command::Config { action } => {
            println!("{}", config_handlers::handle_config_command(config_path, action)?);
        }
    }

    Ok(())
}
