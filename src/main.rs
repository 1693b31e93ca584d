//! media-janitor - Photo and video library housekeeping
//!
//! CLI entry point: sets up logging, loads the extension-set
//! configuration, and dispatches to the requested command.

use anyhow::Result;
use clap::Parser;
use media_janitor::cli::{Cli, Command};
use media_janitor::{Config, assign_date, count, dedupe, fix_dates, flatten, health, organize};
use std::path::Path;
use tracing::{Level, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let _guard = setup_logging(&cli)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "media-janitor starting"
    );

    let config = load_config(&cli)?;

    match &cli.command {
        Command::Organize {
            source,
            photo_dest,
            video_dest,
            dry_run,
            no_interactive,
        } => {
            let opts = organize::OrganizeOptions {
                source: source.clone(),
                photo_dest: photo_dest.clone(),
                video_dest: video_dest.clone(),
                dry_run: *dry_run,
                interactive: !*no_interactive,
            };
            validate_destinations(source, &[photo_dest, video_dest])?;
            organize::run(&opts, &config)
        }
        Command::Dedupe { root, execute } => dedupe::run(root, *execute),
        Command::FixDates { root, execute } => fix_dates::run(root, *execute, &config),
        Command::AssignDate {
            source,
            date,
            execute,
        } => assign_date::run(source, date, *execute, &config),
        Command::HealthCheck {
            root,
            execute,
            interactive,
            thresholds,
        } => {
            let opts = health::HealthCheckOptions {
                root: root.clone(),
                execute: *execute,
                interactive: *interactive,
                show_thresholds: *thresholds,
            };
            health::run(&opts, &config)
        }
        Command::Count { root } => count::run(root, &config),
        Command::Flatten {
            source,
            target,
            dry_run,
        } => {
            let target = target
                .clone()
                .unwrap_or_else(|| source.join("flattened"));
            flatten::run(source, &target, *dry_run)
        }
    }
}

/// Load configuration from file or fall back to the built-in defaults
fn load_config(cli: &Cli) -> Result<Config> {
    let config = match &cli.config {
        Some(path) => {
            info!(config_file = %path.display(), "Loading configuration from file");
            Config::load_from_file(path)?
        }
        None => Config::default(),
    };

    if cli.verbose {
        info!(?config, "Configuration loaded");
    }

    Ok(config)
}

/// Refuse destination roots nested inside the source tree
fn validate_destinations(source: &Path, dests: &[&std::path::PathBuf]) -> Result<()> {
    for dest in dests {
        if dest.starts_with(source) {
            anyhow::bail!(
                "destination {} is inside source {}",
                dest.display(),
                source.display()
            );
        }
    }
    Ok(())
}

/// Setup logging: stderr always, optionally a file appender too
fn setup_logging(cli: &Cli) -> Result<Option<WorkerGuard>> {
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let subscriber = tracing_subscriber::registry().with(env_filter);

    let guard = if let Some(log_path) = &cli.log_file {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)?;

        let (non_blocking, guard) = tracing_appender::non_blocking(file);

        if cli.json_log {
            subscriber
                .with(
                    fmt::layer()
                        .json()
                        .with_ansi(false)
                        .with_writer(non_blocking),
                )
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        } else {
            subscriber
                .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
        Some(guard)
    } else {
        if cli.json_log {
            subscriber
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        } else {
            subscriber
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
        None
    };

    Ok(guard)
}
