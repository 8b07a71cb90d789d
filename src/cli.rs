/*
 * This file is part of Browserprint.
 *
 * Copyright (C) 2025 Browserprint contributors
 *
 * Browserprint is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Browserprint is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Browserprint. If not, see <https://www.gnu.org/licenses/>.
 */

//! Command Line Interface
//!
//! `collect` runs the pipeline against an environment snapshot and renders
//! the result. The remaining commands inspect snapshots, the probe catalog
//! and settings.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use bp_core::{
    deliver, Collection, CollectionPipeline, Environment, OutputSink, ProbeCatalog,
    SnapshotEnvironment,
};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, warn};

use crate::config::{
    get_settings_path, load_settings_from, save_settings_to, OutputFormat, Settings,
};
use crate::output::sinks_for;
use crate::upload::Uploader;

#[derive(Parser, Debug)]
#[command(name = "browserprint")]
#[command(version)]
#[command(about = "Browserprint - browser fingerprint collection")]
#[command(long_about = "Browserprint - browser fingerprint collection

Runs an ordered catalog of probes against a browser environment, seals the
observed signals into a fingerprint record and derives a short digest.

EXAMPLES:
    browserprint collect                         Collect from the built-in snapshot
    browserprint collect --env firefox.json      Collect from a captured environment
    browserprint collect --format json           Print the upload payload
    browserprint collect --upload https://host/store-fingerprint
    browserprint snapshot > env.json             Write an editable environment snapshot
    browserprint catalog                         List probes in collection order
    browserprint settings show                   Show settings as JSON

ENVIRONMENT VARIABLES:
    RUST_LOG=debug              Override the configured log level
    BROWSERPRINT_CONFIG=PATH    Use another settings file

FILES:
    ~/.config/browserprint/settings.json   Application settings")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Settings file to use instead of the default location
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug diagnostics on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn settings_path(&self) -> bp_error::Result<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => get_settings_path(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Collect a fingerprint
    Collect(CollectArgs),

    /// Print the built-in environment snapshot as JSON
    Snapshot {
        /// Write to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// List probes in collection order
    Catalog,

    /// Settings management
    #[command(subcommand, about = "View and initialize settings")]
    Settings(SettingsCommands),
}

#[derive(Args, Debug, Default)]
pub struct CollectArgs {
    /// Environment snapshot to collect from (JSON)
    #[arg(long, value_name = "FILE")]
    pub env: Option<PathBuf>,

    /// Output format, overrides settings
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Upload the payload to this endpoint, overrides settings
    #[arg(long, value_name = "URL")]
    pub upload: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommands {
    /// Show all settings as JSON
    Show,
    /// Print the settings file location
    Path,
    /// Write default settings
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

pub async fn run_cli(cli: &Cli, settings: &Settings) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Collect(args) => cmd_collect(args, settings).await,
        Commands::Snapshot { output } => cmd_snapshot(output.as_deref()),
        Commands::Catalog => {
            cmd_catalog();
            Ok(())
        }
        Commands::Settings(sub) => cmd_settings(sub, &cli.settings_path()?, settings),
    }
}

// ============================================================================
// Collect
// ============================================================================

/// Environment named by `--env`, or the built-in snapshot
pub fn load_environment(path: Option<&Path>) -> anyhow::Result<SnapshotEnvironment> {
    match path {
        Some(path) => SnapshotEnvironment::load(path)
            .with_context(|| format!("Failed to load environment from {}", path.display())),
        None => Ok(SnapshotEnvironment::default()),
    }
}

/// Collect from `env` and hand the result to `sinks`. Sink failures are
/// logged by [`deliver`] and do not fail the run.
pub fn run_collection(
    env: &dyn Environment,
    sinks: &mut [Box<dyn OutputSink>],
) -> anyhow::Result<Collection> {
    let pipeline = CollectionPipeline::new(ProbeCatalog::standard());
    let collection = pipeline.collect(env).context("Fingerprint collection failed")?;

    for report in collection.degraded_probes() {
        debug!(probe = report.probe, status = ?report.status, "Degraded probe");
    }

    let failures = deliver(&collection, sinks);
    if failures > 0 {
        warn!(failures, "Some output sinks failed");
    }
    Ok(collection)
}

/// Endpoint for this run: the flag first, then settings
fn upload_endpoint<'a>(args: &'a CollectArgs, settings: &'a Settings) -> Option<&'a str> {
    args.upload.as_deref().or_else(|| settings.upload_endpoint())
}

async fn cmd_collect(args: &CollectArgs, settings: &Settings) -> anyhow::Result<()> {
    let env = load_environment(args.env.as_deref())?;
    let format = args.format.unwrap_or(settings.output.format);
    let mut sinks = sinks_for(format);
    let collection = run_collection(&env, &mut sinks)?;

    if let Some(endpoint) = upload_endpoint(args, settings) {
        let timeout = Duration::from_millis(settings.upload.timeout_ms);
        match Uploader::new(endpoint, timeout) {
            // Transmission never affects the outcome of the run
            Ok(uploader) => {
                let _ = uploader.spawn(collection.to_payload()).await;
            }
            Err(e) => warn!(error = %e, "Upload skipped"),
        }
    }
    Ok(())
}

// ============================================================================
// Snapshot / Catalog
// ============================================================================

fn cmd_snapshot(output: Option<&Path>) -> anyhow::Result<()> {
    let json = SnapshotEnvironment::default().to_json_pretty()?;
    match output {
        Some(path) => {
            std::fs::write(path, format!("{}\n", json))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote environment snapshot to {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn cmd_catalog() {
    let catalog = ProbeCatalog::standard();
    println!("Probe catalog v{} ({} probes):", catalog.version(), catalog.len());
    for (i, name) in catalog.names().iter().enumerate() {
        println!("  {:>2}. {}", i + 1, name);
    }
}

// ============================================================================
// Settings
// ============================================================================

fn cmd_settings(cmd: &SettingsCommands, path: &Path, settings: &Settings) -> anyhow::Result<()> {
    match cmd {
        SettingsCommands::Show => {
            println!("{}", serde_json::to_string_pretty(settings)?);
        }
        SettingsCommands::Path => {
            println!("{}", path.display());
        }
        SettingsCommands::Init { force } => {
            if path.exists() && !force {
                anyhow::bail!(
                    "{} already exists. Use --force to overwrite.",
                    path.display()
                );
            }
            save_settings_to(path, &Settings::default())?;
            println!("Wrote default settings to {}", path.display());
        }
    }
    Ok(())
}

/// Settings for this invocation. A broken file falls back to defaults so
/// `settings init --force` can still repair it.
pub fn load_cli_settings(cli: &Cli) -> Settings {
    let loaded = cli.settings_path().and_then(|path| load_settings_from(&path));
    match loaded {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Warning: {}. Using default settings.", e);
            Settings::default()
        }
    }
}
