//! Application entry point for the animated widget viewer.
//!
//! This binary parses the command line, loads and validates the widget
//! configuration, then hands everything to [`Viewer`].

mod viewer;

use std::{fs, path::Path, path::PathBuf};

use anim_core::config::Config;
use anyhow::{Context, Result, anyhow};
use clap::Parser;
use tracing::{info, warn};
use viewer::Viewer;

#[derive(Parser, Debug)]
#[command(
    name = "anim-view",
    version,
    about = "Interactive host for the animated portfolio widgets"
)]
struct Cli {
    /// JSON configuration file; missing fields take their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fixed RNG seed, overriding the one in the config file.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut cfg = load_config(cli.config.as_deref())?;
    if cli.seed.is_some() {
        cfg.seed = cli.seed;
    }
    if let Err(err) = cfg.validate() {
        warn!(%err, "rejected configuration");
        return Err(err).context("invalid configuration");
    }
    info!(seed = ?cfg.seed, "starting viewer");

    let viewer = Viewer::new(cfg).context("failed to mount widgets")?;

    eframe::run_native(
        "Animated widgets",
        eframe::NativeOptions::default(),
        Box::new(|_cc| Ok(Box::new(viewer))),
    )
    .map_err(|err| anyhow!("viewer window failed: {err}"))
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Reads `path` as JSON, or returns the defaults when no path is given.
fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        info!("using default configuration");
        return Ok(Config::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let cfg = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    info!(path = %path.display(), "loaded configuration");
    Ok(cfg)
}
