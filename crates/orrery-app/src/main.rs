//! The `orrery` binary.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI
//! flags. Run with `cargo run -p orrery-app` to open the window, or with
//! `-- --headless 600` for a ten-second windowless smoke run.

use clap::Parser;
use orrery_app::{AppError, run, run_headless};
use orrery_config::{CliArgs, Config, default_config_dir};
use tracing::{info, warn};

fn main() -> Result<(), AppError> {
    let args = CliArgs::parse();

    let config_dir = args.config.clone().unwrap_or_else(default_config_dir);

    // Load or create config, then apply CLI overrides. An explicitly named
    // config directory must load; the default location falls back.
    let mut config = match Config::load_or_create(&config_dir) {
        Ok(config) => config,
        Err(e) if args.config.is_some() => return Err(e.into()),
        Err(e) => {
            eprintln!("Failed to load config: {e}, using defaults");
            Config::default()
        }
    };
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    orrery_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));
    info!(config_dir = %config_dir.display(), "Orrery starting");

    if let Some(ticks) = args.headless {
        run_headless(&config, ticks);
        return Ok(());
    }

    if let Err(e) = run(config) {
        warn!("Event loop exited with error: {e}");
        return Err(e.into());
    }
    Ok(())
}
