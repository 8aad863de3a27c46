//! Configuration system for Orrery.
//!
//! Flight tuning, camera limits, joystick geometry and telemetry cadence are
//! runtime-configurable and persist to disk as a RON file. Supports CLI
//! overrides via clap, hot-reload detection, and forward/backward compatible
//! serialization.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CameraConfig, Config, DebugConfig, FlightConfig, InputConfig, JoystickConfig,
    TelemetryConfig, WindowConfig, default_config_dir,
};
pub use error::ConfigError;
