//! Configuration structs with sensible defaults and RON persistence.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level Orrery configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Window settings.
    pub window: WindowConfig,
    /// Input settings.
    pub input: InputConfig,
    /// Ship flight tuning.
    pub flight: FlightConfig,
    /// Third-person camera limits and sensitivities.
    pub camera: CameraConfig,
    /// On-screen joystick geometry.
    pub joystick: JoystickConfig,
    /// Telemetry sampling cadence.
    pub telemetry: TelemetryConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width in logical pixels.
    pub width: u32,
    /// Window height in logical pixels.
    pub height: u32,
    /// Window title prefix. Telemetry is appended while a session runs.
    pub title: String,
}

/// Input configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// Keybinding overrides (key name -> action name).
    pub keybindings: HashMap<String, String>,
    /// Camera orbit radians per pixel of mouse drag.
    pub drag_sensitivity: f32,
    /// Camera distance units per wheel line.
    pub wheel_sensitivity: f32,
    /// Invert vertical drag for camera orbit.
    pub invert_y: bool,
    /// Analog stick deadzone for gamepads.
    pub gamepad_deadzone: f32,
}

/// Ship flight tuning. All rates are per second.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FlightConfig {
    /// Linear acceleration in units/s².
    pub acceleration: f32,
    /// Speed cap in units/s.
    pub max_speed: f32,
    /// Yaw/pitch angular acceleration in rad/s².
    pub rotation_acceleration: f32,
    /// Yaw/pitch rate cap in rad/s.
    pub max_rotation_speed: f32,
    /// Largest time step the integrator accepts, in seconds.
    pub max_tick_delta: f32,
    /// Angular rates at or below this are not applied.
    pub rate_epsilon: f32,
    /// Acceleration multiplier while turbo is held.
    pub turbo_acceleration: f32,
    /// Speed cap multiplier while turbo is held.
    pub turbo_max_speed: f32,
    /// Acceleration multiplier while brake is held.
    pub brake_acceleration: f32,
    /// Speed cap multiplier while brake is held.
    pub brake_max_speed: f32,
    /// Ship spawn position in world units.
    pub start_position: [f32; 3],
}

/// Third-person camera configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Distance restored by reset.
    pub default_distance: f32,
    /// Elevation restored by reset, radians.
    pub default_rotation_x: f32,
    /// Azimuth restored by reset, radians.
    pub default_rotation_y: f32,
    /// Closest zoom.
    pub min_distance: f32,
    /// Farthest zoom.
    pub max_distance: f32,
    /// Lowest elevation, radians.
    pub min_rotation_x: f32,
    /// Highest elevation, radians.
    pub max_rotation_x: f32,
    /// Distance change per zoom button press.
    pub zoom_step: f32,
    /// Radians per curved joystick unit.
    pub joystick_sensitivity: f32,
    /// Joystick offset at which the response curve is linear.
    pub curve_pivot: f32,
    /// Exponent of the joystick response curve.
    pub curve_power: f32,
    /// Maximum wheel zoom updates accepted per second.
    pub wheel_updates_per_second: f32,
}

/// On-screen joystick configuration (logical pixels).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct JoystickConfig {
    /// Radius of each joystick widget.
    pub radius: f32,
    /// Inset keeping the ship knob inside its track.
    pub ship_knob_margin: f32,
    /// Inset keeping the camera knob inside its track.
    pub camera_knob_margin: f32,
    /// Offsets shorter than this read as centred.
    pub dead_zone: f32,
    /// Maximum ship knob tilt in degrees.
    pub ship_tilt_degrees: f32,
    /// Maximum camera knob tilt in degrees.
    pub camera_tilt_degrees: f32,
    /// Scale applied to the camera knob vector before it reaches the rig.
    pub camera_feed_scale: f32,
    /// Curved ship joystick magnitude that engages a steering intent.
    pub intent_threshold: f32,
    /// Synthetic knob offset per axis while a steering key is held.
    pub keyboard_step: f32,
}

/// Telemetry configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Sample the ship every N ticks.
    pub sample_every_ticks: u32,
    /// How often the display polls the published snapshot, in milliseconds.
    pub poll_interval_ms: u64,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            title: "Orrery".to_string(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            keybindings: HashMap::new(),
            drag_sensitivity: 0.005,
            wheel_sensitivity: 10.0,
            invert_y: false,
            gamepad_deadzone: 0.15,
        }
    }
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            acceleration: 10.0,
            max_speed: 1000.0,
            rotation_acceleration: 0.5,
            max_rotation_speed: 5.0,
            max_tick_delta: 0.05,
            rate_epsilon: 0.001,
            turbo_acceleration: 2.0,
            turbo_max_speed: 1.5,
            brake_acceleration: 0.5,
            brake_max_speed: 0.66,
            start_position: [250.0, 50.0, 150.0],
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            default_distance: 50.0,
            default_rotation_x: 0.5,
            default_rotation_y: 1.0,
            min_distance: 30.0,
            max_distance: 500.0,
            min_rotation_x: -1.2,
            max_rotation_x: 1.2,
            zoom_step: 10.0,
            joystick_sensitivity: 0.003,
            curve_pivot: 40.0,
            curve_power: 1.5,
            wheel_updates_per_second: 60.0,
        }
    }
}

impl Default for JoystickConfig {
    fn default() -> Self {
        Self {
            radius: 72.0,
            ship_knob_margin: 8.0,
            camera_knob_margin: 14.0,
            dead_zone: 2.0,
            ship_tilt_degrees: 10.0,
            camera_tilt_degrees: 15.0,
            camera_feed_scale: 0.5,
            intent_threshold: 0.1,
            keyboard_step: 15.0,
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            sample_every_ticks: 30,
            poll_interval_ms: 500,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Platform config directory for Orrery (`<config_dir>/orrery`), falling back
/// to `./config` when the platform reports none.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("orrery"))
        .unwrap_or_else(|| PathBuf::from("config"))
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
