//! Arcade spaceship flight model.
//!
//! Forward/backward intents accelerate along the ship's local -Z/+Z axis,
//! turn and pitch intents accelerate yaw and pitch rates. Velocity and both
//! rates persist with no drag: the ship drifts until opposite thrust is
//! applied. Turbo and brake scale acceleration and the speed cap, and
//! cancel each other when held together.

use glam::{Quat, Vec3};
use orrery_config::FlightConfig;
use orrery_input::IntentState;
use tracing::trace;

/// Acceleration and speed multipliers for one speed mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedModifier {
    pub acceleration: f32,
    pub max_speed: f32,
}

impl SpeedModifier {
    pub const NONE: Self = Self {
        acceleration: 1.0,
        max_speed: 1.0,
    };
}

/// Flight constants. Acceleration values are per second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightTuning {
    pub acceleration: f32,
    pub max_speed: f32,
    pub rotation_acceleration: f32,
    pub max_rotation_speed: f32,
    /// Longest frame the model will integrate in one step, in seconds.
    pub max_tick_delta: f32,
    /// Rates at or below this magnitude do not rotate the ship.
    pub rate_epsilon: f32,
    pub turbo: SpeedModifier,
    pub brake: SpeedModifier,
}

impl Default for FlightTuning {
    fn default() -> Self {
        Self::from(&FlightConfig::default())
    }
}

impl From<&FlightConfig> for FlightTuning {
    fn from(config: &FlightConfig) -> Self {
        Self {
            acceleration: config.acceleration,
            max_speed: config.max_speed,
            rotation_acceleration: config.rotation_acceleration,
            max_rotation_speed: config.max_rotation_speed,
            max_tick_delta: config.max_tick_delta,
            rate_epsilon: config.rate_epsilon,
            turbo: SpeedModifier {
                acceleration: config.turbo_acceleration,
                max_speed: config.turbo_max_speed,
            },
            brake: SpeedModifier {
                acceleration: config.brake_acceleration,
                max_speed: config.brake_max_speed,
            },
        }
    }
}

/// Which speed modifier applies this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedMode {
    Cruise,
    Turbo,
    Brake,
}

impl SpeedMode {
    /// Turbo and brake held together cancel out.
    #[must_use]
    pub fn from_intent(intent: &IntentState) -> Self {
        match (intent.turbo, intent.brake) {
            (true, false) => Self::Turbo,
            (false, true) => Self::Brake,
            _ => Self::Cruise,
        }
    }
}

/// Per-direction thruster display flags, mirroring the active intents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThrusterFlags {
    pub forward: bool,
    pub backward: bool,
    pub yaw_left: bool,
    pub yaw_right: bool,
    pub pitch_up: bool,
    pub pitch_down: bool,
}

impl ThrusterFlags {
    #[must_use]
    pub fn from_intent(intent: &IntentState) -> Self {
        Self {
            forward: intent.forward,
            backward: intent.backward,
            yaw_left: intent.turn_left,
            yaw_right: intent.turn_right,
            pitch_up: intent.pitch_up,
            pitch_down: intent.pitch_down,
        }
    }
}

/// Ship pose and motion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShipKinematics {
    pub position: Vec3,
    pub orientation: Quat,
    pub velocity: Vec3,
    /// Yaw rate in rad/s, positive turns left.
    pub rotation_velocity: f32,
    /// Pitch rate in rad/s, positive pitches up.
    pub pitch_velocity: f32,
}

impl Default for ShipKinematics {
    fn default() -> Self {
        Self::at_rest(Vec3::ZERO)
    }
}

impl ShipKinematics {
    /// Stationary ship at `position` with identity orientation.
    #[must_use]
    pub fn at_rest(position: Vec3) -> Self {
        Self {
            position,
            orientation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
            rotation_velocity: 0.0,
            pitch_velocity: 0.0,
        }
    }

    /// Stationary ship at `position`, yawed so its nose points at the origin.
    #[must_use]
    pub fn facing_origin(position: Vec3) -> Self {
        let mut ship = Self::at_rest(position);
        if position.x.abs() > f32::EPSILON || position.z.abs() > f32::EPSILON {
            ship.orientation = Quat::from_rotation_y(position.x.atan2(position.z));
        }
        ship
    }

    /// Unit vector along the ship's nose.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::NEG_Z
    }

    #[must_use]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}

/// Integrates [`ShipKinematics`] from [`IntentState`] once per tick.
#[derive(Debug, Clone)]
pub struct FlightModel {
    tuning: FlightTuning,
    kinematics: ShipKinematics,
    thrusters: ThrusterFlags,
}

impl FlightModel {
    #[must_use]
    pub fn new(tuning: FlightTuning, kinematics: ShipKinematics) -> Self {
        Self {
            tuning,
            kinematics,
            thrusters: ThrusterFlags::default(),
        }
    }

    #[must_use]
    pub fn tuning(&self) -> &FlightTuning {
        &self.tuning
    }

    #[must_use]
    pub fn kinematics(&self) -> &ShipKinematics {
        &self.kinematics
    }

    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.kinematics.position
    }

    #[must_use]
    pub fn orientation(&self) -> Quat {
        self.kinematics.orientation
    }

    #[must_use]
    pub fn thrusters(&self) -> ThrusterFlags {
        self.thrusters
    }

    /// Speed cap for a given mode.
    #[must_use]
    pub fn speed_limit(&self, mode: SpeedMode) -> f32 {
        self.tuning.max_speed * self.modifier(mode).max_speed
    }

    fn modifier(&self, mode: SpeedMode) -> SpeedModifier {
        match mode {
            SpeedMode::Cruise => SpeedModifier::NONE,
            SpeedMode::Turbo => self.tuning.turbo,
            SpeedMode::Brake => self.tuning.brake,
        }
    }

    /// Advance one tick. `dt` is clamped to `[0, max_tick_delta]`; the value
    /// actually integrated is returned.
    pub fn tick(&mut self, intent: &IntentState, dt: f32) -> f32 {
        let dt = if dt.is_finite() {
            dt.clamp(0.0, self.tuning.max_tick_delta)
        } else {
            0.0
        };

        let mode = SpeedMode::from_intent(intent);
        let modifier = self.modifier(mode);
        let acceleration = self.tuning.acceleration * dt * modifier.acceleration;
        let max_speed = self.tuning.max_speed * modifier.max_speed;
        let rot_acceleration = self.tuning.rotation_acceleration * dt;
        let max_rot = self.tuning.max_rotation_speed;

        let ship = &mut self.kinematics;

        if intent.forward {
            ship.velocity += ship.orientation * Vec3::NEG_Z * acceleration;
        }
        if intent.backward {
            ship.velocity += ship.orientation * Vec3::Z * acceleration;
        }
        if intent.turn_left {
            ship.rotation_velocity += rot_acceleration;
        }
        if intent.turn_right {
            ship.rotation_velocity -= rot_acceleration;
        }
        if intent.pitch_up {
            ship.pitch_velocity += rot_acceleration;
        }
        if intent.pitch_down {
            ship.pitch_velocity -= rot_acceleration;
        }

        ship.velocity = ship.velocity.clamp_length_max(max_speed.max(0.0));
        ship.rotation_velocity = ship.rotation_velocity.clamp(-max_rot, max_rot);
        ship.pitch_velocity = ship.pitch_velocity.clamp(-max_rot, max_rot);

        ship.position += ship.velocity * dt;

        // Rotations compose in the ship's local frame: yaw about local Y,
        // then pitch about the new local X.
        if ship.rotation_velocity.abs() > self.tuning.rate_epsilon {
            ship.orientation *= Quat::from_rotation_y(ship.rotation_velocity * dt);
        }
        if ship.pitch_velocity.abs() > self.tuning.rate_epsilon {
            ship.orientation *= Quat::from_rotation_x(ship.pitch_velocity * dt);
        }
        ship.orientation = ship.orientation.normalize();

        self.thrusters = ThrusterFlags::from_intent(intent);
        trace!(?mode, speed = ship.velocity.length(), dt, "Flight tick");
        dt
    }
}
