//! Third-person orbit camera: tracks the ship, user controls orbit and zoom.
//!
//! Two control sources feed the rig without conflict. Passive tracking
//! snaps the look-at point to the ship every tick. Active orbit changes
//! distance and angles from buttons, drag, wheel or joystick. The eye sits
//! at `target + spherical(distance, rotation_y, rotation_x)` and always
//! looks at the target.
//!
//! The rig does nothing until [`CameraRig::on_target_attached`] fires; that
//! notification is honoured exactly once.

use std::time::Duration;

use glam::{Mat3, Quat, Vec2, Vec3};
use orrery_config::{CameraConfig, InputConfig};
use orrery_input::exponential_curve;
use tracing::{debug, info, trace};

/// Limits, defaults and sensitivities of the rig.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSettings {
    pub default_distance: f32,
    pub default_rotation_x: f32,
    pub default_rotation_y: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_rotation_x: f32,
    pub max_rotation_x: f32,
    /// Distance change per zoom button press.
    pub zoom_step: f32,
    /// Distance change per wheel line.
    pub wheel_sensitivity: f32,
    /// Radians per dragged pixel.
    pub drag_sensitivity: f32,
    pub invert_y: bool,
    /// Radians per curved joystick unit.
    pub joystick_sensitivity: f32,
    pub curve_pivot: f32,
    pub curve_power: f32,
    /// Minimum spacing between applied wheel zooms.
    pub wheel_interval: Duration,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default(), &InputConfig::default())
    }
}

impl CameraSettings {
    #[must_use]
    pub fn from_config(camera: &CameraConfig, input: &InputConfig) -> Self {
        let wheel_interval = if camera.wheel_updates_per_second > 0.0 {
            Duration::try_from_secs_f32(1.0 / camera.wheel_updates_per_second)
                .unwrap_or(Duration::MAX)
        } else {
            Duration::ZERO
        };
        Self {
            default_distance: camera.default_distance,
            default_rotation_x: camera.default_rotation_x,
            default_rotation_y: camera.default_rotation_y,
            min_distance: camera.min_distance,
            max_distance: camera.max_distance.max(camera.min_distance),
            min_rotation_x: camera.min_rotation_x,
            max_rotation_x: camera.max_rotation_x.max(camera.min_rotation_x),
            zoom_step: camera.zoom_step,
            wheel_sensitivity: input.wheel_sensitivity,
            drag_sensitivity: input.drag_sensitivity,
            invert_y: input.invert_y,
            joystick_sensitivity: camera.joystick_sensitivity,
            curve_pivot: camera.curve_pivot,
            curve_power: camera.curve_power,
            wheel_interval,
        }
    }

    /// The pose [`CameraRig::reset`] restores.
    #[must_use]
    pub fn default_state(&self) -> CameraState {
        CameraState {
            distance: self.default_distance.clamp(self.min_distance, self.max_distance),
            rotation_x: self
                .default_rotation_x
                .clamp(self.min_rotation_x, self.max_rotation_x),
            rotation_y: self.default_rotation_y,
        }
    }
}

/// Orbit distance and angles. `rotation_x` is elevation, `rotation_y` azimuth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub distance: f32,
    pub rotation_x: f32,
    pub rotation_y: f32,
}

impl CameraState {
    /// Eye offset from the target.
    #[must_use]
    pub fn offset(&self) -> Vec3 {
        let (sin_x, cos_x) = self.rotation_x.sin_cos();
        let (sin_y, cos_y) = self.rotation_y.sin_cos();
        Vec3::new(
            self.distance * sin_y * cos_x,
            self.distance * sin_x,
            self.distance * cos_y * cos_x,
        )
    }
}

/// Where the renderer should put the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub eye: Vec3,
    pub look_at: Vec3,
    /// Orientation with local -Z pointing from `eye` to `look_at`.
    pub rotation: Quat,
}

impl CameraPose {
    fn looking_at(eye: Vec3, look_at: Vec3) -> Self {
        let to_target = look_at - eye;
        let rotation = if to_target.length_squared() > 1e-6 {
            let back = -to_target.normalize();
            let right = Vec3::Y.cross(back).normalize_or_zero();
            let up = back.cross(right);
            Quat::from_mat3(&Mat3::from_cols(right, up, back))
        } else {
            Quat::IDENTITY
        };
        Self {
            eye,
            look_at,
            rotation,
        }
    }
}

/// Drops events that arrive faster than a fixed rate.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    interval: Duration,
    last: Option<Duration>,
}

impl RateLimiter {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// Whether an event at `now` may pass. Passing events start a new window.
    pub fn allow(&mut self, now: Duration) -> bool {
        if let Some(last) = self.last
            && now.saturating_sub(last) < self.interval
        {
            return false;
        }
        self.last = Some(now);
        true
    }
}

/// Orbit camera following a single target.
#[derive(Debug, Clone)]
pub struct CameraRig {
    settings: CameraSettings,
    state: CameraState,
    target: Option<Vec3>,
    wheel_limiter: RateLimiter,
}

impl CameraRig {
    #[must_use]
    pub fn new(settings: CameraSettings) -> Self {
        Self {
            state: settings.default_state(),
            wheel_limiter: RateLimiter::new(settings.wheel_interval),
            settings,
            target: None,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &CameraSettings {
        &self.settings
    }

    #[must_use]
    pub fn state(&self) -> CameraState {
        self.state
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.target.is_some()
    }

    /// One-time initialisation when the tracked target comes into existence.
    /// Returns `false` (and changes nothing) on every call after the first.
    pub fn on_target_attached(&mut self, position: Vec3) -> bool {
        if self.target.is_some() {
            trace!("Camera target already attached");
            return false;
        }
        self.target = Some(position);
        info!(?position, "Camera attached to target");
        true
    }

    /// Follow the target for this tick. Returns `None` before attachment.
    pub fn tick(&mut self, target: Vec3) -> Option<CameraPose> {
        let tracked = self.target.as_mut()?;
        *tracked = target;
        self.pose()
    }

    /// Current pose, if attached.
    #[must_use]
    pub fn pose(&self) -> Option<CameraPose> {
        let target = self.target?;
        Some(CameraPose::looking_at(target + self.state.offset(), target))
    }

    pub fn zoom_in(&mut self) {
        self.set_distance(self.state.distance - self.settings.zoom_step);
    }

    pub fn zoom_out(&mut self) {
        self.set_distance(self.state.distance + self.settings.zoom_step);
    }

    /// Continuous zoom from the wheel; positive `lines` zooms in.
    /// Returns `false` if the event was dropped by the rate limit.
    pub fn zoom_wheel(&mut self, lines: f32, now: Duration) -> bool {
        if lines == 0.0 || !lines.is_finite() {
            return false;
        }
        if !self.wheel_limiter.allow(now) {
            trace!(lines, "Wheel zoom rate-limited");
            return false;
        }
        self.set_distance(self.state.distance - lines * self.settings.wheel_sensitivity);
        true
    }

    /// Add `dx` to the elevation (clamped) and `dy` to the azimuth.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.set_rotation_x(self.state.rotation_x + dx);
        if dy.is_finite() {
            self.state.rotation_y += dy;
        }
    }

    /// Orbit from a pointer drag in pixels.
    pub fn drag(&mut self, delta: Vec2) {
        let sens = self.settings.drag_sensitivity;
        let dy = if self.settings.invert_y { delta.y } else { -delta.y };
        self.rotate(dy * sens, -delta.x * sens);
    }

    /// Continuous orbit from the camera joystick feed. Each axis goes through
    /// the exponential curve; screen-up raises the camera.
    pub fn update_joystick(&mut self, v: Vec2) {
        let s = &self.settings;
        let x = exponential_curve(v.x, s.curve_pivot, s.curve_power);
        let y = exponential_curve(v.y, s.curve_pivot, s.curve_power);
        let sens = s.joystick_sensitivity;
        self.rotate(-y * sens, x * sens);
    }

    /// Restore default distance and angles.
    pub fn reset(&mut self) {
        self.state = self.settings.default_state();
        debug!("Camera reset");
    }

    fn set_distance(&mut self, distance: f32) {
        if distance.is_finite() {
            self.state.distance =
                distance.clamp(self.settings.min_distance, self.settings.max_distance);
        }
    }

    fn set_rotation_x(&mut self, rotation_x: f32) {
        if rotation_x.is_finite() {
            self.state.rotation_x =
                rotation_x.clamp(self.settings.min_rotation_x, self.settings.max_rotation_x);
        }
    }
}
