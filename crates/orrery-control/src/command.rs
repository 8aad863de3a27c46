//! Typed commands carried from UI surfaces to the session.

use glam::Vec2;
use orrery_input::Intent;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShipCommand {
    /// Level-triggered intent change.
    SetIntent { intent: Intent, active: bool },
    /// Hold an intent for [`PULSE_DURATION`](crate::PULSE_DURATION), then
    /// release it. A new pulse of the same intent restarts the window.
    Pulse(Intent),
    /// Curve-shaped ship joystick vector, mapped to steering intents.
    Joystick(Vec2),
    /// Ship joystick let go: clear steering, except what held keys still
    /// ask for.
    JoystickReleased,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraCommand {
    ZoomIn,
    ZoomOut,
    /// Wheel zoom in lines, positive zooms in. Subject to the rate limit.
    Wheel(f32),
    /// Add `dx` to the elevation and `dy` to the azimuth, in radians.
    RotateBy { dx: f32, dy: f32 },
    /// Camera joystick feed vector.
    Joystick(Vec2),
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlCommand {
    Ship(ShipCommand),
    Camera(CameraCommand),
}

impl From<ShipCommand> for ControlCommand {
    fn from(command: ShipCommand) -> Self {
        Self::Ship(command)
    }
}

impl From<CameraCommand> for ControlCommand {
    fn from(command: CameraCommand) -> Self {
        Self::Camera(command)
    }
}
