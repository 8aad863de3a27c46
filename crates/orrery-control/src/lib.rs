//! Control surfaces reachable from outside the simulation loop.
//!
//! UI elements hold a [`ControlBridge`] and call the ship and camera surfaces
//! on it. Calls become typed [`ControlCommand`]s on a channel that only exists
//! while a session is open; with no session every call is a silent no-op.

pub mod bridge;
pub mod command;
pub mod timers;

pub use bridge::{CameraControls, CommandReceiver, ControlBridge, ShipControls};
pub use command::{CameraCommand, ControlCommand, ShipCommand};
pub use timers::{DeferredActions, IntentPulses, PULSE_DURATION, TimerHandle};
