//! Session-scoped command bridge between UI surfaces and the simulation.
//!
//! [`ControlBridge`] is a cheap clone handle. [`open`](ControlBridge::open)
//! creates a fresh channel for a new session and returns its receiving end;
//! [`close`](ControlBridge::close) drops the sender so that every surface
//! call afterwards is a no-op. Surfaces resolve the sender on every call, so
//! a surface obtained during an earlier session can never reach a later one
//! through a stale channel.

use std::sync::{Arc, RwLock};

use crossbeam_channel::{Receiver, Sender, TryIter};
use glam::Vec2;
use orrery_input::Intent;
use tracing::{debug, info, trace};

use crate::command::{CameraCommand, ControlCommand, ShipCommand};

/// Receiving end of an open session's command channel.
pub struct CommandReceiver {
    rx: Receiver<ControlCommand>,
}

impl CommandReceiver {
    /// Commands queued since the last drain, without blocking.
    pub fn drain(&self) -> TryIter<'_, ControlCommand> {
        self.rx.try_iter()
    }

    /// Number of queued commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

#[derive(Clone, Default)]
pub struct ControlBridge {
    sender: Arc<RwLock<Option<Sender<ControlCommand>>>>,
}

impl std::fmt::Debug for ControlBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlBridge")
            .field("open", &self.is_open())
            .finish()
    }
}

impl ControlBridge {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start routing commands to a new receiver. Any previous session's
    /// channel is replaced.
    pub fn open(&self) -> CommandReceiver {
        let (tx, rx) = crossbeam_channel::unbounded();
        match self.sender.write() {
            Ok(mut slot) => {
                if slot.replace(tx).is_some() {
                    debug!("Control bridge reopened; previous channel dropped");
                }
                info!("Control bridge open");
            }
            Err(_) => debug!("Control bridge lock poisoned; bridge stays closed"),
        }
        CommandReceiver { rx }
    }

    /// Invalidate both surfaces. Idempotent.
    pub fn close(&self) {
        match self.sender.write() {
            Ok(mut slot) => {
                if slot.take().is_some() {
                    info!("Control bridge closed");
                }
            }
            Err(_) => debug!("Control bridge lock poisoned on close"),
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.sender.read().is_ok_and(|slot| slot.is_some())
    }

    /// Ship control surface.
    #[must_use]
    pub fn ship(&self) -> ShipControls<'_> {
        ShipControls { bridge: self }
    }

    /// Camera control surface.
    #[must_use]
    pub fn camera(&self) -> CameraControls<'_> {
        CameraControls { bridge: self }
    }

    /// Send a command to the open session. Returns `false`, and does nothing
    /// else, when no session is open.
    pub fn send(&self, command: impl Into<ControlCommand>) -> bool {
        let command = command.into();
        let Ok(slot) = self.sender.read() else {
            debug!(?command, "Control bridge lock poisoned; command dropped");
            return false;
        };
        match slot.as_ref() {
            Some(tx) => {
                if tx.send(command).is_ok() {
                    true
                } else {
                    debug!(?command, "Session receiver gone; command dropped");
                    false
                }
            }
            None => {
                trace!(?command, "No active session; command dropped");
                false
            }
        }
    }
}

/// Ship operations exposed to UI buttons and joysticks.
#[derive(Clone, Copy)]
pub struct ShipControls<'a> {
    bridge: &'a ControlBridge,
}

impl ShipControls<'_> {
    pub fn set_intent(&self, intent: Intent, active: bool) -> bool {
        self.bridge.send(ShipCommand::SetIntent { intent, active })
    }

    pub fn set_forward(&self, active: bool) -> bool {
        self.set_intent(Intent::Forward, active)
    }

    pub fn set_backward(&self, active: bool) -> bool {
        self.set_intent(Intent::Backward, active)
    }

    pub fn set_turn_left(&self, active: bool) -> bool {
        self.set_intent(Intent::TurnLeft, active)
    }

    pub fn set_turn_right(&self, active: bool) -> bool {
        self.set_intent(Intent::TurnRight, active)
    }

    pub fn set_pitch_up(&self, active: bool) -> bool {
        self.set_intent(Intent::PitchUp, active)
    }

    pub fn set_pitch_down(&self, active: bool) -> bool {
        self.set_intent(Intent::PitchDown, active)
    }

    /// Level-triggered turbo: stays on until set false.
    pub fn set_turbo(&self, active: bool) -> bool {
        self.set_intent(Intent::Turbo, active)
    }

    /// Level-triggered brake: stays on until set false.
    pub fn set_brake(&self, active: bool) -> bool {
        self.set_intent(Intent::Brake, active)
    }

    /// One-shot pulse of any intent.
    pub fn pulse(&self, intent: Intent) -> bool {
        self.bridge.send(ShipCommand::Pulse(intent))
    }

    pub fn pulse_turbo(&self) -> bool {
        self.pulse(Intent::Turbo)
    }

    pub fn pulse_brake(&self) -> bool {
        self.pulse(Intent::Brake)
    }

    /// Map a curve-shaped joystick vector to steering intents.
    pub fn update_joystick(&self, x: f32, y: f32) -> bool {
        self.bridge.send(ShipCommand::Joystick(Vec2::new(x, y)))
    }

    pub fn release_joystick(&self) -> bool {
        self.bridge.send(ShipCommand::JoystickReleased)
    }
}

/// Camera operations exposed to UI buttons and joysticks.
#[derive(Clone, Copy)]
pub struct CameraControls<'a> {
    bridge: &'a ControlBridge,
}

impl CameraControls<'_> {
    pub fn zoom_in(&self) -> bool {
        self.bridge.send(CameraCommand::ZoomIn)
    }

    pub fn zoom_out(&self) -> bool {
        self.bridge.send(CameraCommand::ZoomOut)
    }

    pub fn wheel(&self, lines: f32) -> bool {
        self.bridge.send(CameraCommand::Wheel(lines))
    }

    pub fn rotate(&self, dx: f32, dy: f32) -> bool {
        self.bridge.send(CameraCommand::RotateBy { dx, dy })
    }

    pub fn update_joystick(&self, x: f32, y: f32) -> bool {
        self.bridge.send(CameraCommand::Joystick(Vec2::new(x, y)))
    }

    pub fn reset(&self) -> bool {
        self.bridge.send(CameraCommand::Reset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calls_without_session_are_noops() {
        let bridge = ControlBridge::new();
        assert!(!bridge.is_open());
        assert!(!bridge.ship().set_forward(true));
        assert!(!bridge.ship().pulse_turbo());
        assert!(!bridge.camera().zoom_in());
        assert!(!bridge.camera().reset());
    }

    #[test]
    fn test_commands_delivered_in_order() {
        let bridge = ControlBridge::new();
        let rx = bridge.open();
        assert!(bridge.ship().set_turbo(true));
        assert!(bridge.camera().rotate(0.1, -0.2));
        assert!(bridge.ship().update_joystick(0.5, 0.0));
        let got: Vec<_> = rx.drain().collect();
        assert_eq!(
            got,
            vec![
                ControlCommand::Ship(ShipCommand::SetIntent {
                    intent: Intent::Turbo,
                    active: true
                }),
                ControlCommand::Camera(CameraCommand::RotateBy { dx: 0.1, dy: -0.2 }),
                ControlCommand::Ship(ShipCommand::Joystick(Vec2::new(0.5, 0.0))),
            ]
        );
        assert!(rx.is_empty());
    }

    #[test]
    fn test_close_invalidates_surfaces() {
        let bridge = ControlBridge::new();
        let rx = bridge.open();
        let ui_handle = bridge.clone();
        bridge.close();
        assert!(!ui_handle.is_open());
        assert!(!ui_handle.camera().zoom_out());
        assert_eq!(rx.len(), 0);
        // Closing twice is harmless.
        bridge.close();
    }

    #[test]
    fn test_reopen_routes_to_new_session_only() {
        let bridge = ControlBridge::new();
        let first = bridge.open();
        bridge.close();
        let second = bridge.open();
        assert!(bridge.ship().set_brake(true));
        assert_eq!(first.drain().count(), 0);
        assert_eq!(second.drain().count(), 1);
    }

    #[test]
    fn test_dropped_receiver_is_noop() {
        let bridge = ControlBridge::new();
        drop(bridge.open());
        assert!(bridge.is_open());
        assert!(!bridge.camera().wheel(1.0));
    }

    #[test]
    fn test_bridge_usable_from_other_thread() {
        let bridge = ControlBridge::new();
        let rx = bridge.open();
        let ui = bridge.clone();
        std::thread::spawn(move || {
            ui.ship().pulse_brake();
        })
        .join()
        .expect("ui thread");
        assert_eq!(
            rx.drain().next(),
            Some(ControlCommand::Ship(ShipCommand::Pulse(Intent::Brake)))
        );
    }
}
