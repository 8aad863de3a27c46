//! Pointer gesture lifetime tracking.
//!
//! A gesture begins when a mouse button or touch goes down, and it ends on
//! release or cancel. While it is live it owns one move listener and one
//! release listener. [`GestureTracker`] keeps that bookkeeping explicit, so
//! every attach has a matching detach. That holds for normal release,
//! for abnormal cancel and for session teardown through
//! [`cancel_all`](GestureTracker::cancel_all).
//!
//! A gesture that starts on a joystick widget owns that widget until it
//! ends. A second pointer landing on an owned widget is ignored.

use glam::Vec2;
use tracing::{debug, trace};

use crate::joystick::JoystickKind;

/// Listeners attached per live gesture (move + release).
const LISTENERS_PER_GESTURE: usize = 2;

/// Identifies a pointer source.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum PointerId {
    Mouse,
    Touch(u64),
}

/// What a gesture is manipulating.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum GestureTarget {
    /// Dragging a joystick knob. Offsets are measured from the widget centre.
    Joystick(JoystickKind),
    /// Free drag outside any widget, orbiting the camera.
    Orbit,
}

/// Output of the tracker, consumed by the session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEvent {
    /// New raw offset from the joystick centre.
    Joystick { kind: JoystickKind, raw: Vec2 },
    /// The joystick was let go and should recenter.
    JoystickReleased(JoystickKind),
    /// Pointer movement since the last orbit event.
    Orbit { delta: Vec2 },
}

#[derive(Debug, Clone, Copy)]
struct ActiveGesture {
    pointer: PointerId,
    target: GestureTarget,
    /// Widget centre for joysticks, last pointer position for orbit.
    anchor: Vec2,
}

#[derive(Debug, Default)]
pub struct GestureTracker {
    active: Vec<ActiveGesture>,
}

impl GestureTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a gesture at `position`.
    ///
    /// `anchor` is the widget centre for joystick targets and ignored for
    /// orbit. Returns the first event of the gesture, or `None` if the pointer
    /// already has a gesture or the widget is owned by another pointer.
    pub fn begin(
        &mut self,
        pointer: PointerId,
        target: GestureTarget,
        anchor: Vec2,
        position: Vec2,
    ) -> Option<GestureEvent> {
        if self.active.iter().any(|g| g.pointer == pointer) {
            trace!(?pointer, "Pointer already tracking a gesture");
            return None;
        }
        if matches!(target, GestureTarget::Joystick(_))
            && self.active.iter().any(|g| g.target == target)
        {
            trace!(?pointer, ?target, "Widget already owned by another pointer");
            return None;
        }
        debug!(?pointer, ?target, "Gesture listeners attached");
        match target {
            GestureTarget::Joystick(kind) => {
                self.active.push(ActiveGesture {
                    pointer,
                    target,
                    anchor,
                });
                Some(GestureEvent::Joystick {
                    kind,
                    raw: position - anchor,
                })
            }
            GestureTarget::Orbit => {
                self.active.push(ActiveGesture {
                    pointer,
                    target,
                    anchor: position,
                });
                None
            }
        }
    }

    /// Pointer moved. Only pointers with a live gesture produce events.
    pub fn moved(&mut self, pointer: PointerId, position: Vec2) -> Option<GestureEvent> {
        let gesture = self.active.iter_mut().find(|g| g.pointer == pointer)?;
        match gesture.target {
            GestureTarget::Joystick(kind) => Some(GestureEvent::Joystick {
                kind,
                raw: position - gesture.anchor,
            }),
            GestureTarget::Orbit => {
                let delta = position - gesture.anchor;
                gesture.anchor = position;
                (delta != Vec2::ZERO).then_some(GestureEvent::Orbit { delta })
            }
        }
    }

    /// Pointer released. Detaches the gesture's listeners.
    pub fn release(&mut self, pointer: PointerId) -> Option<GestureEvent> {
        let gesture = self.detach(pointer)?;
        debug!(?pointer, "Gesture listeners detached on release");
        Self::end_event(gesture)
    }

    /// Gesture cancelled by the platform (touch cancel, focus loss).
    /// Detaches exactly like [`release`](Self::release).
    pub fn cancel(&mut self, pointer: PointerId) -> Option<GestureEvent> {
        let gesture = self.detach(pointer)?;
        debug!(?pointer, "Gesture listeners detached on cancel");
        Self::end_event(gesture)
    }

    /// Cancel every live gesture. Used on session teardown.
    pub fn cancel_all(&mut self) -> Vec<GestureEvent> {
        if !self.active.is_empty() {
            debug!(count = self.active.len(), "Detaching all gesture listeners");
        }
        self.active.drain(..).filter_map(Self::end_event).collect()
    }

    /// Whether `kind` is currently owned by a pointer gesture.
    #[must_use]
    pub fn owns(&self, kind: JoystickKind) -> bool {
        self.active
            .iter()
            .any(|g| g.target == GestureTarget::Joystick(kind))
    }

    /// Number of attached listeners across all live gestures.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.active.len() * LISTENERS_PER_GESTURE
    }

    fn detach(&mut self, pointer: PointerId) -> Option<ActiveGesture> {
        let index = self.active.iter().position(|g| g.pointer == pointer)?;
        Some(self.active.swap_remove(index))
    }

    fn end_event(gesture: ActiveGesture) -> Option<GestureEvent> {
        match gesture.target {
            GestureTarget::Joystick(kind) => Some(GestureEvent::JoystickReleased(kind)),
            GestureTarget::Orbit => None,
        }
    }
}
