//! Action mapping: which control key triggers which game action.
//!
//! [`InputMap`] is serialisable to RON and can be patched from the
//! `input.keybindings` config table (key name → action name).

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::gamepad::UnifiedButton;
use crate::intent::Intent;
use crate::keyboard::ControlKey;

/// Semantic game actions that can be bound to physical inputs.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Forward thrust (held).
    Forward,
    /// Reverse thrust (held).
    Backward,
    TurnLeft,
    TurnRight,
    PitchUp,
    PitchDown,
    /// Turbo modifier (held).
    Turbo,
    /// Brake modifier (held).
    Brake,
    /// Nudge the camera joystick up (held).
    CameraUp,
    CameraDown,
    CameraLeft,
    CameraRight,
    ZoomIn,
    ZoomOut,
    ResetCamera,
    StartSession,
    EndSession,
}

impl Action {
    /// The ship intent a held action maps to, if any.
    #[must_use]
    pub fn intent(self) -> Option<Intent> {
        Some(match self {
            Self::Forward => Intent::Forward,
            Self::Backward => Intent::Backward,
            Self::TurnLeft => Intent::TurnLeft,
            Self::TurnRight => Intent::TurnRight,
            Self::PitchUp => Intent::PitchUp,
            Self::PitchDown => Intent::PitchDown,
            Self::Turbo => Intent::Turbo,
            Self::Brake => Intent::Brake,
            _ => return None,
        })
    }

    /// Unit screen-space direction for camera nudge actions.
    #[must_use]
    pub fn camera_nudge(self) -> Option<Vec2> {
        match self {
            Self::CameraUp => Some(Vec2::new(0.0, -1.0)),
            Self::CameraDown => Some(Vec2::new(0.0, 1.0)),
            Self::CameraLeft => Some(Vec2::new(-1.0, 0.0)),
            Self::CameraRight => Some(Vec2::new(1.0, 0.0)),
            _ => None,
        }
    }

    /// Unit screen-space direction a steering action pushes the ship knob.
    #[must_use]
    pub fn ship_nudge(self) -> Option<Vec2> {
        match self {
            Self::PitchUp => Some(Vec2::new(0.0, -1.0)),
            Self::PitchDown => Some(Vec2::new(0.0, 1.0)),
            Self::TurnLeft => Some(Vec2::new(-1.0, 0.0)),
            Self::TurnRight => Some(Vec2::new(1.0, 0.0)),
            _ => None,
        }
    }

    /// Parse an action name as written in config files, ignoring case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.trim().to_ascii_lowercase();
        Some(match lower.as_str() {
            "forward" => Self::Forward,
            "backward" => Self::Backward,
            "turnleft" => Self::TurnLeft,
            "turnright" => Self::TurnRight,
            "pitchup" => Self::PitchUp,
            "pitchdown" => Self::PitchDown,
            "turbo" => Self::Turbo,
            "brake" => Self::Brake,
            "cameraup" => Self::CameraUp,
            "cameradown" => Self::CameraDown,
            "cameraleft" => Self::CameraLeft,
            "cameraright" => Self::CameraRight,
            "zoomin" => Self::ZoomIn,
            "zoomout" => Self::ZoomOut,
            "resetcamera" => Self::ResetCamera,
            "startsession" => Self::StartSession,
            "endsession" => Self::EndSession,
            _ => return None,
        })
    }
}

/// Maps [`ControlKey`]s and gamepad buttons to [`Action`]s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputMap {
    pub keys: HashMap<ControlKey, Action>,
    pub buttons: HashMap<UnifiedButton, Action>,
}

impl Default for InputMap {
    fn default() -> Self {
        Self::default_flight()
    }
}

impl InputMap {
    /// Default flight bindings for keyboard and gamepad.
    #[must_use]
    pub fn default_flight() -> Self {
        let keys = HashMap::from([
            (ControlKey::Q, Action::Forward),
            (ControlKey::E, Action::Backward),
            (ControlKey::A, Action::TurnLeft),
            (ControlKey::D, Action::TurnRight),
            (ControlKey::W, Action::PitchUp),
            (ControlKey::S, Action::PitchDown),
            (ControlKey::Shift, Action::Turbo),
            (ControlKey::Control, Action::Brake),
            (ControlKey::ArrowUp, Action::CameraUp),
            (ControlKey::ArrowDown, Action::CameraDown),
            (ControlKey::ArrowLeft, Action::CameraLeft),
            (ControlKey::ArrowRight, Action::CameraRight),
            (ControlKey::Plus, Action::ZoomIn),
            (ControlKey::Minus, Action::ZoomOut),
            (ControlKey::R, Action::ResetCamera),
            (ControlKey::Enter, Action::StartSession),
            (ControlKey::Escape, Action::EndSession),
        ]);
        let buttons = HashMap::from([
            (UnifiedButton::South, Action::Turbo),
            (UnifiedButton::East, Action::Brake),
            (UnifiedButton::LeftShoulder, Action::ZoomOut),
            (UnifiedButton::RightShoulder, Action::ZoomIn),
            (UnifiedButton::Start, Action::ResetCamera),
        ]);
        Self { keys, buttons }
    }

    /// Apply `key name → action name` overrides. Unknown names are skipped
    /// with a warning; the rest of the table still applies.
    ///
    /// Overrides apply in key-name order, so when two keys claim the same
    /// action the one that sorts last keeps it.
    pub fn with_overrides(mut self, overrides: &HashMap<String, String>) -> Self {
        let mut entries: Vec<(&String, &String)> = overrides.iter().collect();
        entries.sort();
        for (key_name, action_name) in entries {
            match (
                ControlKey::from_name(key_name),
                Action::from_name(action_name),
            ) {
                (Some(key), Some(action)) => {
                    self.keys.retain(|_, bound| *bound != action);
                    self.keys.insert(key, action);
                }
                _ => warn!(key = %key_name, action = %action_name, "Ignoring unknown key binding"),
            }
        }
        self
    }

    #[must_use]
    pub fn action_for_key(&self, key: ControlKey) -> Option<Action> {
        self.keys.get(&key).copied()
    }

    #[must_use]
    pub fn action_for_button(&self, button: UnifiedButton) -> Option<Action> {
        self.buttons.get(&button).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let map = InputMap::default();
        assert_eq!(map.action_for_key(ControlKey::Q), Some(Action::Forward));
        assert_eq!(map.action_for_key(ControlKey::W), Some(Action::PitchUp));
        assert_eq!(map.action_for_key(ControlKey::Shift), Some(Action::Turbo));
        assert_eq!(map.action_for_key(ControlKey::Plus), Some(Action::ZoomIn));
        assert_eq!(
            map.action_for_button(UnifiedButton::East),
            Some(Action::Brake)
        );
    }

    #[test]
    fn test_every_intent_has_a_key() {
        let map = InputMap::default();
        for intent in Intent::ALL {
            assert!(
                map.keys.values().any(|a| a.intent() == Some(intent)),
                "{intent:?} unbound"
            );
        }
    }

    #[test]
    fn test_override_rebinds_action() {
        let overrides = HashMap::from([("R".to_string(), "Forward".to_string())]);
        let map = InputMap::default().with_overrides(&overrides);
        assert_eq!(map.action_for_key(ControlKey::R), Some(Action::Forward));
        assert_eq!(map.action_for_key(ControlKey::Q), None);
        assert_eq!(
            map.keys.values().filter(|a| **a == Action::Forward).count(),
            1
        );
    }

    #[test]
    fn test_conflicting_overrides_resolve_in_key_order() {
        // Each map gets its own hasher seed, so iteration order varies.
        for _ in 0..8 {
            let overrides = HashMap::from([
                ("r".to_string(), "forward".to_string()),
                ("e".to_string(), "forward".to_string()),
            ]);
            let map = InputMap::default().with_overrides(&overrides);
            assert_eq!(map.action_for_key(ControlKey::R), Some(Action::Forward));
            assert_eq!(map.action_for_key(ControlKey::E), None);
            assert_eq!(map.action_for_key(ControlKey::Q), None);
        }
    }

    #[test]
    fn test_unknown_override_ignored() {
        let overrides = HashMap::from([
            ("KeyZ".to_string(), "Forward".to_string()),
            ("q".to_string(), "Hyperdrive".to_string()),
        ]);
        let map = InputMap::default().with_overrides(&overrides);
        assert_eq!(map, InputMap::default());
    }

    #[test]
    fn test_nudge_directions() {
        assert_eq!(Action::CameraUp.camera_nudge(), Some(Vec2::new(0.0, -1.0)));
        assert_eq!(Action::TurnRight.ship_nudge(), Some(Vec2::new(1.0, 0.0)));
        assert_eq!(Action::Forward.ship_nudge(), None);
        assert_eq!(Action::ZoomIn.intent(), None);
    }

    #[test]
    fn test_ron_roundtrip() {
        let map = InputMap::default();
        let text = ron::ser::to_string_pretty(&map, ron::ser::PrettyConfig::default())
            .expect("serialize");
        let back: InputMap = ron::from_str(&text).expect("deserialize");
        assert_eq!(map, back);
    }
}
