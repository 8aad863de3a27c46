//! The eight boolean flags the flight model reads every tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A single ship control intent.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Intent {
    Forward,
    Backward,
    TurnLeft,
    TurnRight,
    PitchUp,
    PitchDown,
    Turbo,
    Brake,
}

impl Intent {
    pub const ALL: [Intent; 8] = [
        Self::Forward,
        Self::Backward,
        Self::TurnLeft,
        Self::TurnRight,
        Self::PitchUp,
        Self::PitchDown,
        Self::Turbo,
        Self::Brake,
    ];
}

/// Current ship control intent. Each flag is held until explicitly cleared.
///
/// Opposing flags may both be set (forward and backward, turbo and brake);
/// the flight model resolves them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentState {
    pub forward: bool,
    pub backward: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    pub pitch_up: bool,
    pub pitch_down: bool,
    pub turbo: bool,
    pub brake: bool,
}

impl IntentState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&mut self, intent: Intent) -> &mut bool {
        match intent {
            Intent::Forward => &mut self.forward,
            Intent::Backward => &mut self.backward,
            Intent::TurnLeft => &mut self.turn_left,
            Intent::TurnRight => &mut self.turn_right,
            Intent::PitchUp => &mut self.pitch_up,
            Intent::PitchDown => &mut self.pitch_down,
            Intent::Turbo => &mut self.turbo,
            Intent::Brake => &mut self.brake,
        }
    }

    /// Set one flag. Returns `true` if the value changed.
    pub fn set(&mut self, intent: Intent, active: bool) -> bool {
        let slot = self.slot(intent);
        let changed = *slot != active;
        *slot = active;
        changed
    }

    #[must_use]
    pub fn is_active(&self, intent: Intent) -> bool {
        match intent {
            Intent::Forward => self.forward,
            Intent::Backward => self.backward,
            Intent::TurnLeft => self.turn_left,
            Intent::TurnRight => self.turn_right,
            Intent::PitchUp => self.pitch_up,
            Intent::PitchDown => self.pitch_down,
            Intent::Turbo => self.turbo,
            Intent::Brake => self.brake,
        }
    }

    /// Convert a normalised joystick vector into the four steering flags.
    ///
    /// `x` steers yaw, `y` steers pitch in screen space, so pushing the knob
    /// up (negative `y`) pitches up. Components with magnitude at or below
    /// `threshold` clear both flags of their axis.
    pub fn apply_joystick(&mut self, v: Vec2, threshold: f32) {
        self.turn_right = v.x > threshold;
        self.turn_left = v.x < -threshold;
        self.pitch_up = v.y < -threshold;
        self.pitch_down = v.y > threshold;
    }

    /// Clear the four steering flags.
    pub fn clear_steering(&mut self) {
        self.turn_left = false;
        self.turn_right = false;
        self.pitch_up = false;
        self.pitch_down = false;
    }

    /// Clear every flag.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_all_inactive() {
        let state = IntentState::new();
        for intent in Intent::ALL {
            assert!(!state.is_active(intent));
        }
    }

    #[test]
    fn test_set_reports_change() {
        let mut state = IntentState::new();
        assert!(state.set(Intent::Forward, true));
        assert!(!state.set(Intent::Forward, true));
        assert!(state.is_active(Intent::Forward));
        assert!(state.set(Intent::Forward, false));
        assert!(!state.forward);
    }

    #[test]
    fn test_opposing_flags_coexist() {
        let mut state = IntentState::new();
        state.set(Intent::Turbo, true);
        state.set(Intent::Brake, true);
        assert!(state.turbo && state.brake);
    }

    #[test]
    fn test_apply_joystick_threshold() {
        let mut state = IntentState::new();
        state.apply_joystick(Vec2::new(0.5, -0.05), 0.1);
        assert!(state.turn_right);
        assert!(!state.turn_left);
        assert!(!state.pitch_up && !state.pitch_down);

        state.apply_joystick(Vec2::new(-0.2, -0.3), 0.1);
        assert!(state.turn_left && !state.turn_right);
        assert!(state.pitch_up && !state.pitch_down);

        state.apply_joystick(Vec2::new(0.0, 0.3), 0.1);
        assert!(state.pitch_down);
    }

    #[test]
    fn test_apply_joystick_leaves_thrust_alone() {
        let mut state = IntentState::new();
        state.set(Intent::Forward, true);
        state.apply_joystick(Vec2::ZERO, 0.1);
        assert!(state.forward);
    }

    #[test]
    fn test_clear_steering() {
        let mut state = IntentState::new();
        state.apply_joystick(Vec2::new(1.0, 1.0), 0.1);
        state.set(Intent::Turbo, true);
        state.clear_steering();
        assert!(!state.turn_right && !state.pitch_up);
        assert!(state.turbo);
    }
}
