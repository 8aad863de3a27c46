//! Gamepad input abstraction wrapping [`gilrs`].
//!
//! [`GamepadManager`] polls gilrs each frame, normalises axes through a
//! configurable deadzone, and tracks per-button press/release state.
//! Hot-plug is handled transparently: gamepads appear when plugged in and
//! are marked disconnected when unplugged.
//!
//! The sticks stand in for the on-screen joysticks: the left stick drives
//! the ship widget, the right stick the camera widget (see
//! [`stick_to_offset`]).

use std::collections::HashMap;

use gilrs::{Axis, Button, EventType, GamepadId, Gilrs};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Unified button names that work across Xbox / PlayStation / generic pads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnifiedButton {
    /// A / Cross
    South,
    /// B / Circle
    East,
    /// Y / Triangle
    North,
    /// X / Square
    West,
    DPadUp,
    DPadDown,
    DPadLeft,
    DPadRight,
    LeftShoulder,
    RightShoulder,
    Start,
    Select,
}

impl UnifiedButton {
    fn from_gilrs(button: Button) -> Option<Self> {
        match button {
            Button::South => Some(Self::South),
            Button::East => Some(Self::East),
            Button::North => Some(Self::North),
            Button::West => Some(Self::West),
            Button::DPadUp => Some(Self::DPadUp),
            Button::DPadDown => Some(Self::DPadDown),
            Button::DPadLeft => Some(Self::DPadLeft),
            Button::DPadRight => Some(Self::DPadRight),
            Button::LeftTrigger => Some(Self::LeftShoulder),
            Button::RightTrigger => Some(Self::RightShoulder),
            Button::Start => Some(Self::Start),
            Button::Select => Some(Self::Select),
            _ => None,
        }
    }
}

/// Per-button frame state.
#[derive(Debug, Clone, Copy, Default)]
struct ButtonFrame {
    pressed: bool,
    just_pressed: bool,
    just_released: bool,
}

/// Stick values for a single gamepad.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GamepadAxes {
    /// Left stick. x: left(-1)..right(+1), y: down(-1)..up(+1).
    pub left_stick: Vec2,
    /// Right stick.
    pub right_stick: Vec2,
}

/// State snapshot for a single gamepad.
#[derive(Debug, Clone)]
pub struct GamepadState {
    name: String,
    connected: bool,
    axes: GamepadAxes,
    buttons: HashMap<UnifiedButton, ButtonFrame>,
}

impl GamepadState {
    /// A connected pad with centred sticks and no buttons held.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            connected: true,
            axes: GamepadAxes::default(),
            buttons: HashMap::new(),
        }
    }

    /// Gamepad human-readable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the gamepad is currently connected.
    pub fn connected(&self) -> bool {
        self.connected
    }

    /// Left analog stick after deadzone filtering.
    pub fn left_stick(&self) -> Vec2 {
        self.axes.left_stick
    }

    /// Right analog stick after deadzone filtering.
    pub fn right_stick(&self) -> Vec2 {
        self.axes.right_stick
    }

    /// Whether `button` is currently held.
    pub fn is_button_pressed(&self, button: UnifiedButton) -> bool {
        self.buttons.get(&button).is_some_and(|b| b.pressed)
    }

    /// Whether `button` was first pressed this frame.
    pub fn just_button_pressed(&self, button: UnifiedButton) -> bool {
        self.buttons.get(&button).is_some_and(|b| b.just_pressed)
    }

    /// Whether `button` was released this frame.
    pub fn just_button_released(&self, button: UnifiedButton) -> bool {
        self.buttons.get(&button).is_some_and(|b| b.just_released)
    }

    /// Buttons that changed state this frame, with their new held state.
    pub fn button_edges(&self) -> impl Iterator<Item = (UnifiedButton, bool)> + '_ {
        self.buttons.iter().filter_map(|(button, frame)| {
            if frame.just_pressed {
                Some((*button, true))
            } else if frame.just_released {
                Some((*button, false))
            } else {
                None
            }
        })
    }

    /// Set a stick value after deadzone filtering.
    pub fn set_stick(&mut self, axis: Axis, raw_value: f32, deadzone: f32) {
        let value = apply_deadzone(raw_value, deadzone);
        match axis {
            Axis::LeftStickX => self.axes.left_stick.x = value,
            Axis::LeftStickY => self.axes.left_stick.y = value,
            Axis::RightStickX => self.axes.right_stick.x = value,
            Axis::RightStickY => self.axes.right_stick.y = value,
            _ => {}
        }
    }

    pub fn press(&mut self, button: UnifiedButton) {
        let bf = self.buttons.entry(button).or_default();
        bf.pressed = true;
        bf.just_pressed = true;
    }

    pub fn release(&mut self, button: UnifiedButton) {
        let bf = self.buttons.entry(button).or_default();
        bf.pressed = false;
        bf.just_released = true;
    }

    /// Clear per-frame button edges.
    pub fn clear_frame(&mut self) {
        for bf in self.buttons.values_mut() {
            bf.just_pressed = false;
            bf.just_released = false;
        }
    }
}

/// Manages all connected gamepads via gilrs.
pub struct GamepadManager {
    gilrs: Gilrs,
    gamepads: HashMap<GamepadId, GamepadState>,
    /// Deadzone threshold for analog sticks (default 0.15).
    deadzone: f32,
}

impl GamepadManager {
    /// Create a new manager, initialising gilrs.
    ///
    /// # Errors
    /// Returns the gilrs error if no platform backend is available.
    pub fn new(deadzone: f32) -> Result<Self, gilrs::Error> {
        let gilrs = Gilrs::new()?;
        let mut manager = Self {
            gilrs,
            gamepads: HashMap::new(),
            deadzone: deadzone.clamp(0.0, 0.99),
        };
        let ids: Vec<_> = manager
            .gilrs
            .gamepads()
            .filter(|(_, g)| g.is_connected())
            .map(|(id, g)| (id, g.name().to_string()))
            .collect();
        for (id, name) in ids {
            info!(%name, "Gamepad present at startup");
            manager.gamepads.insert(id, GamepadState::new(name));
        }
        Ok(manager)
    }

    /// Try to create a manager, logging and returning `None` when gilrs is
    /// unavailable. Keyboard and pointer input still work without one.
    pub fn try_new(deadzone: f32) -> Option<Self> {
        match Self::new(deadzone) {
            Ok(manager) => Some(manager),
            Err(err) => {
                warn!(%err, "Gamepad support unavailable");
                None
            }
        }
    }

    /// Current deadzone threshold.
    pub fn deadzone(&self) -> f32 {
        self.deadzone
    }

    /// The first connected gamepad, if any.
    pub fn primary(&self) -> Option<&GamepadState> {
        self.gamepads.values().find(|s| s.connected)
    }

    /// Poll gilrs events and update all gamepad states. Call once per frame.
    pub fn update(&mut self) {
        for state in self.gamepads.values_mut() {
            state.clear_frame();
        }

        while let Some(event) = self.gilrs.next_event() {
            let id = event.id;
            match event.event {
                EventType::Connected => {
                    let name = self.gilrs.gamepad(id).name().to_string();
                    info!(%name, "Gamepad connected");
                    let entry = self
                        .gamepads
                        .entry(id)
                        .or_insert_with(|| GamepadState::new(name.clone()));
                    entry.connected = true;
                    entry.name = name;
                }
                EventType::Disconnected => {
                    if let Some(state) = self.gamepads.get_mut(&id) {
                        info!(name = %state.name, "Gamepad disconnected");
                        state.connected = false;
                        state.axes = GamepadAxes::default();
                        for (_, bf) in state.buttons.iter_mut().filter(|(_, b)| b.pressed) {
                            bf.pressed = false;
                            bf.just_released = true;
                        }
                    }
                }
                EventType::AxisChanged(axis, raw_value, _) => {
                    if let Some(state) = self.gamepads.get_mut(&id) {
                        state.set_stick(axis, raw_value, self.deadzone);
                    }
                }
                EventType::ButtonPressed(button, _) => {
                    if let Some(unified) = UnifiedButton::from_gilrs(button)
                        && let Some(state) = self.gamepads.get_mut(&id)
                    {
                        state.press(unified);
                    }
                }
                EventType::ButtonReleased(button, _) => {
                    if let Some(unified) = UnifiedButton::from_gilrs(button)
                        && let Some(state) = self.gamepads.get_mut(&id)
                    {
                        state.release(unified);
                    }
                }
                _ => {}
            }
        }
    }
}

/// Apply deadzone filtering with rescaling.
///
/// If `|raw| < deadzone`, returns `0.0`.
/// Otherwise rescales from `[deadzone, 1.0]` to `[0.0, 1.0]`, preserving sign.
pub(crate) fn apply_deadzone(raw: f32, deadzone: f32) -> f32 {
    let abs = raw.abs();
    if abs < deadzone {
        return 0.0;
    }
    let scale = 1.0 / (1.0 - deadzone);
    let rescaled = (abs - deadzone) * scale;
    rescaled.min(1.0).copysign(raw)
}

/// Convert a stick value into a raw joystick widget offset.
///
/// Sticks report y up-positive; widget offsets are screen space, y down.
#[must_use]
pub fn stick_to_offset(stick: Vec2, max_distance: f32) -> Vec2 {
    Vec2::new(stick.x, -stick.y) * max_distance
}

// ── Mock-friendly test helpers ──────────────────────────────────────────────

/// A test-only gamepad manager that doesn't require gilrs hardware.
#[cfg(test)]
pub(crate) struct MockGamepadManager {
    pub gamepads: HashMap<u64, GamepadState>,
    pub deadzone: f32,
    next_id: u64,
}

#[cfg(test)]
impl MockGamepadManager {
    pub fn new() -> Self {
        Self {
            gamepads: HashMap::new(),
            deadzone: 0.15,
            next_id: 0,
        }
    }

    pub fn connect(&mut self, name: &str) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.gamepads.insert(id, GamepadState::new(name));
        id
    }

    pub fn disconnect(&mut self, id: u64) {
        if let Some(s) = self.gamepads.get_mut(&id) {
            s.connected = false;
        }
    }

    pub fn set_axis(&mut self, id: u64, axis: Axis, raw_value: f32) {
        let deadzone = self.deadzone;
        if let Some(s) = self.gamepads.get_mut(&id) {
            s.set_stick(axis, raw_value, deadzone);
        }
    }

    pub fn press_button(&mut self, id: u64, button: UnifiedButton) {
        if let Some(s) = self.gamepads.get_mut(&id) {
            s.press(button);
        }
    }

    pub fn release_button(&mut self, id: u64, button: UnifiedButton) {
        if let Some(s) = self.gamepads.get_mut(&id) {
            s.release(button);
        }
    }

    pub fn clear_frame(&mut self) {
        for s in self.gamepads.values_mut() {
            s.clear_frame();
        }
    }

    pub fn connected_count(&self) -> usize {
        self.gamepads.values().filter(|s| s.connected).count()
    }

    pub fn gamepad(&self, id: u64) -> Option<&GamepadState> {
        self.gamepads.get(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gamepad_connection_detected() {
        let mut mgr = MockGamepadManager::new();
        let id = mgr.connect("Test Pad");
        assert_eq!(mgr.connected_count(), 1);
        assert_eq!(mgr.gamepad(id).map(GamepadState::name), Some("Test Pad"));
        mgr.disconnect(id);
        assert_eq!(mgr.connected_count(), 0);
    }

    #[test]
    fn test_deadzone_filters_small_values() {
        let mut mgr = MockGamepadManager::new();
        let id = mgr.connect("Pad");
        mgr.set_axis(id, Axis::LeftStickX, 0.1);
        assert_eq!(mgr.gamepad(id).map(|g| g.left_stick().x), Some(0.0));
    }

    #[test]
    fn test_deadzone_rescales_remaining_range() {
        assert!((apply_deadzone(1.0, 0.15) - 1.0).abs() < 1e-6);
        assert!((apply_deadzone(-1.0, 0.15) + 1.0).abs() < 1e-6);
        let mid = apply_deadzone(0.575, 0.15);
        assert!((mid - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_button_press_release_edges() {
        let mut mgr = MockGamepadManager::new();
        let id = mgr.connect("Pad");
        mgr.press_button(id, UnifiedButton::South);
        let pad = mgr.gamepad(id).expect("pad");
        assert!(pad.is_button_pressed(UnifiedButton::South));
        assert!(pad.just_button_pressed(UnifiedButton::South));
        assert_eq!(
            pad.button_edges().collect::<Vec<_>>(),
            vec![(UnifiedButton::South, true)]
        );

        mgr.clear_frame();
        assert!(
            !mgr.gamepad(id)
                .expect("pad")
                .just_button_pressed(UnifiedButton::South)
        );
        mgr.release_button(id, UnifiedButton::South);
        let pad = mgr.gamepad(id).expect("pad");
        assert!(!pad.is_button_pressed(UnifiedButton::South));
        assert!(pad.just_button_released(UnifiedButton::South));
    }

    #[test]
    fn test_stick_to_offset_flips_y() {
        let offset = stick_to_offset(Vec2::new(0.5, 1.0), 64.0);
        assert_eq!(offset, Vec2::new(32.0, -64.0));
    }

    #[test]
    fn test_right_stick_independent() {
        let mut mgr = MockGamepadManager::new();
        let id = mgr.connect("Pad");
        mgr.set_axis(id, Axis::RightStickY, -1.0);
        let pad = mgr.gamepad(id).expect("pad");
        assert_eq!(pad.left_stick(), Vec2::ZERO);
        assert!((pad.right_stick().y + 1.0).abs() < 1e-6);
    }
}
