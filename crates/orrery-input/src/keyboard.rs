//! Frame-coherent keyboard state tracker for the recognised control keys.
//!
//! [`RawKeyEvent`] filters winit [`KeyEvent`]s down to the [`ControlKey`]s
//! the game reacts to, and [`KeyboardState`] tracks which of them are held.
//!
//! Keys are matched on their logical value, case-insensitively, so `q` and
//! `Q` (caps lock, shift held for turbo) are the same control.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{Key, NamedKey};

/// Keys the game recognises. Everything else is ignored at the door.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum ControlKey {
    Q,
    E,
    A,
    D,
    W,
    S,
    R,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Shift,
    Control,
    Plus,
    Minus,
    Enter,
    Escape,
}

impl ControlKey {
    /// All recognised keys, in a stable order.
    pub const ALL: [ControlKey; 17] = [
        Self::Q,
        Self::E,
        Self::A,
        Self::D,
        Self::W,
        Self::S,
        Self::R,
        Self::ArrowUp,
        Self::ArrowDown,
        Self::ArrowLeft,
        Self::ArrowRight,
        Self::Shift,
        Self::Control,
        Self::Plus,
        Self::Minus,
        Self::Enter,
        Self::Escape,
    ];

    /// Map a winit logical key to a control key.
    #[must_use]
    pub fn from_logical(key: &Key) -> Option<Self> {
        match key {
            Key::Character(text) => Self::from_name(text.as_str()),
            Key::Named(named) => match named {
                NamedKey::ArrowUp => Some(Self::ArrowUp),
                NamedKey::ArrowDown => Some(Self::ArrowDown),
                NamedKey::ArrowLeft => Some(Self::ArrowLeft),
                NamedKey::ArrowRight => Some(Self::ArrowRight),
                NamedKey::Shift => Some(Self::Shift),
                NamedKey::Control => Some(Self::Control),
                NamedKey::Enter => Some(Self::Enter),
                NamedKey::Escape => Some(Self::Escape),
                _ => None,
            },
            _ => None,
        }
    }

    /// Parse a key name, ignoring case. Accepts the single character for
    /// letter keys (`"q"`, `"Q"`) and the names returned by [`name`](Self::name).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.trim().to_ascii_lowercase();
        Some(match lower.as_str() {
            "q" => Self::Q,
            "e" => Self::E,
            "a" => Self::A,
            "d" => Self::D,
            "w" => Self::W,
            "s" => Self::S,
            "r" => Self::R,
            "arrowup" => Self::ArrowUp,
            "arrowdown" => Self::ArrowDown,
            "arrowleft" => Self::ArrowLeft,
            "arrowright" => Self::ArrowRight,
            "shift" => Self::Shift,
            "control" | "ctrl" => Self::Control,
            "+" | "=" | "plus" => Self::Plus,
            "-" | "_" | "minus" => Self::Minus,
            "enter" => Self::Enter,
            "escape" | "esc" => Self::Escape,
            _ => return None,
        })
    }

    /// Canonical lowercase name, accepted by [`from_name`](Self::from_name).
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Q => "q",
            Self::E => "e",
            Self::A => "a",
            Self::D => "d",
            Self::W => "w",
            Self::S => "s",
            Self::R => "r",
            Self::ArrowUp => "arrowup",
            Self::ArrowDown => "arrowdown",
            Self::ArrowLeft => "arrowleft",
            Self::ArrowRight => "arrowright",
            Self::Shift => "shift",
            Self::Control => "control",
            Self::Plus => "plus",
            Self::Minus => "minus",
            Self::Enter => "enter",
            Self::Escape => "escape",
        }
    }
}

/// Minimal description of a key event for processing.
#[derive(Debug, Clone, Copy)]
pub struct RawKeyEvent {
    /// The control key involved.
    pub key: ControlKey,
    /// Whether the key was pressed or released.
    pub state: ElementState,
    /// Whether this is an OS auto-repeat event.
    pub repeat: bool,
}

impl RawKeyEvent {
    /// Filter a winit event down to a control key event.
    #[must_use]
    pub fn from_winit(event: &KeyEvent) -> Option<Self> {
        ControlKey::from_logical(&event.logical_key).map(|key| Self {
            key,
            state: event.state,
            repeat: event.repeat,
        })
    }
}

/// Tracks which control keys are held.
///
/// Transitions are edge-triggered: pressing a key that is already held (or
/// releasing one that is already up) changes nothing and reports `false`.
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    pressed: HashSet<ControlKey>,
}

impl KeyboardState {
    /// Creates a new `KeyboardState` with no keys pressed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Processes a [`RawKeyEvent`]. Returns `true` if the held state changed.
    pub fn process_raw(&mut self, event: RawKeyEvent) -> bool {
        if event.repeat {
            return false;
        }
        match event.state {
            ElementState::Pressed => self.pressed.insert(event.key),
            ElementState::Released => self.pressed.remove(&event.key),
        }
    }

    /// Keys currently held.
    pub fn held(&self) -> impl Iterator<Item = ControlKey> + '_ {
        self.pressed.iter().copied()
    }

    /// Forget every held key and return the ones that were down.
    pub fn release_all(&mut self) -> Vec<ControlKey> {
        self.pressed.drain().collect()
    }
}
