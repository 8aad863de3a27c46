//! Frame-coherent mouse state tracker.
//!
//! [`MouseState`] accumulates winit mouse events during a frame and exposes
//! cursor position, per-frame movement, the left button edge and the scroll
//! wheel in lines.

use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta};

/// Pixels of a precise (touchpad) scroll treated as one wheel line.
const PIXELS_PER_LINE: f64 = 40.0;

/// Frame-coherent mouse state.
///
/// 1. Forward winit events via the `on_*` methods during event collection.
/// 2. Query state with the public accessors.
/// 3. Call [`clear_transients`](Self::clear_transients) at end of frame.
#[derive(Debug, Clone, Default)]
pub struct MouseState {
    position: Vec2,
    delta: Vec2,
    left_pressed: bool,
    left_just_pressed: bool,
    left_just_released: bool,
    scroll: f32,
    cursor_in_window: bool,
}

impl MouseState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a `CursorMoved` event.
    pub fn on_cursor_moved(&mut self, x: f64, y: f64) {
        let new_pos = Vec2::new(x as f32, y as f32);
        self.delta += new_pos - self.position;
        self.position = new_pos;
    }

    /// Process a `MouseInput` event. Only the left button drives gestures.
    pub fn on_button(&mut self, button: MouseButton, state: ElementState) {
        if button != MouseButton::Left {
            return;
        }
        match state {
            ElementState::Pressed => {
                self.left_pressed = true;
                self.left_just_pressed = true;
            }
            ElementState::Released => {
                self.left_pressed = false;
                self.left_just_released = true;
            }
        }
    }

    /// Process a `MouseWheel` event. Returns this event's delta in lines,
    /// positive for scrolling up (away from the user).
    pub fn on_scroll(&mut self, delta: MouseScrollDelta) -> f32 {
        let lines = match delta {
            MouseScrollDelta::LineDelta(_x, y) => y,
            MouseScrollDelta::PixelDelta(pos) => (pos.y / PIXELS_PER_LINE) as f32,
        };
        self.scroll += lines;
        lines
    }

    pub fn on_cursor_entered(&mut self) {
        self.cursor_in_window = true;
    }

    pub fn on_cursor_left(&mut self) {
        self.cursor_in_window = false;
    }

    /// Clears per-frame transients: delta, scroll, button edges.
    pub fn clear_transients(&mut self) {
        self.delta = Vec2::ZERO;
        self.scroll = 0.0;
        self.left_just_pressed = false;
        self.left_just_released = false;
    }

    /// Current cursor position in window-logical coordinates.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Movement since last frame clear.
    #[must_use]
    pub fn delta(&self) -> Vec2 {
        self.delta
    }

    #[must_use]
    pub fn is_left_pressed(&self) -> bool {
        self.left_pressed
    }

    #[must_use]
    pub fn left_just_pressed(&self) -> bool {
        self.left_just_pressed
    }

    #[must_use]
    pub fn left_just_released(&self) -> bool {
        self.left_just_released
    }

    /// Scroll accumulated this frame, in lines.
    #[must_use]
    pub fn scroll(&self) -> f32 {
        self.scroll
    }

    #[must_use]
    pub fn cursor_in_window(&self) -> bool {
        self.cursor_in_window
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    #[test]
    fn test_cursor_delta_accumulates() {
        let mut mouse = MouseState::new();
        mouse.on_cursor_moved(10.0, 10.0);
        mouse.clear_transients();
        mouse.on_cursor_moved(15.0, 12.0);
        mouse.on_cursor_moved(20.0, 8.0);
        assert_eq!(mouse.delta(), Vec2::new(10.0, -2.0));
        assert_eq!(mouse.position(), Vec2::new(20.0, 8.0));
    }

    #[test]
    fn test_left_button_edges() {
        let mut mouse = MouseState::new();
        mouse.on_button(MouseButton::Left, ElementState::Pressed);
        assert!(mouse.is_left_pressed());
        assert!(mouse.left_just_pressed());
        mouse.clear_transients();
        assert!(!mouse.left_just_pressed());
        mouse.on_button(MouseButton::Left, ElementState::Released);
        assert!(mouse.left_just_released());
        assert!(!mouse.is_left_pressed());
    }

    #[test]
    fn test_other_buttons_ignored() {
        let mut mouse = MouseState::new();
        mouse.on_button(MouseButton::Right, ElementState::Pressed);
        assert!(!mouse.is_left_pressed());
    }

    #[test]
    fn test_scroll_line_and_pixel() {
        let mut mouse = MouseState::new();
        assert_eq!(mouse.on_scroll(MouseScrollDelta::LineDelta(0.0, 1.0)), 1.0);
        let lines = mouse.on_scroll(MouseScrollDelta::PixelDelta(PhysicalPosition::new(
            0.0, -80.0,
        )));
        assert!((lines + 2.0).abs() < 1e-6);
        assert!((mouse.scroll() + 1.0).abs() < 1e-6);
        mouse.clear_transients();
        assert_eq!(mouse.scroll(), 0.0);
    }

    #[test]
    fn test_cursor_enter_leave() {
        let mut mouse = MouseState::new();
        mouse.on_cursor_entered();
        assert!(mouse.cursor_in_window());
        mouse.on_cursor_left();
        assert!(!mouse.cursor_in_window());
    }
}
