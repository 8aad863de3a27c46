//! Placement of the two on-screen joysticks and pointer hit-testing.
//!
//! The ship joystick sits in the bottom-left corner and the camera joystick
//! in the bottom-right, both inset from the window edge. A pointer that goes
//! down inside either widget starts a joystick gesture anchored at the
//! widget centre; anywhere else it starts a camera orbit drag.

use glam::Vec2;
use orrery_input::{GestureTarget, JoystickKind};

/// Gap between a widget's edge and the window edge, logical pixels.
pub const EDGE_INSET: f32 = 32.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WidgetLayout {
    viewport: Vec2,
    radius: f32,
}

impl WidgetLayout {
    #[must_use]
    pub fn new(viewport: Vec2, radius: f32) -> Self {
        Self {
            viewport: viewport.max(Vec2::ZERO),
            radius: radius.max(0.0),
        }
    }

    #[must_use]
    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn resize(&mut self, viewport: Vec2) {
        self.viewport = viewport.max(Vec2::ZERO);
    }

    /// Centre of a widget in window coordinates (y down).
    #[must_use]
    pub fn center(&self, kind: JoystickKind) -> Vec2 {
        let offset = EDGE_INSET + self.radius;
        let y = self.viewport.y - offset;
        match kind {
            JoystickKind::Ship => Vec2::new(offset, y),
            JoystickKind::Camera => Vec2::new(self.viewport.x - offset, y),
        }
    }

    /// What a pointer going down at `position` grabs, and the anchor its
    /// offsets are measured from.
    #[must_use]
    pub fn hit(&self, position: Vec2) -> (GestureTarget, Vec2) {
        for kind in [JoystickKind::Ship, JoystickKind::Camera] {
            let center = self.center(kind);
            if position.distance(center) <= self.radius {
                return (GestureTarget::Joystick(kind), center);
            }
        }
        (GestureTarget::Orbit, position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> WidgetLayout {
        WidgetLayout::new(Vec2::new(1280.0, 720.0), 72.0)
    }

    #[test]
    fn test_widget_centers() {
        let layout = layout();
        assert_eq!(layout.center(JoystickKind::Ship), Vec2::new(104.0, 616.0));
        assert_eq!(layout.center(JoystickKind::Camera), Vec2::new(1176.0, 616.0));
    }

    #[test]
    fn test_hit_ship_widget() {
        let layout = layout();
        let (target, anchor) = layout.hit(Vec2::new(110.0, 600.0));
        assert_eq!(target, GestureTarget::Joystick(JoystickKind::Ship));
        assert_eq!(anchor, Vec2::new(104.0, 616.0));
    }

    #[test]
    fn test_hit_camera_widget_edge() {
        let layout = layout();
        let (target, _) = layout.hit(Vec2::new(1176.0 - 72.0, 616.0));
        assert_eq!(target, GestureTarget::Joystick(JoystickKind::Camera));
    }

    #[test]
    fn test_elsewhere_is_orbit() {
        let layout = layout();
        let position = Vec2::new(640.0, 360.0);
        assert_eq!(layout.hit(position), (GestureTarget::Orbit, position));
    }

    #[test]
    fn test_resize_moves_widgets() {
        let mut layout = layout();
        layout.resize(Vec2::new(800.0, 600.0));
        assert_eq!(layout.center(JoystickKind::Camera), Vec2::new(696.0, 496.0));
    }
}
