//! On-screen joystick math shared by the ship and camera widgets.
//!
//! A raw pointer offset from the widget centre goes through three steps:
//!
//! 1. dead zone: offsets shorter than [`JoystickGeometry::dead_zone`] become
//!    exactly zero, before any division by the offset length;
//! 2. clamp: offsets longer than `radius - knob_margin` are scaled down onto
//!    that circle, direction preserved;
//! 3. response: the ship widget applies [`precision_curve`] per axis, the
//!    camera widget forwards a scaled copy of the clamped vector.
//!
//! The knob pose ([`KnobPose`]) is derived from the clamped vector and is a
//! rendering concern only; it never feeds back into the control signal.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Which on-screen widget a joystick is.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum JoystickKind {
    Ship,
    Camera,
}

/// Dimensions of a joystick widget, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JoystickGeometry {
    /// Half the widget's smaller side.
    pub radius: f32,
    /// Space kept between the knob centre and the track edge.
    pub knob_margin: f32,
    /// Offsets shorter than this report zero.
    pub dead_zone: f32,
    /// Knob tilt in degrees at full deflection.
    pub tilt_degrees: f32,
}

impl JoystickGeometry {
    pub const SHIP: Self = Self {
        radius: 72.0,
        knob_margin: 8.0,
        dead_zone: 2.0,
        tilt_degrees: 10.0,
    };

    pub const CAMERA: Self = Self {
        radius: 72.0,
        knob_margin: 14.0,
        dead_zone: 2.0,
        tilt_degrees: 15.0,
    };

    /// Furthest the knob may travel from the centre. Never negative.
    #[must_use]
    pub fn max_distance(&self) -> f32 {
        (self.radius - self.knob_margin).max(0.0)
    }

    /// Apply dead zone and magnitude clamp to a raw offset.
    #[must_use]
    pub fn clamp(&self, raw: Vec2) -> Vec2 {
        let distance = raw.length();
        if !distance.is_finite() || distance < self.dead_zone {
            return Vec2::ZERO;
        }
        let max = self.max_distance();
        if max <= 0.0 {
            return Vec2::ZERO;
        }
        if distance > max {
            raw / distance * max
        } else {
            raw
        }
    }

    /// Visual pose of the knob for an already clamped offset.
    #[must_use]
    pub fn knob_pose(&self, clamped: Vec2) -> KnobPose {
        let max = self.max_distance();
        if max <= 0.0 {
            return KnobPose::CENTERED;
        }
        KnobPose {
            offset: clamped,
            tilt_x_degrees: clamped.y / max * self.tilt_degrees,
            tilt_y_degrees: -clamped.x / max * self.tilt_degrees,
        }
    }
}

/// Where the renderer should draw a joystick knob.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct KnobPose {
    /// Translation from the widget centre.
    pub offset: Vec2,
    /// Rotation about the screen X axis.
    pub tilt_x_degrees: f32,
    /// Rotation about the screen Y axis.
    pub tilt_y_degrees: f32,
}

impl KnobPose {
    pub const CENTERED: Self = Self {
        offset: Vec2::ZERO,
        tilt_x_degrees: 0.0,
        tilt_y_degrees: 0.0,
    };
}

/// Ship response curve: `sign(v) * v² / (2 * max_distance)`.
///
/// Fine control near the centre, fast response near the edge. Returns zero
/// when `max_distance` is not positive.
#[must_use]
pub fn precision_curve(v: f32, max_distance: f32) -> f32 {
    if max_distance <= 0.0 || v == 0.0 {
        return 0.0;
    }
    v.signum() * v * v / (max_distance * 2.0)
}

/// Camera response curve: `sign(v) * (|v| / pivot)^power * pivot`.
#[must_use]
pub fn exponential_curve(v: f32, pivot: f32, power: f32) -> f32 {
    if v == 0.0 || pivot <= 0.0 {
        return 0.0;
    }
    v.signum() * (v.abs() / pivot).powf(power) * pivot
}

/// One on-screen joystick: geometry plus the last knob pose it produced.
#[derive(Debug, Clone)]
pub struct JoystickWidget {
    kind: JoystickKind,
    geometry: JoystickGeometry,
    /// Multiplier on the clamped vector forwarded by a camera widget.
    feed_scale: f32,
    knob: KnobPose,
    engaged: bool,
}

impl JoystickWidget {
    #[must_use]
    pub fn new(kind: JoystickKind, geometry: JoystickGeometry, feed_scale: f32) -> Self {
        Self {
            kind,
            geometry,
            feed_scale,
            knob: KnobPose::CENTERED,
            engaged: false,
        }
    }

    /// Ship widget with default geometry.
    #[must_use]
    pub fn ship() -> Self {
        Self::new(JoystickKind::Ship, JoystickGeometry::SHIP, 1.0)
    }

    /// Camera widget with default geometry, forwarding half the clamped vector.
    #[must_use]
    pub fn camera() -> Self {
        Self::new(JoystickKind::Camera, JoystickGeometry::CAMERA, 0.5)
    }

    #[must_use]
    pub fn kind(&self) -> JoystickKind {
        self.kind
    }

    #[must_use]
    pub fn geometry(&self) -> &JoystickGeometry {
        &self.geometry
    }

    #[must_use]
    pub fn knob(&self) -> KnobPose {
        self.knob
    }

    /// Whether a pointer, key or stick is currently deflecting the knob.
    #[must_use]
    pub fn is_engaged(&self) -> bool {
        self.engaged
    }

    /// Map a raw offset to the control vector and move the knob.
    ///
    /// The ship widget returns the curve-shaped vector for intent mapping;
    /// the camera widget returns the clamped vector times its feed scale.
    pub fn update(&mut self, raw: Vec2) -> Vec2 {
        let clamped = self.geometry.clamp(raw);
        self.knob = self.geometry.knob_pose(clamped);
        self.engaged = clamped != Vec2::ZERO;
        match self.kind {
            JoystickKind::Ship => {
                let max = self.geometry.max_distance();
                Vec2::new(precision_curve(clamped.x, max), precision_curve(clamped.y, max))
            }
            JoystickKind::Camera => clamped * self.feed_scale,
        }
    }

    /// Return the knob to the centre.
    pub fn recenter(&mut self) {
        self.knob = KnobPose::CENTERED;
        self.engaged = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn test_dead_zone_yields_exact_zero() {
        let g = JoystickGeometry::SHIP;
        assert_eq!(g.clamp(Vec2::new(1.0, 1.0)), Vec2::ZERO);
        assert_eq!(g.clamp(Vec2::new(-1.9, 0.0)), Vec2::ZERO);
        assert_eq!(g.clamp(Vec2::ZERO), Vec2::ZERO);
    }

    #[test]
    fn test_offset_inside_track_passes_through() {
        let g = JoystickGeometry::SHIP;
        let raw = Vec2::new(10.0, -20.0);
        assert_eq!(g.clamp(raw), raw);
    }

    #[test]
    fn test_clamp_limits_magnitude_preserving_direction() {
        for geometry in [JoystickGeometry::SHIP, JoystickGeometry::CAMERA] {
            let max = geometry.max_distance();
            for raw in [
                Vec2::new(500.0, 0.0),
                Vec2::new(-300.0, 400.0),
                Vec2::new(0.0, -1000.0),
                Vec2::new(90.0, 90.0),
            ] {
                let out = geometry.clamp(raw);
                assert!(out.length() <= max + EPS);
                assert!((out.length() - max).abs() < EPS);
                assert!((out.normalize() - raw.normalize()).length() < EPS);
            }
        }
    }

    #[test]
    fn test_max_distance_per_kind() {
        assert!((JoystickGeometry::SHIP.max_distance() - 64.0).abs() < EPS);
        assert!((JoystickGeometry::CAMERA.max_distance() - 58.0).abs() < EPS);
    }

    #[test]
    fn test_degenerate_geometry_is_zero() {
        let g = JoystickGeometry {
            radius: 5.0,
            knob_margin: 8.0,
            dead_zone: 0.0,
            tilt_degrees: 10.0,
        };
        assert_eq!(g.max_distance(), 0.0);
        assert_eq!(g.clamp(Vec2::new(30.0, 0.0)), Vec2::ZERO);
        assert_eq!(g.knob_pose(Vec2::ZERO), KnobPose::CENTERED);
    }

    #[test]
    fn test_nan_offset_is_zero() {
        let g = JoystickGeometry::CAMERA;
        assert_eq!(g.clamp(Vec2::new(f32::NAN, 3.0)), Vec2::ZERO);
    }

    #[test]
    fn test_precision_curve() {
        assert!((precision_curve(64.0, 64.0) - 32.0).abs() < EPS);
        assert!((precision_curve(-8.0, 64.0) + 0.5).abs() < EPS);
        assert_eq!(precision_curve(0.0, 64.0), 0.0);
        assert_eq!(precision_curve(10.0, 0.0), 0.0);
    }

    #[test]
    fn test_exponential_curve() {
        assert!((exponential_curve(40.0, 40.0, 1.5) - 40.0).abs() < EPS);
        // (10/40)^1.5 * 40 = 0.125 * 40 = 5
        assert!((exponential_curve(10.0, 40.0, 1.5) - 5.0).abs() < EPS);
        assert!((exponential_curve(-10.0, 40.0, 1.5) + 5.0).abs() < EPS);
        assert_eq!(exponential_curve(0.0, 40.0, 1.5), 0.0);
    }

    #[test]
    fn test_knob_tilt() {
        let g = JoystickGeometry::SHIP;
        let pose = g.knob_pose(Vec2::new(64.0, 0.0));
        assert!((pose.tilt_y_degrees + 10.0).abs() < EPS);
        assert!(pose.tilt_x_degrees.abs() < EPS);

        let pose = g.knob_pose(Vec2::new(0.0, 32.0));
        assert!((pose.tilt_x_degrees - 5.0).abs() < EPS);
    }

    #[test]
    fn test_ship_widget_applies_curve() {
        let mut widget = JoystickWidget::ship();
        let out = widget.update(Vec2::new(200.0, 0.0));
        assert!((out.x - 32.0).abs() < EPS);
        assert_eq!(out.y, 0.0);
        assert!((widget.knob().offset.x - 64.0).abs() < EPS);
        assert!(widget.is_engaged());
    }

    #[test]
    fn test_camera_widget_feeds_half_vector() {
        let mut widget = JoystickWidget::camera();
        let out = widget.update(Vec2::new(0.0, -100.0));
        assert!((out.y + 29.0).abs() < EPS);
        assert!((widget.knob().offset.y + 58.0).abs() < EPS);
    }

    #[test]
    fn test_recenter() {
        let mut widget = JoystickWidget::camera();
        widget.update(Vec2::new(30.0, 30.0));
        widget.recenter();
        assert_eq!(widget.knob(), KnobPose::CENTERED);
        assert!(!widget.is_engaged());
    }
}
