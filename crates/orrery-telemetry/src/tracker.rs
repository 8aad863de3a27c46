//! Reduced-rate ship telemetry sampling.
//!
//! The tracker is ticked every frame but only samples every
//! `sample_every_ticks` frames. Each published value has its own hysteresis
//! so the readout does not flicker:
//!
//! - position is rounded to whole units and replaced only when some axis
//!   moved by at least one unit;
//! - speed (multiples of light speed) is rounded to 0.1 and replaced only
//!   when the rounded value changes;
//! - distance from the origin in AU is rounded to 0.01 and replaced when it
//!   moves by at least 0.01 AU, or unconditionally every 120th frame.

use std::time::Duration;

use glam::{IVec3, Vec3};
use orrery_config::TelemetryConfig;
use tracing::trace;

use crate::bodies::{AU, nearest_body};

/// Kilometres represented by one world unit.
const KM_PER_UNIT: f64 = 149_600.0;
/// Speed of light in km/s.
const LIGHT_SPEED_KM_S: f64 = 299_792.0;
/// Frames between unconditional AU refreshes.
const AU_REFRESH_FRAMES: u64 = 120;

/// Latest published telemetry.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetrySnapshot {
    /// Position rounded to whole units.
    pub position: IVec3,
    /// Speed as a multiple of light speed, rounded to 0.1.
    pub speed_c: f64,
    /// Distance from the origin in AU, rounded to 0.01.
    pub distance_au: f64,
    pub nearest_body: &'static str,
}

impl Default for TelemetrySnapshot {
    fn default() -> Self {
        Self {
            position: IVec3::ZERO,
            speed_c: 0.0,
            distance_au: 0.0,
            nearest_body: "Sun",
        }
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryTracker {
    sample_every: u64,
    frame: u64,
    previous: Option<(Vec3, Duration)>,
    speed_tenths: i64,
    snapshot: TelemetrySnapshot,
}

impl Default for TelemetryTracker {
    fn default() -> Self {
        Self::new(&TelemetryConfig::default())
    }
}

impl TelemetryTracker {
    #[must_use]
    pub fn new(config: &TelemetryConfig) -> Self {
        Self {
            sample_every: u64::from(config.sample_every_ticks.max(1)),
            frame: 0,
            previous: None,
            speed_tenths: 0,
            snapshot: TelemetrySnapshot::default(),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> &TelemetrySnapshot {
        &self.snapshot
    }

    /// Advance one frame. `now` is the session clock. Returns `true` if the
    /// snapshot changed.
    pub fn tick(&mut self, position: Vec3, now: Duration) -> bool {
        self.frame += 1;
        if self.frame % self.sample_every != 0 {
            return false;
        }
        let before = self.snapshot.clone();

        let rounded = position.round().as_ivec3();
        if (rounded - self.snapshot.position).abs().max_element() >= 1 {
            self.snapshot.position = rounded;
        }

        if let Some((previous, then)) = self.previous {
            let elapsed = now.saturating_sub(then).as_secs_f64();
            if elapsed > 0.0 {
                let distance = f64::from(position.distance(previous));
                let speed_c = distance * KM_PER_UNIT / elapsed / LIGHT_SPEED_KM_S;
                let tenths = (speed_c * 10.0).round() as i64;
                if tenths != self.speed_tenths {
                    self.speed_tenths = tenths;
                    self.snapshot.speed_c = tenths as f64 / 10.0;
                }
            }
        }
        self.previous = Some((position, now));

        let stable = self.snapshot.position.as_vec3();
        let raw_au = f64::from(stable.length()) / f64::from(AU);
        if (raw_au - self.snapshot.distance_au).abs() >= 0.01
            || self.frame % AU_REFRESH_FRAMES == 0
        {
            self.snapshot.distance_au = (raw_au * 100.0).round() / 100.0;
        }
        self.snapshot.nearest_body = nearest_body(stable).name;

        let changed = self.snapshot != before;
        if changed {
            trace!(snapshot = ?self.snapshot, "Telemetry updated");
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_micros(16_667);

    fn run(tracker: &mut TelemetryTracker, frames: u32, position: impl Fn(u32) -> Vec3) {
        for i in 1..=frames {
            tracker.tick(position(i), FRAME * i);
        }
    }

    #[test]
    fn test_samples_every_thirtieth_frame() {
        let mut tracker = TelemetryTracker::default();
        for i in 1..30u32 {
            assert!(!tracker.tick(Vec3::new(1000.0, 0.0, 0.0), FRAME * i));
        }
        assert!(tracker.tick(Vec3::new(1000.0, 0.0, 0.0), FRAME * 30));
        assert_eq!(tracker.snapshot().nearest_body, "Earth");
        assert_eq!(tracker.snapshot().position, IVec3::new(1000, 0, 0));
        assert!((tracker.snapshot().distance_au - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_position_hysteresis() {
        let mut tracker = TelemetryTracker::default();
        run(&mut tracker, 30, |_| Vec3::new(10.2, 0.0, 0.0));
        assert_eq!(tracker.snapshot().position, IVec3::new(10, 0, 0));
        run(&mut tracker, 30, |_| Vec3::new(10.4, 0.3, -0.4));
        assert_eq!(tracker.snapshot().position, IVec3::new(10, 0, 0));
        run(&mut tracker, 30, |_| Vec3::new(11.6, 0.0, 0.0));
        assert_eq!(tracker.snapshot().position, IVec3::new(12, 0, 0));
    }

    #[test]
    fn test_speed_in_light_multiples() {
        let mut tracker = TelemetryTracker::default();
        // 1 unit per second: 149600 km/s ≈ 0.499c → 0.5
        let second = Duration::from_secs(1);
        for i in 1..=30u32 {
            tracker.tick(Vec3::ZERO, second * i / 30);
        }
        for i in 31..=60u32 {
            tracker.tick(Vec3::new(1.0, 0.0, 0.0), second * i / 30);
        }
        assert!((tracker.snapshot().speed_c - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_stationary_speed_zero() {
        let mut tracker = TelemetryTracker::default();
        run(&mut tracker, 90, |_| Vec3::new(5.0, 5.0, 5.0));
        assert_eq!(tracker.snapshot().speed_c, 0.0);
    }

    #[test]
    fn test_distance_rounded_to_hundredths() {
        let mut tracker = TelemetryTracker::default();
        run(&mut tracker, 30, |_| Vec3::new(5_204.0, 0.0, 0.0));
        assert!((tracker.snapshot().distance_au - 5.2).abs() < 1e-9);
        assert_eq!(tracker.snapshot().nearest_body, "Jupiter");
    }

    #[test]
    fn test_small_au_drift_waits_for_refresh() {
        let mut tracker = TelemetryTracker::default();
        run(&mut tracker, 30, |_| Vec3::new(1000.0, 0.0, 0.0));
        // +6 units = 0.006 AU: below the 0.01 threshold at frames 60 and 90.
        for i in 31..=90u32 {
            tracker.tick(Vec3::new(1006.0, 0.0, 0.0), FRAME * i);
        }
        assert!((tracker.snapshot().distance_au - 1.0).abs() < 1e-9);
        // Frame 120 refreshes unconditionally.
        for i in 91..=120u32 {
            tracker.tick(Vec3::new(1006.0, 0.0, 0.0), FRAME * i);
        }
        assert!((tracker.snapshot().distance_au - 1.01).abs() < 1e-9);
    }

    #[test]
    fn test_default_snapshot() {
        let snapshot = TelemetrySnapshot::default();
        assert_eq!(snapshot.nearest_body, "Sun");
        assert_eq!(snapshot.speed_c, 0.0);
    }
}
