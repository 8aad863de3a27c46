//! Shared telemetry feed and the polling display that reads it.
//!
//! The session publishes into a [`TelemetryFeed`]; the display polls the feed
//! on its own fixed interval rather than being pushed every update.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use orrery_config::TelemetryConfig;
use tracing::debug;

use crate::tracker::TelemetrySnapshot;

/// Process-wide snapshot slot. Cloning shares the slot.
#[derive(Debug, Clone, Default)]
pub struct TelemetryFeed {
    latest: Arc<RwLock<TelemetrySnapshot>>,
}

impl TelemetryFeed {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, snapshot: &TelemetrySnapshot) {
        match self.latest.write() {
            Ok(mut slot) => slot.clone_from(snapshot),
            Err(_) => debug!("Telemetry feed lock poisoned; update dropped"),
        }
    }

    /// Copy of the latest snapshot. A poisoned slot still yields its value.
    #[must_use]
    pub fn latest(&self) -> TelemetrySnapshot {
        match self.latest.read() {
            Ok(slot) => slot.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Reset to the idle snapshot, e.g. when a session ends.
    pub fn clear(&self) {
        self.publish(&TelemetrySnapshot::default());
    }
}

/// Format telemetry for a one-line readout such as the window title.
///
/// Example: `POS: 1000 0 -12 | SPD: x0.50 c | DIST: 1.00 AU | NEAR: Earth`
pub fn format_telemetry(snapshot: &TelemetrySnapshot) -> String {
    let p = snapshot.position;
    format!(
        "POS: {} {} {} | SPD: x{:.2} c | DIST: {:.2} AU | NEAR: {}",
        p.x, p.y, p.z, snapshot.speed_c, snapshot.distance_au, snapshot.nearest_body,
    )
}

/// Polls a feed at a fixed interval and keeps the formatted text.
#[derive(Debug, Clone)]
pub struct TelemetryDisplay {
    interval: Duration,
    last_poll: Option<Duration>,
    text: String,
}

impl Default for TelemetryDisplay {
    fn default() -> Self {
        Self::new(&TelemetryConfig::default())
    }
}

impl TelemetryDisplay {
    #[must_use]
    pub fn new(config: &TelemetryConfig) -> Self {
        Self {
            interval: Duration::from_millis(config.poll_interval_ms),
            last_poll: None,
            text: format_telemetry(&TelemetrySnapshot::default()),
        }
    }

    /// Poll the feed if the interval has elapsed since the last poll.
    /// Returns the new text only when it differs from the previous one.
    pub fn poll(&mut self, feed: &TelemetryFeed, now: Duration) -> Option<&str> {
        if let Some(last) = self.last_poll
            && now.saturating_sub(last) < self.interval
        {
            return None;
        }
        self.last_poll = Some(now);
        let text = format_telemetry(&feed.latest());
        if text == self.text {
            return None;
        }
        self.text = text;
        Some(&self.text)
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}
