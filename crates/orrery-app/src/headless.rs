//! Windowless smoke run: a session with forward thrust held for a fixed
//! number of ticks.

use orrery_config::Config;
use orrery_telemetry::{TelemetrySnapshot, format_telemetry};
use tracing::{info, instrument};

use crate::game_loop::{FrameClock, HEADLESS_DT};
use crate::session::SessionHost;

/// Run `ticks` frames of [`HEADLESS_DT`] with forward thrust held and return
/// the last telemetry the session published.
#[instrument(skip(config))]
pub fn run_headless(config: &Config, ticks: u32) -> TelemetrySnapshot {
    let mut host = SessionHost::from_config(config);
    host.start();
    host.bridge().ship().set_forward(true);

    let mut clock = FrameClock::new();
    for _ in 0..ticks {
        clock.advance(HEADLESS_DT, |dt| {
            host.frame(dt);
        });
    }

    let snapshot = host.feed().latest();
    let speed = host
        .session()
        .map_or(0.0, |session| session.flight().kinematics().speed());
    info!(
        ticks,
        speed,
        telemetry = %format_telemetry(&snapshot),
        "Headless run finished"
    );
    host.end();
    snapshot
}
