//! Ship telemetry: sampled at a reduced rate, published to a shared feed,
//! polled by the display at a fixed interval.

pub mod bodies;
pub mod feed;
pub mod tracker;

pub use bodies::{AU, BODIES, CelestialBody, nearest_body};
pub use feed::{TelemetryDisplay, TelemetryFeed, format_telemetry};
pub use tracker::{TelemetrySnapshot, TelemetryTracker};
