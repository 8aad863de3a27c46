//! Ship flight model and the third-person orbit camera that follows it.

pub mod camera_rig;
pub mod flight_model;

pub use camera_rig::{CameraPose, CameraRig, CameraSettings, CameraState, RateLimiter};
pub use flight_model::{FlightModel, FlightTuning, ShipKinematics, SpeedMode, ThrusterFlags};
