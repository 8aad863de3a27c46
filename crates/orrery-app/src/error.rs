//! Errors that can end the `orrery` binary.

use orrery_config::ConfigError;
use winit::error::EventLoopError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration could not be loaded or written.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The windowing event loop failed to start or exited with an error.
    #[error("event loop failed: {0}")]
    EventLoop(#[from] EventLoopError),
}
