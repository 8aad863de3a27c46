//! Orrery application shell: session lifecycle, the per-frame scheduler, the
//! winit window and the headless runner.

pub mod error;
pub mod game_loop;
pub mod headless;
pub mod layout;
pub mod session;
pub mod window;

pub use error::AppError;
pub use game_loop::{FrameClock, HEADLESS_DT, MAX_FRAME_TIME};
pub use headless::run_headless;
pub use layout::WidgetLayout;
pub use session::{FrameReport, Session, SessionHost, SessionSettings, Teardown};
pub use window::{OrreryApp, run, window_attributes_from_config};
