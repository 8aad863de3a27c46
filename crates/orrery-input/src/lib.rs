//! Input aggregation: keyboard, pointer, wheel and gamepad events normalised
//! into ship intents and joystick vectors.

pub mod action_map;
pub mod gamepad;
pub mod gesture;
pub mod intent;
pub mod joystick;
pub mod keyboard;
pub mod mouse;

pub use action_map::{Action, InputMap};
pub use gamepad::{GamepadAxes, GamepadManager, GamepadState, UnifiedButton, stick_to_offset};
pub use gesture::{GestureEvent, GestureTarget, GestureTracker, PointerId};
pub use intent::{Intent, IntentState};
pub use joystick::{
    JoystickGeometry, JoystickKind, JoystickWidget, KnobPose, exponential_curve, precision_curve,
};
pub use keyboard::{ControlKey, KeyboardState, RawKeyEvent};
pub use mouse::MouseState;
