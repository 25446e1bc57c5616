//! Joystick/gamepad tester
//!
//! Lists joysticks, shows a live terminal view of one device's axes,
//! buttons, hats and balls, or logs its raw events.

pub mod cli;
pub mod commands;
pub mod device;
pub mod dispatch;
pub mod evdev_backend;
pub mod session;
pub mod snapshot;
pub mod tui;

pub use device::{Capabilities, DeviceError, InputBackend, InputDevice, InputEvent};
pub use dispatch::{drain, DrainOutcome};
pub use evdev_backend::{EvdevBackend, EvdevJoystick};
pub use snapshot::JoystickSnapshot;
