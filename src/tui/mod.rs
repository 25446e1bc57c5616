//! TUI (Terminal User Interface) for test mode
//!
//! Paints the live joystick state and owns the terminal while the test loop
//! runs.

pub mod render;
pub mod terminal;

pub use render::TestView;
pub use terminal::{Screen, ScreenInput, TerminalScreen};
