//! Input device abstraction
//!
//! The tester never talks to hardware directly. Everything it needs from the
//! input subsystem goes through [`InputBackend`] (discovery and opening) and
//! [`InputDevice`] (capabilities and the event stream of one open joystick).

use thiserror::Error;

/// Hat direction bits. Diagonals set two orthogonal bits.
pub const HAT_CENTERED: u8 = 0x00;
pub const HAT_UP: u8 = 0x01;
pub const HAT_RIGHT: u8 = 0x02;
pub const HAT_DOWN: u8 = 0x04;
pub const HAT_LEFT: u8 = 0x08;

/// Errors from the input subsystem
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("Failed to install interrupt handler: {0}")]
    Signal(#[source] ctrlc::Error),
    #[error("No joystick with index {0}")]
    NotFound(i32),
    #[error("Failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to read events: {0}")]
    Read(#[source] std::io::Error),
}

/// Number of each control kind a device reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub axes: usize,
    pub buttons: usize,
    pub hats: usize,
    pub balls: usize,
}

/// A single state change reported by an open device.
///
/// Component indices are positions in the device's capability lists, not
/// raw kernel codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    AxisMotion { axis: u8, value: i16 },
    ButtonChange { button: u8, pressed: bool },
    HatMotion { hat: u8, value: u8 },
    BallMotion { ball: u8, dx: i16, dy: i16 },
    /// Interrupt requested by the user
    Quit,
    /// Event type the tester has no use for, identified by its raw type code
    Unknown { kind: u16 },
}

/// Device discovery and opening
pub trait InputBackend {
    type Device: InputDevice;

    /// Number of joysticks found when the backend was initialized
    fn device_count(&self) -> usize;

    /// Name of the joystick at `index`, if there is one
    fn device_name(&self, index: usize) -> Option<String>;

    /// Open the joystick at `index`. Dropping the handle closes it.
    fn open(&mut self, index: i32) -> Result<Self::Device, DeviceError>;
}

/// One open joystick
pub trait InputDevice {
    /// Index the device was opened with
    fn index(&self) -> i32;

    fn name(&self) -> &str;

    fn capabilities(&self) -> Capabilities;

    /// Next pending event, or `None` once the queue is empty. Never blocks.
    fn poll_event(&mut self) -> Result<Option<InputEvent>, DeviceError>;

    /// Block until the next event arrives.
    fn wait_event(&mut self) -> Result<InputEvent, DeviceError>;
}
