//! Per-device sessions: the live test loop and the raw event log

use crate::device::{InputDevice, InputEvent};
use crate::dispatch::drain;
use crate::snapshot::JoystickSnapshot;
use crate::tui::{Screen, ScreenInput, TestView};
use anyhow::Result;
use std::io::Write;
use std::time::Duration;
use tracing::{debug, warn};

/// Default sleep between test-mode polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Notice printed when the device delivers an interrupt
pub const INTERRUPT_NOTICE: &str = "Received interrupt, exiting";

/// Test-mode tunables
#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    pub poll_interval: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Why the test loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// The device reported `Quit`
    Interrupted,
    /// The user pressed an exit key
    KeyPress,
}

/// Run the live view until the device quits or the user presses an exit key.
///
/// Each tick sleeps, drains the device into the snapshot and repaints only
/// when something changed (or the terminal was resized).
pub fn run_test_loop<D, S>(device: &mut D, screen: &mut S, options: SessionOptions) -> Result<LoopExit>
where
    D: InputDevice + ?Sized,
    S: Screen + ?Sized,
{
    let mut snapshot = JoystickSnapshot::new(device.capabilities());
    let mut dirty = true;

    loop {
        std::thread::sleep(options.poll_interval);

        let outcome = drain(device, &mut snapshot)?;
        if outcome.quit {
            debug!("Device {} reported quit", device.index());
            return Ok(LoopExit::Interrupted);
        }
        dirty |= outcome.applied;

        if dirty {
            let view = TestView {
                snapshot: &snapshot,
                name: device.name(),
                index: device.index(),
            };
            screen.draw(&view)?;
            dirty = false;
        }

        match screen.poll_input()? {
            ScreenInput::Exit => return Ok(LoopExit::KeyPress),
            ScreenInput::Resized => dirty = true,
            ScreenInput::Idle => {}
        }
    }
}

/// Print every event as it arrives until the device quits
pub fn run_event_log<D, W>(device: &mut D, out: &mut W) -> Result<()>
where
    D: InputDevice + ?Sized,
    W: Write + ?Sized,
{
    let joystick = device.index();
    loop {
        let event = device.wait_event()?;
        match event {
            InputEvent::Quit => {
                writeln!(out, "{}", INTERRUPT_NOTICE)?;
                return Ok(());
            }
            InputEvent::Unknown { kind } => {
                warn!("Unhandled event type: {}", kind);
            }
            _ => {
                if let Some(line) = format_event(joystick, &event) {
                    writeln!(out, "{}", line)?;
                    out.flush()?;
                }
            }
        }
    }
}

/// One event-log line, or `None` for events that carry no control data
pub fn format_event(joystick: i32, event: &InputEvent) -> Option<String> {
    let line = match *event {
        InputEvent::AxisMotion { axis, value } => {
            format!("AxisMotion: joystick: {joystick} axis: {axis} value: {value}")
        }
        InputEvent::ButtonChange { button, pressed } => {
            let kind = if pressed { "ButtonDown" } else { "ButtonUp" };
            format!(
                "{kind}: joystick: {joystick} button: {button} state: {}",
                u8::from(pressed)
            )
        }
        InputEvent::HatMotion { hat, value } => {
            format!("HatMotion: joystick: {joystick} hat: {hat} value: {value}")
        }
        InputEvent::BallMotion { ball, dx, dy } => {
            format!("BallMotion: joystick: {joystick} ball: {ball} x: {dx} y: {dy}")
        }
        InputEvent::Quit | InputEvent::Unknown { .. } => return None,
    };
    Some(line)
}
