//! Command handlers for the CLI modes.

use crate::device::{InputBackend, InputDevice};
use crate::session::{self, LoopExit, SessionOptions, INTERRUPT_NOTICE};
use crate::tui::Screen;
use anyhow::Result;
use std::io::Write;
use std::process::ExitCode;
use tracing::debug;

/// How a command finished, mapped to the process exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Success => ExitCode::SUCCESS,
            Outcome::Failure => ExitCode::FAILURE,
        }
    }
}

/// Describe every joystick. A device that fails to open is reported on
/// `err` and skipped.
pub fn list<B, W, E>(backend: &mut B, out: &mut W, err: &mut E) -> Result<Outcome>
where
    B: InputBackend,
    W: Write + ?Sized,
    E: Write + ?Sized,
{
    let count = backend.device_count();
    if count == 0 {
        writeln!(out, "No joysticks were found")?;
        return Ok(Outcome::Success);
    }

    writeln!(out, "Found {} joystick(s)\n", count)?;
    for index in 0..count as i32 {
        if let Some(device) = open_or_report(backend, index, err)? {
            print_joystick_info(out, &device)?;
        }
    }
    Ok(Outcome::Success)
}

/// Live view of one joystick.
///
/// `open_screen` is only called once the device is open, so a bad index
/// never touches the terminal.
pub fn test<B, S, F, W, E>(
    backend: &mut B,
    index: i32,
    options: SessionOptions,
    open_screen: F,
    out: &mut W,
    err: &mut E,
) -> Result<Outcome>
where
    B: InputBackend,
    S: Screen,
    F: FnOnce() -> Result<S>,
    W: Write + ?Sized,
    E: Write + ?Sized,
{
    let Some(mut device) = open_or_report(backend, index, err)? else {
        return Ok(Outcome::Failure);
    };

    let exit = {
        let mut screen = open_screen()?;
        session::run_test_loop(&mut device, &mut screen, options)?
    };

    // Terminal is restored by now
    if exit == LoopExit::Interrupted {
        writeln!(out, "{}", INTERRUPT_NOTICE)?;
    }
    Ok(Outcome::Success)
}

/// Raw event log of one joystick
pub fn event<B, W, E>(backend: &mut B, index: i32, out: &mut W, err: &mut E) -> Result<Outcome>
where
    B: InputBackend,
    W: Write + ?Sized,
    E: Write + ?Sized,
{
    let Some(mut device) = open_or_report(backend, index, err)? else {
        return Ok(Outcome::Failure);
    };

    print_joystick_info(out, &device)?;
    writeln!(out, "Entering joystick test loop, press Ctrl-c to exit")?;
    out.flush()?;

    session::run_event_log(&mut device, out)?;
    Ok(Outcome::Success)
}

fn open_or_report<B, E>(backend: &mut B, index: i32, err: &mut E) -> Result<Option<B::Device>>
where
    B: InputBackend,
    E: Write + ?Sized,
{
    match backend.open(index) {
        Ok(device) => Ok(Some(device)),
        Err(e) => {
            if let Some(name) = usize::try_from(index)
                .ok()
                .and_then(|i| backend.device_name(i))
            {
                debug!("Open failed for '{}'", name);
            }
            writeln!(err, "Unable to open joystick {}: {}", index, e)?;
            Ok(None)
        }
    }
}

/// Capability summary shared by `--list` and `--event`
pub fn print_joystick_info<D, W>(out: &mut W, device: &D) -> Result<()>
where
    D: InputDevice + ?Sized,
    W: Write + ?Sized,
{
    let caps = device.capabilities();
    writeln!(out, "Joystick Name:     '{}'", device.name())?;
    writeln!(out, "Joystick Number:   {:2}", device.index())?;
    writeln!(out, "Number of Axes:    {:2}", caps.axes)?;
    writeln!(out, "Number of Buttons: {:2}", caps.buttons)?;
    writeln!(out, "Number of Hats:    {:2}", caps.hats)?;
    writeln!(out, "Number of Balls:   {:2}", caps.balls)?;
    writeln!(out)?;
    Ok(())
}
