//! Joystick/gamepad tester
//!
//! Main entry point: argument decoding and mode dispatch.

use anyhow::Result;
use clap::{CommandFactory, Parser};
use std::io::{stderr, stdout};
use std::process::ExitCode;
use std::time::Duration;
use tracing::debug;

use evdev_jstest::cli::{Cli, Command};
use evdev_jstest::commands::{self, Outcome};
use evdev_jstest::session::SessionOptions;
use evdev_jstest::tui::TerminalScreen;
use evdev_jstest::{EvdevBackend, InputBackend};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let command = match cli.mode() {
        Ok(command) => command,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let options = SessionOptions {
        poll_interval: Duration::from_millis(cli.interval_ms),
    };

    match run(command, options) {
        Ok(outcome) => outcome.into(),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command, options: SessionOptions) -> Result<Outcome> {
    let mut out = stdout().lock();
    let mut err = stderr().lock();

    match command {
        Command::Help => {
            Cli::command().print_help()?;
            Ok(Outcome::Failure)
        }
        Command::List => commands::list(&mut init_backend(false)?, &mut out, &mut err),
        Command::Test(index) => commands::test(
            &mut init_backend(true)?,
            index,
            options,
            TerminalScreen::enter,
            &mut out,
            &mut err,
        ),
        Command::EventLog(index) => {
            commands::event(&mut init_backend(true)?, index, &mut out, &mut err)
        }
    }
}

/// Scan for joysticks; sessions also turn SIGINT into a `Quit` event
fn init_backend(watch_interrupts: bool) -> Result<EvdevBackend> {
    let backend = EvdevBackend::init()?;
    debug!("Input backend found {} joystick(s)", backend.device_count());
    if watch_interrupts {
        backend.watch_interrupts()?;
    }
    Ok(backend)
}
