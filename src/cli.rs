// CLI definitions using clap

use clap::{ArgGroup, Parser};
use thiserror::Error;

const EXAMPLES: &str = "\
Examples:
  evdev-jstest --list
  evdev-jstest --test 1";

#[derive(Parser, Debug)]
#[command(name = "evdev-jstest")]
#[command(version, about = "List available joysticks or test a joystick.")]
#[command(long_about = "List available joysticks or test a joystick.\n\
    Devices are read through the Linux evdev interface (/dev/input/event*).")]
#[command(after_help = EXAMPLES)]
#[command(group(ArgGroup::new("mode").args(["list", "test", "event"])))]
pub struct Cli {
    /// Search for available joysticks and list their properties
    #[arg(short, long)]
    pub list: bool,

    /// Display a graphical representation of the current joystick state
    #[arg(short, long, value_name = "JOYNUM", allow_negative_numbers = true)]
    pub test: Option<String>,

    /// Display the events that are received from the joystick
    #[arg(short, long, value_name = "JOYNUM", allow_negative_numbers = true)]
    pub event: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    /// Milliseconds between polls in test mode
    #[arg(long, default_value_t = 10, hide = true)]
    pub interval_ms: u64,
}

/// Mode selected on the command line, decoded once
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// No mode given
    Help,
    List,
    Test(i32),
    EventLog(i32),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CliError {
    #[error("JOYNUM argument must be a number, but was '{0}'")]
    InvalidIndex(String),
}

impl Cli {
    /// Decode the selected mode. `--help` and `--version` never get here,
    /// clap handles them during parsing.
    pub fn mode(&self) -> Result<Command, CliError> {
        if self.list {
            return Ok(Command::List);
        }
        if let Some(raw) = &self.test {
            return parse_index(raw).map(Command::Test);
        }
        if let Some(raw) = &self.event {
            return parse_index(raw).map(Command::EventLog);
        }
        Ok(Command::Help)
    }
}

/// Parse a joystick index: optional leading whitespace, base 10, fits in
/// `i32`, nothing after the digits
pub fn parse_index(raw: &str) -> Result<i32, CliError> {
    raw.trim_start()
        .parse::<i32>()
        .map_err(|_| CliError::InvalidIndex(raw.to_string()))
}
