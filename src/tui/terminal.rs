//! Terminal ownership for test mode

use crate::tui::render::{self, TestView};
use anyhow::{Context, Result};
use crossterm::{
    cursor::Show,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use std::io::{stdout, Stdout};
use std::sync::Once;
use std::time::Duration;

/// User input seen since the last check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenInput {
    Idle,
    /// Terminal size changed, the current frame is stale
    Resized,
    Exit,
}

/// Where the test loop paints and reads keys from
pub trait Screen {
    fn draw(&mut self, view: &TestView<'_>) -> Result<()>;

    /// Drain pending terminal input without blocking
    fn poll_input(&mut self) -> Result<ScreenInput>;
}

/// Raw-mode alternate screen, restored when dropped
pub struct TerminalScreen {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalScreen {
    /// Switch the terminal into raw mode with a hidden cursor
    pub fn enter() -> Result<Self> {
        install_panic_hook();
        enable_raw_mode().context("Failed to enable raw mode")?;
        Self::setup().map_err(|e| {
            restore();
            e
        })
    }

    fn setup() -> Result<Self> {
        stdout()
            .execute(EnterAlternateScreen)
            .context("Failed to enter alternate screen")?;
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
        terminal.hide_cursor()?;
        terminal.clear()?;
        Ok(Self { terminal })
    }
}

impl Screen for TerminalScreen {
    fn draw(&mut self, view: &TestView<'_>) -> Result<()> {
        self.terminal.draw(|frame| render::render(frame, view))?;
        Ok(())
    }

    fn poll_input(&mut self) -> Result<ScreenInput> {
        let mut input = ScreenInput::Idle;
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) if is_exit_key(&key) => return Ok(ScreenInput::Exit),
                Event::Resize(_, _) => input = ScreenInput::Resized,
                _ => {}
            }
        }
        Ok(input)
    }
}

impl Drop for TerminalScreen {
    fn drop(&mut self) {
        restore();
    }
}

/// Restore the terminal before the panic message is printed, otherwise it
/// lands on the alternate screen and is lost
fn install_panic_hook() {
    static INSTALLED: Once = Once::new();
    INSTALLED.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            restore();
            previous(info);
        }));
    });
}

/// Best effort: runs on error paths where nothing else can be reported
fn restore() {
    let _ = disable_raw_mode();
    let _ = stdout().execute(LeaveAlternateScreen);
    let _ = stdout().execute(Show);
}

/// Ctrl-C (delivered as a key in raw mode), `q` or Esc
pub fn is_exit_key(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        KeyCode::Char('q') | KeyCode::Esc => true,
        _ => false,
    }
}
