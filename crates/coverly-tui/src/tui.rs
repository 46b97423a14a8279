//! Owning the terminal.
//!
//! `Tui::enter` puts the terminal into raw mode on the alternate screen.
//! Dropping the value, or panicking anywhere, puts it back.

use std::io::{Stdout, stdout};

use color_eyre::config::HookBuilder;
use color_eyre::eyre::Result;
use crossterm::cursor;
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::{Frame, Terminal};

pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl Tui {
    pub fn enter() -> Result<Self> {
        terminal::enable_raw_mode()?;
        match open() {
            Ok(terminal) => Ok(Self { terminal }),
            Err(e) => {
                restore();
                Err(e)
            }
        }
    }

    pub fn draw(&mut self, render: impl FnOnce(&mut Frame)) -> Result<()> {
        self.terminal.draw(render)?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        restore();
    }
}

fn open() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    execute!(stdout(), EnterAlternateScreen, cursor::Hide)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.clear()?;
    Ok(terminal)
}

/// Errors are ignored; there is nothing left to report them to.
fn restore() {
    let _ = execute!(stdout(), LeaveAlternateScreen, cursor::Show);
    let _ = terminal::disable_raw_mode();
}

/// Report hooks that leave the alternate screen before printing.
/// Call before [`Tui::enter`].
pub fn install_hooks() -> Result<()> {
    let (panic, report) = HookBuilder::default()
        .display_env_section(false)
        .panic_section("coverly-tui crashed; the log file may hold the last events")
        .into_hooks();
    report.install()?;

    let panic = panic.into_panic_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore();
        panic(info);
    }));
    Ok(())
}
