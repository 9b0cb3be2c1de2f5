use std::io::{BufWriter, Stderr, stderr};

use crossterm::{
    ExecutableCommand,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::{CrosstermBackend, Terminal};
use tracing::warn;

pub type Backend = CrosstermBackend<BufWriter<Stderr>>;

/// The terminal in raw mode on the alternate screen.
///
/// Dropping it restores the previous screen, also when the event loop
/// returns early with an error.
pub struct TerminalGuard {
    terminal: Terminal<Backend>,
}

impl TerminalGuard {
    pub fn enter() -> std::io::Result<Self> {
        stderr().execute(EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;

        let mut terminal = Terminal::new(CrosstermBackend::new(BufWriter::new(stderr())))?;
        terminal.clear()?;
        Ok(Self { terminal })
    }

    pub fn terminal(&mut self) -> &mut Terminal<Backend> {
        &mut self.terminal
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(err) = terminal::disable_raw_mode() {
            warn!(error = %err, "Failed to leave raw mode");
        }
        if let Err(err) = stderr().execute(LeaveAlternateScreen) {
            warn!(error = %err, "Failed to leave alternate screen");
        }
        let _ = self.terminal.show_cursor();
    }
}
