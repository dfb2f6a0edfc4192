//! Terminal setup and teardown.
//!
//! [`TerminalSession`] pairs raw mode and the alternate screen with their
//! teardown: dropping the session restores the terminal even when the event
//! loop exits through `?`.

use std::io::{self, IsTerminal, Stdout};

use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::{DepthViewError, Result};

/// Type alias for our terminal backend.
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// An initialized terminal that is restored on drop.
pub struct TerminalSession {
    terminal: Tui,
    restored: bool,
}

impl TerminalSession {
    /// Enters raw mode and the alternate screen.
    ///
    /// # Errors
    ///
    /// Returns an error if stdout is not a TTY or initialization fails.
    pub fn start() -> Result<Self> {
        Ok(Self {
            terminal: setup_terminal()?,
            restored: false,
        })
    }

    pub fn terminal(&mut self) -> &mut Tui {
        &mut self.terminal
    }

    /// Current terminal size in cells.
    pub fn size(&self) -> Result<(u16, u16)> {
        let size = self
            .terminal
            .size()
            .map_err(|e| DepthViewError::Io(format!("failed to read terminal size: {e}")))?;
        Ok((size.width, size.height))
    }

    /// Restores the terminal explicitly, surfacing any error.
    pub fn finish(mut self) -> Result<()> {
        self.restored = true;
        restore_terminal(&mut self.terminal)
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if !self.restored {
            let _ = restore_terminal(&mut self.terminal);
        }
    }
}

/// Initializes the terminal for TUI rendering.
///
/// # Errors
///
/// Returns an error if terminal initialization fails or if stdout is not a TTY.
pub fn setup_terminal() -> Result<Tui> {
    if !io::stdout().is_terminal() {
        return Err(DepthViewError::Io(
            "the depth view requires an interactive terminal (TTY)".to_string(),
        ));
    }

    enable_raw_mode().map_err(|e| DepthViewError::Io(format!("failed to enable raw mode: {e}")))?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).map_err(|e| {
        let _ = disable_raw_mode();
        DepthViewError::Io(format!("failed to enter alternate screen: {e}"))
    })?;

    Terminal::new(CrosstermBackend::new(stdout)).map_err(|e| {
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = disable_raw_mode();
        DepthViewError::Io(format!("failed to create terminal: {e}"))
    })
}

/// Leaves raw mode and the alternate screen and shows the cursor.
///
/// # Errors
///
/// Returns an error if terminal restoration fails.
pub fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode().map_err(|e| DepthViewError::Io(e.to_string()))?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .map_err(|e| DepthViewError::Io(e.to_string()))?;
    terminal
        .show_cursor()
        .map_err(|e| DepthViewError::Io(e.to_string()))
}
