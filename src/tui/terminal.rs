//! Terminal setup and teardown utilities.

use std::io::{self, IsTerminal, Stdout};

use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::{MevShieldError, Result};

/// Type alias for our terminal backend.
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

fn io_error(context: &'static str) -> impl Fn(io::Error) -> MevShieldError {
    move |e| MevShieldError::Io(format!("{context}: {e}"))
}

/// Initializes the terminal for TUI rendering.
///
/// Enables raw mode, switches to the alternate screen buffer, and installs
/// a panic hook that puts the terminal back before the panic is reported.
///
/// # Errors
///
/// Returns [`MevShieldError::Io`] if stdout is not a TTY or the terminal
/// cannot be configured.
pub fn setup_terminal() -> Result<Tui> {
    if !io::stdout().is_terminal() {
        return Err(MevShieldError::Io(
            "the dashboard needs an interactive terminal; use `mevshield snapshot` for plain output"
                .to_string(),
        ));
    }

    enable_raw_mode().map_err(io_error("failed to enable raw mode"))?;

    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(io_error("failed to enter alternate screen")(e));
    }

    let terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
        Ok(terminal) => terminal,
        Err(e) => {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            let _ = disable_raw_mode();
            return Err(io_error("failed to create terminal")(e));
        }
    };

    install_panic_hook();
    Ok(terminal)
}

/// Restores the terminal before the default panic output is printed.
fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        previous(info);
    }));
}

/// Restores the terminal to its original state.
///
/// # Errors
///
/// Returns [`MevShieldError::Io`] if restoration fails.
pub fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode().map_err(io_error("failed to disable raw mode"))?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .map_err(io_error("failed to leave alternate screen"))?;
    terminal
        .show_cursor()
        .map_err(io_error("failed to show cursor"))?;
    Ok(())
}
