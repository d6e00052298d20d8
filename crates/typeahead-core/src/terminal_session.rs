#![forbid(unsafe_code)]

//! Terminal lifecycle guard.
//!
//! [`TerminalSession`] enters raw mode on creation and restores the terminal
//! on drop, including when the program panics.
//!
//! # Contract
//!
//! - Only one session should exist at a time.
//! - Every mode that was enabled is disabled again, in reverse order.

use std::io::{self, Write};
use std::sync::OnceLock;
use std::time::Duration;

use crate::event::Event;

/// Terminal features to enable for the session.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Draw on the alternate screen.
    pub alternate_screen: bool,
    /// Report mouse presses, moves, and scrolls.
    pub mouse_capture: bool,
    /// Deliver pastes as one [`Event::Paste`].
    pub bracketed_paste: bool,
    /// Report terminal focus changes.
    pub focus_events: bool,
}

impl SessionOptions {
    /// Requested modes in the order they are enabled.
    fn modes(&self) -> Vec<Mode> {
        [
            (self.alternate_screen, Mode::AlternateScreen),
            (self.mouse_capture, Mode::MouseCapture),
            (self.bracketed_paste, Mode::BracketedPaste),
            (self.focus_events, Mode::FocusEvents),
        ]
        .into_iter()
        .filter_map(|(on, mode)| on.then_some(mode))
        .collect()
    }
}

/// A terminal mode the session switches on and must switch off again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    AlternateScreen,
    MouseCapture,
    BracketedPaste,
    FocusEvents,
}

/// Every mode, in the order it is undone by the panic hook.
const ALL_MODES_REVERSED: [Mode; 4] = [
    Mode::FocusEvents,
    Mode::BracketedPaste,
    Mode::MouseCapture,
    Mode::AlternateScreen,
];

impl Mode {
    fn enable(self, out: &mut impl Write) -> io::Result<()> {
        match self {
            Self::AlternateScreen => {
                crossterm::execute!(out, crossterm::terminal::EnterAlternateScreen)
            }
            Self::MouseCapture => crossterm::execute!(out, crossterm::event::EnableMouseCapture),
            Self::BracketedPaste => {
                crossterm::execute!(out, crossterm::event::EnableBracketedPaste)
            }
            Self::FocusEvents => crossterm::execute!(out, crossterm::event::EnableFocusChange),
        }
    }

    fn disable(self, out: &mut impl Write) -> io::Result<()> {
        match self {
            Self::AlternateScreen => {
                crossterm::execute!(out, crossterm::terminal::LeaveAlternateScreen)
            }
            Self::MouseCapture => crossterm::execute!(out, crossterm::event::DisableMouseCapture),
            Self::BracketedPaste => {
                crossterm::execute!(out, crossterm::event::DisableBracketedPaste)
            }
            Self::FocusEvents => crossterm::execute!(out, crossterm::event::DisableFocusChange),
        }
    }
}

/// Raw-mode terminal session. Restores the terminal when dropped.
#[derive(Debug)]
pub struct TerminalSession {
    options: SessionOptions,
    /// Modes switched on so far, oldest first.
    enabled: Vec<Mode>,
}

impl TerminalSession {
    /// Enter raw mode and enable the requested modes.
    ///
    /// # Errors
    ///
    /// Fails if the terminal rejects raw mode or any mode. Modes enabled
    /// before the failure are undone when the partial session drops.
    pub fn new(options: SessionOptions) -> io::Result<Self> {
        install_panic_hook();

        crossterm::terminal::enable_raw_mode()?;
        let mut session = Self {
            options: options.clone(),
            enabled: Vec::new(),
        };

        let mut stdout = io::stdout();
        for mode in options.modes() {
            mode.enable(&mut stdout)?;
            session.enabled.push(mode);
        }
        crossterm::execute!(stdout, crossterm::cursor::Hide)?;

        #[cfg(feature = "tracing")]
        tracing::info!(?options, "terminal session started");

        Ok(session)
    }

    /// Current terminal size as (columns, rows).
    pub fn size(&self) -> io::Result<(u16, u16)> {
        crossterm::terminal::size()
    }

    /// Wait up to `timeout` for input. `Ok(false)` on timeout.
    pub fn poll_event(&self, timeout: Duration) -> io::Result<bool> {
        crossterm::event::poll(timeout)
    }

    /// Read one event, blocking.
    ///
    /// Returns `Ok(None)` for events with no canonical representation.
    pub fn read_event(&self) -> io::Result<Option<Event>> {
        crossterm::event::read().map(Event::from_crossterm)
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    fn restore(&mut self) {
        let mut stdout = io::stdout();
        while let Some(mode) = self.enabled.pop() {
            let _ = mode.disable(&mut stdout);
        }
        let _ = crossterm::execute!(stdout, crossterm::cursor::Show);
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = stdout.flush();

        #[cfg(feature = "tracing")]
        tracing::info!("terminal session restored");
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        self.restore();
    }
}

/// Chain a hook that puts the terminal back before the panic message prints.
fn install_panic_hook() {
    static HOOK: OnceLock<()> = OnceLock::new();
    HOOK.get_or_init(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let mut stdout = io::stdout();
            for mode in ALL_MODES_REVERSED {
                let _ = mode.disable(&mut stdout);
            }
            let _ = crossterm::execute!(stdout, crossterm::cursor::Show);
            let _ = crossterm::terminal::disable_raw_mode();
            let _ = stdout.flush();
            previous(info);
        }));
    });
}
