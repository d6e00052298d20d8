#![forbid(unsafe_code)]

//! Popup lifecycle: when the result list is shown.
//!
//! | Trigger | Sync | Async |
//! |---------|------|-------|
//! | query changed | open | unchanged |
//! | latest lookup resolved | n/a | open |
//! | focus gained (`open_on_focus`) | open | unchanged |
//! | Down with results | open | open |
//! | Escape, pointer outside, focus lost | close | close |

use tracing::trace;

/// Why the popup was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissReason {
    Escape,
    PointerOutside,
    FocusLost,
}

/// Open/closed state of the result popup.
#[derive(Debug, Clone, Default)]
pub struct Popup {
    open: bool,
    async_mode: bool,
    open_on_focus: bool,
}

impl Popup {
    pub fn new(async_mode: bool, open_on_focus: bool) -> Self {
        Self {
            open: false,
            async_mode,
            open_on_focus,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// The query text changed. Opens in sync mode, even with no results.
    pub fn on_query_changed(&mut self) {
        if !self.async_mode {
            self.set_open(true, "query changed");
        }
    }

    /// The latest async lookup resolved successfully.
    pub fn on_lookup_resolved(&mut self) {
        self.set_open(true, "lookup resolved");
    }

    /// The input gained focus.
    pub fn on_focus(&mut self) {
        if self.open_on_focus && !self.async_mode {
            self.set_open(true, "focus");
        }
    }

    /// Explicit open request, e.g. Down while closed.
    pub fn open(&mut self) {
        self.set_open(true, "requested");
    }

    /// Close the popup. Returns `true` if it was open.
    pub fn dismiss(&mut self, reason: DismissReason) -> bool {
        let was_open = self.open;
        if was_open {
            trace!(?reason, "popup dismissed");
        }
        self.open = false;
        was_open
    }

    fn set_open(&mut self, open: bool, cause: &'static str) {
        if self.open != open {
            trace!(open, cause, "popup state changed");
        }
        self.open = open;
    }
}
