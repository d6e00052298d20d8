#![forbid(unsafe_code)]

//! Active-item navigation.
//!
//! [`ListNavigation`] turns a key into a new active index.
//! [`NavigationController`] owns the active index and the scroll offset of
//! the visible window, and re-clamps both whenever the result list changes.
//!
//! # Invariants
//!
//! 1. `active` is `None` or `< len` of the current result list.
//! 2. When `active` is `Some`, it lies inside the visible window.

use typeahead_core::event::KeyCode;

/// A list navigation key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
}

impl NavKey {
    pub fn from_key_code(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Up => Some(Self::Up),
            KeyCode::Down => Some(Self::Down),
            KeyCode::Home => Some(Self::Home),
            KeyCode::End => Some(Self::End),
            KeyCode::PageUp => Some(Self::PageUp),
            KeyCode::PageDown => Some(Self::PageDown),
            _ => None,
        }
    }
}

/// Key-to-index rules for a list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListNavigation {
    /// Wrap from the last item to the first (and back).
    pub loop_focus: bool,
}

impl ListNavigation {
    pub fn new(loop_focus: bool) -> Self {
        Self { loop_focus }
    }

    /// The index `key` moves to from `current` in a list of `len` items,
    /// with `page` items visible at once.
    ///
    /// Down with nothing active goes to the first item, Up to the last.
    pub fn navigate(
        &self,
        current: Option<usize>,
        len: usize,
        page: usize,
        key: NavKey,
    ) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let last = len - 1;
        let page = page.max(1);
        let next = match (key, current.map(|i| i.min(last))) {
            (NavKey::Home, _) => 0,
            (NavKey::End, _) => last,
            (NavKey::Down, None) | (NavKey::PageDown, None) => 0,
            (NavKey::Up, None) | (NavKey::PageUp, None) => last,
            (NavKey::Down, Some(i)) if i == last => {
                if self.loop_focus {
                    0
                } else {
                    last
                }
            }
            (NavKey::Down, Some(i)) => i + 1,
            (NavKey::Up, Some(0)) => {
                if self.loop_focus {
                    last
                } else {
                    0
                }
            }
            (NavKey::Up, Some(i)) => i - 1,
            (NavKey::PageDown, Some(i)) => (i + page).min(last),
            (NavKey::PageUp, Some(i)) => i.saturating_sub(page),
        };
        Some(next)
    }
}

/// Clamp an active index to a list of `len` items.
///
/// Absent stays absent, past the end moves to the last item, and an empty
/// list clears it.
pub fn clamp_active(active: Option<usize>, len: usize) -> Option<usize> {
    match active {
        _ if len == 0 => None,
        Some(i) => Some(i.min(len - 1)),
        None => None,
    }
}

/// Owner of the active index and the visible window.
#[derive(Debug, Clone, Default)]
pub struct NavigationController {
    active: Option<usize>,
    scroll_offset: usize,
    nav: ListNavigation,
}

impl NavigationController {
    pub fn new(nav: ListNavigation) -> Self {
        Self {
            active: None,
            scroll_offset: 0,
            nav,
        }
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// First visible row of the result list.
    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Re-clamp after the result list changed to `len` items.
    pub fn on_results_changed(&mut self, len: usize, page: usize) {
        self.active = clamp_active(self.active, len);
        let max_offset = len.saturating_sub(page.max(1));
        self.scroll_offset = self.scroll_offset.min(max_offset);
        self.reveal(page);
    }

    /// Set the active index. Out-of-range requests are ignored.
    ///
    /// Returns `true` if the index changed.
    pub fn set_active(&mut self, index: Option<usize>, len: usize, page: usize) -> bool {
        if index.is_some_and(|i| i >= len) {
            return false;
        }
        let changed = self.active != index;
        self.active = index;
        self.reveal(page);
        changed
    }

    /// The index a navigation key would move to.
    pub fn target(&self, key: NavKey, len: usize, page: usize) -> Option<usize> {
        self.nav.navigate(self.active, len, page, key)
    }

    /// Scroll so the active row is inside a window of `page` rows.
    fn reveal(&mut self, page: usize) {
        let page = page.max(1);
        if let Some(active) = self.active {
            if active < self.scroll_offset {
                self.scroll_offset = active;
            } else if active >= self.scroll_offset + page {
                self.scroll_offset = active + 1 - page;
            }
        }
    }
}

/// First visible row for a window of `page` rows over `len` items, keeping
/// `active` in view. Used by rendering when the window size differs from
/// the one the controller last saw.
pub fn visible_offset(offset: usize, active: Option<usize>, len: usize, page: usize) -> usize {
    let page = page.max(1);
    let mut offset = offset.min(len.saturating_sub(page));
    if let Some(active) = active {
        if active < offset {
            offset = active;
        } else if active >= offset + page {
            offset = active + 1 - page;
        }
    }
    offset
}
