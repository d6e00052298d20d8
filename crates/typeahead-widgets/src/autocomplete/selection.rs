#![forbid(unsafe_code)]

//! Checked-item bookkeeping.
//!
//! In [`SelectionMode::Single`] every `set_checked` replaces the whole map,
//! so at most one entry is ever true. In [`SelectionMode::Multiple`] entries
//! are upserted independently.

use std::collections::BTreeMap;

/// Selection policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    #[default]
    Single,
    Multiple,
}

impl SelectionMode {
    pub fn from_multiple(multiple: bool) -> Self {
        if multiple {
            Self::Multiple
        } else {
            Self::Single
        }
    }
}

/// Map of candidate value to checked flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionStore {
    mode: SelectionMode,
    checked: BTreeMap<String, bool>,
}

impl SelectionStore {
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            checked: BTreeMap::new(),
        }
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Change the policy. Existing entries are kept; the new policy applies
    /// from the next `set_checked`.
    pub fn set_mode(&mut self, mode: SelectionMode) {
        self.mode = mode;
    }

    pub fn set_checked(&mut self, value: &str, checked: bool) {
        match self.mode {
            SelectionMode::Multiple => {
                self.checked.insert(value.to_owned(), checked);
            }
            SelectionMode::Single => {
                self.checked.clear();
                self.checked.insert(value.to_owned(), checked);
            }
        }
    }

    pub fn is_checked(&self, value: &str) -> bool {
        self.checked.get(value).copied().unwrap_or(false)
    }

    /// Flip `value` and return its new state.
    pub fn toggle(&mut self, value: &str) -> bool {
        let checked = !self.is_checked(value);
        self.set_checked(value, checked);
        checked
    }

    /// Checked values in key order.
    pub fn checked_values(&self) -> Vec<&str> {
        self.checked
            .iter()
            .filter(|(_, checked)| **checked)
            .map(|(value, _)| value.as_str())
            .collect()
    }

    /// Every recorded entry, including explicit `false` ones.
    pub fn entries(&self) -> impl Iterator<Item = (&str, bool)> {
        self.checked.iter().map(|(value, checked)| (value.as_str(), *checked))
    }

    pub fn clear(&mut self) {
        self.checked.clear();
    }
}
