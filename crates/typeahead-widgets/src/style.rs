#![forbid(unsafe_code)]

//! Widget styles.
//!
//! A [`Style`] is a partial cell style: unset fields leave the cell as it
//! is, so styles layer (row background, then item text, then highlight).

use typeahead_render::cell::{PackedRgba, StyleFlags};

/// Partial cell style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    pub fg: Option<PackedRgba>,
    pub bg: Option<PackedRgba>,
    pub attrs: Option<StyleFlags>,
}

impl Style {
    #[inline]
    pub const fn new() -> Self {
        Self {
            fg: None,
            bg: None,
            attrs: None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn fg(mut self, color: PackedRgba) -> Self {
        self.fg = Some(color);
        self
    }

    #[inline]
    #[must_use]
    pub const fn bg(mut self, color: PackedRgba) -> Self {
        self.bg = Some(color);
        self
    }

    /// Add attribute flags.
    #[must_use]
    pub fn attrs(mut self, flags: StyleFlags) -> Self {
        self.attrs = Some(self.attrs.unwrap_or_default() | flags);
        self
    }

    #[must_use]
    pub fn bold(self) -> Self {
        self.attrs(StyleFlags::BOLD)
    }

    #[must_use]
    pub fn dim(self) -> Self {
        self.attrs(StyleFlags::DIM)
    }

    #[must_use]
    pub fn italic(self) -> Self {
        self.attrs(StyleFlags::ITALIC)
    }

    #[must_use]
    pub fn reverse(self) -> Self {
        self.attrs(StyleFlags::REVERSE)
    }

    /// Whether no field is set.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.fg.is_none() && self.bg.is_none() && self.attrs.is_none()
    }

    /// Layer `other` on top of `self`; set fields in `other` win and
    /// attributes accumulate.
    #[must_use]
    pub fn patch(self, other: Style) -> Self {
        Self {
            fg: other.fg.or(self.fg),
            bg: other.bg.or(self.bg),
            attrs: match (self.attrs, other.attrs) {
                (Some(a), Some(b)) => Some(a | b),
                (a, b) => b.or(a),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_empty() {
        assert!(Style::default().is_empty());
        assert!(!Style::new().bold().is_empty());
    }

    #[test]
    fn attrs_accumulate() {
        let style = Style::new().bold().reverse();
        assert_eq!(style.attrs, Some(StyleFlags::BOLD | StyleFlags::REVERSE));
    }

    #[test]
    fn patch_prefers_top_layer() {
        let base = Style::new()
            .fg(PackedRgba::rgb(1, 1, 1))
            .bg(PackedRgba::rgb(2, 2, 2))
            .dim();
        let top = Style::new().fg(PackedRgba::rgb(9, 9, 9)).bold();
        let merged = base.patch(top);
        assert_eq!(merged.fg, Some(PackedRgba::rgb(9, 9, 9)));
        assert_eq!(merged.bg, Some(PackedRgba::rgb(2, 2, 2)));
        assert_eq!(merged.attrs, Some(StyleFlags::DIM | StyleFlags::BOLD));
    }
}
