#![forbid(unsafe_code)]

//! Floating placement of the result popup.
//!
//! A [`Placement`] maps the input's rectangle (the anchor) and the viewport
//! to the popup's rectangle. [`BelowAnchor`] is the default: same width as
//! the anchor, directly below it, flipped above when there is more room
//! there.

use std::fmt;

use typeahead_core::geometry::Rect;

/// Which side of the anchor the popup sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Below,
    Above,
}

/// Where the popup goes and how tall it may grow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopupGeometry {
    /// Popup rectangle; height is the content height capped at `max_height`.
    pub area: Rect,
    /// Rows available on the chosen side.
    pub max_height: u16,
    pub side: Side,
}

/// Floating-position collaborator.
pub trait Placement: fmt::Debug + Send + Sync {
    fn place(&self, anchor: Rect, viewport: Rect, content_rows: u16) -> PopupGeometry;
}

/// Place the popup below the anchor, matching its width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BelowAnchor {
    /// Rows kept free between the popup and the viewport edge.
    pub padding: u16,
}

impl Default for BelowAnchor {
    fn default() -> Self {
        Self { padding: 1 }
    }
}

impl Placement for BelowAnchor {
    fn place(&self, anchor: Rect, viewport: Rect, content_rows: u16) -> PopupGeometry {
        let below = viewport
            .bottom()
            .saturating_sub(anchor.bottom())
            .saturating_sub(self.padding);
        let above = anchor
            .y
            .saturating_sub(viewport.y)
            .saturating_sub(self.padding);

        let side = if content_rows > below && above > below {
            Side::Above
        } else {
            Side::Below
        };
        let max_height = match side {
            Side::Below => below,
            Side::Above => above,
        };
        let height = content_rows.min(max_height);
        let y = match side {
            Side::Below => anchor.bottom(),
            Side::Above => anchor.y - height,
        };

        let x = anchor.x.max(viewport.x);
        let width = anchor.right().min(viewport.right()).saturating_sub(x);

        PopupGeometry {
            area: Rect::new(x, y, width, height),
            max_height,
            side,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Rect = Rect::new(0, 0, 40, 20);

    #[test]
    fn below_with_anchor_width() {
        let anchor = Rect::new(4, 2, 20, 1);
        let geometry = BelowAnchor::default().place(anchor, VIEWPORT, 5);
        assert_eq!(geometry.side, Side::Below);
        assert_eq!(geometry.area, Rect::new(4, 3, 20, 5));
        assert_eq!(geometry.max_height, 16);
    }

    #[test]
    fn height_capped_by_space_below() {
        let anchor = Rect::new(0, 10, 10, 1);
        let geometry = BelowAnchor { padding: 0 }.place(anchor, Rect::new(0, 0, 40, 14), 2);
        assert_eq!(geometry.area.height, 2);
        let tall = BelowAnchor { padding: 0 }.place(anchor, Rect::new(0, 0, 40, 14), 3);
        assert_eq!(tall.side, Side::Below);
        assert_eq!(tall.area.height, 3);
    }

    #[test]
    fn flips_above_when_more_room() {
        let anchor = Rect::new(0, 16, 10, 1);
        let geometry = BelowAnchor::default().place(anchor, VIEWPORT, 6);
        assert_eq!(geometry.side, Side::Above);
        assert_eq!(geometry.max_height, 15);
        assert_eq!(geometry.area, Rect::new(0, 10, 10, 6));
    }

    #[test]
    fn stays_below_when_content_fits() {
        let anchor = Rect::new(0, 16, 10, 1);
        let geometry = BelowAnchor::default().place(anchor, VIEWPORT, 2);
        assert_eq!(geometry.side, Side::Below);
        assert_eq!(geometry.area.y, 17);
    }

    #[test]
    fn width_clipped_to_viewport() {
        let anchor = Rect::new(30, 0, 20, 1);
        let geometry = BelowAnchor::default().place(anchor, VIEWPORT, 1);
        assert_eq!(geometry.area.width, 10);
    }

    #[test]
    fn no_room_anywhere_gives_empty_area() {
        let anchor = Rect::new(0, 0, 10, 1);
        let geometry = BelowAnchor::default().place(anchor, Rect::new(0, 0, 10, 1), 4);
        assert!(geometry.area.is_empty());
    }
}
