#![forbid(unsafe_code)]

//! Geometric primitives.

/// A rectangle in terminal coordinates (0-indexed, origin at top-left).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: u16,
    /// Top edge (inclusive).
    pub y: u16,
    /// Width in cells.
    pub width: u16,
    /// Height in cells.
    pub height: u16,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle from origin with given size.
    #[inline]
    pub const fn from_size(width: u16, height: u16) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub const fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Compute the intersection with another rectangle.
    ///
    /// Returns an empty rectangle if the rectangles don't overlap.
    pub fn intersection(&self, other: &Rect) -> Rect {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if x < right && y < bottom {
            Rect::new(x, y, right - x, bottom - y)
        } else {
            Rect::default()
        }
    }

    /// Shrink by a uniform margin on every side.
    pub fn inner(&self, margin: u16) -> Rect {
        let double = margin.saturating_mul(2);
        Rect {
            x: self.x.saturating_add(margin),
            y: self.y.saturating_add(margin),
            width: self.width.saturating_sub(double),
            height: self.height.saturating_sub(double),
        }
    }

    /// The single row at `offset` from the top, or `None` past the bottom.
    pub fn row(&self, offset: u16) -> Option<Rect> {
        if offset >= self.height {
            return None;
        }
        Some(Rect::new(self.x, self.y + offset, self.width, 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn contains_is_half_open() {
        let r = Rect::new(2, 3, 4, 2);
        assert!(r.contains(2, 3));
        assert!(r.contains(5, 4));
        assert!(!r.contains(6, 4));
        assert!(!r.contains(5, 5));
    }

    #[test]
    fn empty_when_zero_sized() {
        assert!(Rect::new(0, 0, 0, 5).is_empty());
        assert!(Rect::new(0, 0, 5, 0).is_empty());
        assert!(!Rect::from_size(1, 1).is_empty());
    }

    #[test]
    fn disjoint_intersection_is_empty() {
        let a = Rect::new(0, 0, 2, 2);
        let b = Rect::new(5, 5, 2, 2);
        assert!(a.intersection(&b).is_empty());
    }

    #[test]
    fn inner_saturates() {
        let r = Rect::new(0, 0, 3, 1);
        let inner = r.inner(1);
        assert_eq!(inner, Rect::new(1, 1, 1, 0));
    }

    #[test]
    fn row_stays_inside() {
        let r = Rect::new(4, 10, 8, 3);
        assert_eq!(r.row(0), Some(Rect::new(4, 10, 8, 1)));
        assert_eq!(r.row(2), Some(Rect::new(4, 12, 8, 1)));
        assert_eq!(r.row(3), None);
    }

    proptest! {
        #[test]
        fn intersection_is_contained_in_both(
            ax in 0u16..50, ay in 0u16..50, aw in 0u16..50, ah in 0u16..50,
            bx in 0u16..50, by in 0u16..50, bw in 0u16..50, bh in 0u16..50,
        ) {
            let a = Rect::new(ax, ay, aw, ah);
            let b = Rect::new(bx, by, bw, bh);
            let i = a.intersection(&b);
            if !i.is_empty() {
                prop_assert!(a.contains(i.x, i.y) && b.contains(i.x, i.y));
                prop_assert!(i.right() <= a.right() && i.right() <= b.right());
                prop_assert!(i.bottom() <= a.bottom() && i.bottom() <= b.bottom());
            }
        }
    }
}
