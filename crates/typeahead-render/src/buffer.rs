#![forbid(unsafe_code)]

//! Buffer grid storage.
//!
//! The `Buffer` is a 2D grid of [`Cell`]s in row-major order
//! (`index = y * width + x`).
//!
//! # Invariants
//!
//! 1. `cells.len() == width * height`
//! 2. Width and height never change after creation
//! 3. A wide character's head is always followed by a continuation cell,
//!    unless it would cross the right edge, in which case it is not written

use crate::cell::{Cell, CellContent};
use typeahead_core::geometry::Rect;
use unicode_width::UnicodeWidthChar;

/// A 2D grid of terminal cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Buffer {
    /// Create a new buffer filled with empty cells.
    ///
    /// Zero dimensions are bumped to 1 so the grid is never empty.
    pub fn new(width: u16, height: u16) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            cells: vec![Cell::default(); width as usize * height as usize],
        }
    }

    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Bounding rect of the entire buffer.
    #[inline]
    pub const fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Get a reference to the cell at (x, y).
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Get a mutable reference to the cell at (x, y).
    #[inline]
    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        self.index(x, y).map(|i| &mut self.cells[i])
    }

    /// Write a cell, handling wide characters.
    ///
    /// Out-of-bounds writes are ignored. A wide character that does not fit
    /// before the right edge is dropped.
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        let width = match cell.content {
            CellContent::Char(c) => c.width().unwrap_or(0).max(1),
            _ => 1,
        };
        if width == 2 && x.saturating_add(1) >= self.width {
            return;
        }
        let Some(idx) = self.index(x, y) else {
            return;
        };
        self.cells[idx] = cell;
        if width == 2 {
            self.cells[idx + 1] = Cell::continuation_of(&cell);
        }
    }

    /// Fill a rectangle (clipped to the buffer) with `cell`.
    pub fn fill(&mut self, rect: Rect, cell: Cell) {
        let clipped = rect.intersection(&self.bounds());
        for y in clipped.y..clipped.bottom() {
            for x in clipped.x..clipped.right() {
                if let Some(idx) = self.index(x, y) {
                    self.cells[idx] = cell;
                }
            }
        }
    }

    /// Reset every cell to empty.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    /// Raw cell slice in row-major order.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// The text of row `y`, with empty cells as spaces and continuation
    /// cells skipped. Trailing spaces are trimmed.
    pub fn row_text(&self, y: u16) -> String {
        if y >= self.height {
            return String::new();
        }
        let start = y as usize * self.width as usize;
        let row = &self.cells[start..start + self.width as usize];
        let mut text: String = row
            .iter()
            .filter_map(|cell| match cell.content {
                CellContent::Empty => Some(' '),
                CellContent::Char(c) => Some(c),
                CellContent::Continuation => None,
            })
            .collect();
        let trimmed = text.trim_end().len();
        text.truncate(trimmed);
        text
    }

    /// All rows joined by newlines, for snapshot-style assertions.
    pub fn to_text(&self) -> String {
        (0..self.height)
            .map(|y| self.row_text(y))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
