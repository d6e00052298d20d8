#![forbid(unsafe_code)]

//! Frame: the render target handed to `Model::view()`.
//!
//! A frame owns the cell [`Buffer`] for one render pass plus the cursor
//! request the presenter applies after the cells are written.

use crate::buffer::Buffer;
use typeahead_core::geometry::Rect;

/// Render target for a single pass.
#[derive(Debug, Clone)]
pub struct Frame {
    /// The cell grid for this render pass.
    pub buffer: Buffer,

    /// Cursor position requested by a widget, relative to the buffer.
    pub cursor_position: Option<(u16, u16)>,
}

impl Frame {
    /// Create a blank frame.
    ///
    /// The cursor stays hidden until a widget calls [`Frame::set_cursor`].
    pub fn new(width: u16, height: u16) -> Self {
        Self::from_buffer(Buffer::new(width, height))
    }

    /// Create a frame around an existing buffer.
    pub fn from_buffer(buffer: Buffer) -> Self {
        Self {
            buffer,
            cursor_position: None,
        }
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.buffer.width()
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.buffer.height()
    }

    /// Reset cells and cursor for the next pass.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor_position = None;
    }

    /// Request the hardware cursor at `position`, or hide it with `None`.
    #[inline]
    pub fn set_cursor(&mut self, position: Option<(u16, u16)>) {
        self.cursor_position = position;
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        self.buffer.bounds()
    }
}
