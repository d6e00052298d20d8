#![forbid(unsafe_code)]

//! Presenter: diffs frames and writes ANSI output.
//!
//! The presenter keeps the previously presented buffer and emits only the
//! cells that changed. A size change (or the first frame) clears the screen
//! and redraws everything.
//!
//! Style state is tracked so consecutive cells with the same style share a
//! single SGR sequence, and the cursor is only moved when a run of changed
//! cells is interrupted.

use std::io::{self, BufWriter, Write};

use crate::ansi;
use crate::buffer::Buffer;
use crate::cell::{Cell, CellContent, PackedRgba, StyleFlags};
use crate::frame::Frame;
use unicode_width::UnicodeWidthChar;

const BUFFER_CAPACITY: usize = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CellStyle {
    fg: PackedRgba,
    bg: PackedRgba,
    attrs: StyleFlags,
}

impl CellStyle {
    fn of(cell: &Cell) -> Self {
        Self {
            fg: cell.fg,
            bg: cell.bg,
            attrs: cell.attrs,
        }
    }
}

/// State-tracked ANSI presenter over any writer.
pub struct Presenter<W: Write> {
    writer: BufWriter<W>,
    previous: Option<Buffer>,
    current_style: Option<CellStyle>,
    cursor: Option<(u16, u16)>,
}

impl<W: Write> Presenter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::with_capacity(BUFFER_CAPACITY, writer),
            previous: None,
            current_style: None,
            cursor: None,
        }
    }

    /// Present a frame, writing only what changed since the last call.
    ///
    /// Returns the number of cells written.
    pub fn present(&mut self, frame: &Frame) -> io::Result<usize> {
        let buffer = &frame.buffer;
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "present",
            width = buffer.width(),
            height = buffer.height()
        )
        .entered();

        ansi::cursor_hide(&mut self.writer)?;

        let full_redraw = self
            .previous
            .as_ref()
            .is_none_or(|prev| prev.width() != buffer.width() || prev.height() != buffer.height());
        if full_redraw {
            ansi::sgr_reset(&mut self.writer)?;
            ansi::erase_display(&mut self.writer)?;
            self.current_style = None;
            self.cursor = None;
        }

        let mut written = 0;
        for y in 0..buffer.height() {
            for x in 0..buffer.width() {
                let Some(cell) = buffer.get(x, y) else {
                    continue;
                };
                if cell.content.is_continuation() {
                    continue;
                }
                let unchanged = !full_redraw
                    && self
                        .previous
                        .as_ref()
                        .and_then(|prev| prev.get(x, y))
                        .is_some_and(|prev| prev == cell);
                if unchanged {
                    continue;
                }
                self.emit_cell(x, y, cell)?;
                written += 1;
            }
        }

        ansi::sgr_reset(&mut self.writer)?;
        self.current_style = None;

        if let Some((cx, cy)) = frame.cursor_position {
            ansi::cup(&mut self.writer, cx, cy)?;
            self.cursor = Some((cx, cy));
            ansi::cursor_show(&mut self.writer)?;
        }

        self.previous = Some(buffer.clone());
        #[cfg(feature = "tracing")]
        tracing::trace!(cells = written, full_redraw, "frame presented");
        self.writer.flush()?;
        Ok(written)
    }

    fn emit_cell(&mut self, x: u16, y: u16, cell: &Cell) -> io::Result<()> {
        if self.cursor != Some((x, y)) {
            ansi::cup(&mut self.writer, x, y)?;
        }

        let style = CellStyle::of(cell);
        if self.current_style != Some(style) {
            ansi::sgr_reset(&mut self.writer)?;
            ansi::sgr_flags(&mut self.writer, style.attrs)?;
            ansi::sgr_fg(&mut self.writer, style.fg)?;
            ansi::sgr_bg(&mut self.writer, style.bg)?;
            self.current_style = Some(style);
        }

        let (ch, advance) = match cell.content {
            CellContent::Char(c) => (c, c.width().unwrap_or(0).max(1) as u16),
            _ => (' ', 1),
        };
        let mut utf8 = [0u8; 4];
        self.writer.write_all(ch.encode_utf8(&mut utf8).as_bytes())?;
        self.cursor = Some((x.saturating_add(advance), y));
        Ok(())
    }

    /// Forget the previous frame so the next present redraws everything.
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    /// Reset attributes and show the cursor, for shutdown.
    pub fn restore(&mut self) -> io::Result<()> {
        ansi::sgr_reset(&mut self.writer)?;
        ansi::cursor_show(&mut self.writer)?;
        self.writer.flush()
    }

    /// Recover the writer, flushing pending output.
    pub fn into_inner(self) -> Result<W, io::Error> {
        self.writer.into_inner().map_err(|e| e.into_error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(presenter: Presenter<Vec<u8>>) -> String {
        String::from_utf8(presenter.into_inner().expect("flush")).expect("utf8")
    }

    #[test]
    fn first_frame_clears_and_writes_every_cell() {
        let mut presenter = Presenter::new(Vec::new());
        let mut frame = Frame::new(3, 1);
        frame.buffer.set(0, 0, Cell::from_char('a'));
        let written = presenter.present(&frame).expect("present");
        assert_eq!(written, 3);
        let out = output(presenter);
        assert!(out.contains("\x1b[2J"));
        assert!(out.contains('a'));
    }

    #[test]
    fn second_frame_writes_only_changes() {
        let mut presenter = Presenter::new(Vec::new());
        let mut frame = Frame::new(4, 2);
        frame.buffer.set(0, 0, Cell::from_char('a'));
        presenter.present(&frame).expect("present");

        frame.buffer.set(2, 1, Cell::from_char('b'));
        let written = presenter.present(&frame).expect("present");
        assert_eq!(written, 1);
        let out = output(presenter);
        assert!(out.ends_with("b\x1b[0m") || out.contains("\x1b[2;3H"));
    }

    #[test]
    fn resize_forces_full_redraw() {
        let mut presenter = Presenter::new(Vec::new());
        presenter.present(&Frame::new(2, 1)).expect("present");
        let written = presenter.present(&Frame::new(3, 1)).expect("present");
        assert_eq!(written, 3);
    }

    #[test]
    fn cursor_is_placed_when_requested() {
        let mut presenter = Presenter::new(Vec::new());
        let mut frame = Frame::new(5, 1);
        frame.set_cursor(Some((2, 0)));
        presenter.present(&frame).expect("present");
        let out = output(presenter);
        assert!(out.ends_with("\x1b[1;3H\x1b[?25h"));
    }

    #[test]
    fn wide_char_skips_continuation() {
        let mut presenter = Presenter::new(Vec::new());
        let mut frame = Frame::new(2, 1);
        frame.buffer.set(0, 0, Cell::from_char('円'));
        let written = presenter.present(&frame).expect("present");
        assert_eq!(written, 1);
    }
}
