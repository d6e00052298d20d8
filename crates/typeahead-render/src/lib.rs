#![forbid(unsafe_code)]

//! Render kernel: cells, buffers, frames, and ANSI presentation.

pub mod ansi;
pub mod buffer;
pub mod cell;
pub mod frame;
pub mod presenter;

pub use buffer::Buffer;
pub use cell::{Cell, CellContent, PackedRgba, StyleFlags};
pub use frame::Frame;
pub use presenter::Presenter;

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width of `text` in terminal cells, summed per grapheme cluster.
pub fn display_width(text: &str) -> usize {
    text.graphemes(true).map(UnicodeWidthStr::width).sum()
}

#[cfg(test)]
mod tests {
    use super::display_width;

    #[test]
    fn ascii_width_is_len() {
        assert_eq!(display_width("Banana"), 6);
    }

    #[test]
    fn wide_chars_count_double() {
        assert_eq!(display_width("円"), 2);
        assert_eq!(display_width("a円b"), 4);
    }

    #[test]
    fn combining_marks_are_zero_width() {
        assert_eq!(display_width("e\u{301}"), 1);
    }
}
