#![forbid(unsafe_code)]

//! Widgets for typeahead terminal UIs.
//!
//! The centerpiece is [`autocomplete::AutoComplete`], a text field with a
//! filtered, keyboard-navigable popup of checkable results. The smaller
//! widgets ([`input::TextInput`], [`spinner::Spinner`], [`label::Label`])
//! are its building blocks and are usable on their own.

pub mod autocomplete;
pub mod input;
pub mod label;
pub mod spinner;
pub mod style;

pub use style::Style;

use typeahead_core::geometry::Rect;
use typeahead_render::cell::Cell;
use typeahead_render::frame::Frame;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// A `Widget` is a renderable component.
///
/// Widgets render themselves into a [`Frame`] within a given `Rect`.
pub trait Widget {
    /// Render the widget into the frame at the given area.
    fn render(&self, area: Rect, frame: &mut Frame);

    /// Whether this widget is essential content (inputs, primary lists) as
    /// opposed to decoration (spinners).
    fn is_essential(&self) -> bool {
        false
    }
}

/// A `StatefulWidget` renders based on mutable state.
pub trait StatefulWidget {
    type State;

    fn render(&self, area: Rect, frame: &mut Frame, state: &mut Self::State);
}

/// Apply the set parts of `style` to a cell.
pub(crate) fn apply_style(cell: &mut Cell, style: Style) {
    if let Some(fg) = style.fg {
        cell.fg = fg;
    }
    if let Some(bg) = style.bg {
        cell.bg = bg;
    }
    if let Some(attrs) = style.attrs {
        cell.attrs |= attrs;
    }
}

/// Apply a style to all cells in a rectangular area, keeping their content.
pub(crate) fn set_style_area(frame: &mut Frame, area: Rect, style: Style) {
    if style.is_empty() {
        return;
    }
    for y in area.y..area.bottom() {
        for x in area.x..area.right() {
            if let Some(cell) = frame.buffer.get_mut(x, y) {
                apply_style(cell, style);
            }
        }
    }
}

/// Draw a text span at the given position.
///
/// Returns the x position after the last drawn character.
/// Stops at `max_x` (exclusive).
pub(crate) fn draw_text_span(
    frame: &mut Frame,
    mut x: u16,
    y: u16,
    content: &str,
    style: Style,
    max_x: u16,
) -> u16 {
    for grapheme in content.graphemes(true) {
        if x >= max_x {
            break;
        }
        let w = UnicodeWidthStr::width(grapheme);
        if w == 0 {
            continue;
        }
        if x + w as u16 > max_x {
            break;
        }
        if let Some(c) = grapheme.chars().next() {
            let mut cell = Cell::from_char(c);
            apply_style(&mut cell, style);
            frame.buffer.set(x, y, cell);
        }
        x = x.saturating_add(w as u16);
    }
    x
}
