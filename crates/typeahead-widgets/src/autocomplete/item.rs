#![forbid(unsafe_code)]

//! Result row rendering.
//!
//! ```text
//! > [x] Banana
//!   [ ] Bandana
//! ```
//!
//! Column 0 holds the active marker, columns 2..5 the checkbox, and the
//! value starts at column 6.

use typeahead_core::geometry::Rect;
use typeahead_render::frame::Frame;

use super::Intent;
use crate::{Style, Widget, draw_text_span, set_style_area};

const MARKER: &str = ">";
const CHECKED: &str = "[x]";
const UNCHECKED: &str = "[ ]";
const CHECKBOX_X: u16 = 2;
const CHECKBOX_WIDTH: u16 = 3;
const VALUE_X: u16 = 6;

/// Stable option id for result row `index` of widget `widget_id`.
pub fn option_id(widget_id: &str, index: usize) -> String {
    format!("{widget_id}-option-{index}")
}

/// Styles for result rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ItemStyle {
    pub normal: Style,
    pub active: Style,
    pub checked: Style,
}

impl ItemStyle {
    /// Reverse-video active row and bold checked values.
    pub fn highlighted() -> Self {
        Self {
            normal: Style::new(),
            active: Style::new().reverse(),
            checked: Style::new().bold(),
        }
    }
}

/// One checkable result row. Holds no state of its own.
#[derive(Debug, Clone, Copy)]
pub struct ResultItem<'a> {
    value: &'a str,
    active: bool,
    checked: bool,
    style: ItemStyle,
}

impl<'a> ResultItem<'a> {
    pub fn new(value: &'a str) -> Self {
        Self {
            value,
            active: false,
            checked: false,
            style: ItemStyle::default(),
        }
    }

    #[must_use]
    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    #[must_use]
    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    #[must_use]
    pub fn style(mut self, style: ItemStyle) -> Self {
        self.style = style;
        self
    }

    pub fn value(&self) -> &'a str {
        self.value
    }

    /// The intent raised when the checkbox is flipped.
    pub fn on_check_change(&self) -> Intent {
        Intent::SetChecked {
            value: self.value.to_owned(),
            checked: !self.checked,
        }
    }

    /// Cells covered by the checkbox when the row is drawn in `area`.
    pub fn checkbox_rect(area: Rect) -> Rect {
        let x = area.x.saturating_add(CHECKBOX_X);
        let width = CHECKBOX_WIDTH.min(area.right().saturating_sub(x));
        Rect::new(x, area.y, width, area.height.min(1))
    }
}

impl Widget for ResultItem<'_> {
    fn render(&self, area: Rect, frame: &mut Frame) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "widget_render",
            widget = "ResultItem",
            x = area.x,
            y = area.y,
            w = area.width,
            h = area.height
        )
        .entered();

        if area.is_empty() {
            return;
        }

        let mut row_style = self.style.normal;
        if self.active {
            row_style = row_style.patch(self.style.active);
        }
        let row = Rect::new(area.x, area.y, area.width, 1);
        set_style_area(frame, row, row_style);

        let max_x = area.right();
        if self.active {
            draw_text_span(frame, area.x, area.y, MARKER, row_style, max_x);
        }
        let checkbox = if self.checked { CHECKED } else { UNCHECKED };
        draw_text_span(
            frame,
            Self::checkbox_rect(area).x,
            area.y,
            checkbox,
            row_style,
            max_x,
        );

        let value_style = if self.checked {
            row_style.patch(self.style.checked)
        } else {
            row_style
        };
        draw_text_span(
            frame,
            area.x.saturating_add(VALUE_X),
            area.y,
            self.value,
            value_style,
            max_x,
        );
    }

    fn is_essential(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use typeahead_render::cell::StyleFlags;

    fn render(item: ResultItem<'_>, width: u16) -> Frame {
        let mut frame = Frame::new(width, 1);
        item.render(Rect::new(0, 0, width, 1), &mut frame);
        frame
    }

    #[test]
    fn unchecked_inactive_row() {
        let frame = render(ResultItem::new("Apple"), 20);
        assert_eq!(frame.buffer.row_text(0), "  [ ] Apple");
    }

    #[test]
    fn active_checked_row() {
        let frame = render(ResultItem::new("Banana").active(true).checked(true), 20);
        assert_eq!(frame.buffer.row_text(0), "> [x] Banana");
    }

    #[test]
    fn active_row_is_highlighted_to_the_edge() {
        let item = ResultItem::new("Cherry")
            .active(true)
            .style(ItemStyle::highlighted());
        let frame = render(item, 16);
        for x in 0..16 {
            let attrs = frame.buffer.get(x, 0).map(|c| c.attrs).unwrap_or_default();
            assert!(attrs.contains(StyleFlags::REVERSE), "column {x}");
        }
    }

    #[test]
    fn value_is_clipped() {
        let frame = render(ResultItem::new("Swiss franc"), 10);
        assert_eq!(frame.buffer.row_text(0), "  [ ] Swis");
    }

    #[test]
    fn check_change_flips() {
        assert_eq!(
            ResultItem::new("Euro").checked(true).on_check_change(),
            Intent::SetChecked {
                value: "Euro".into(),
                checked: false
            }
        );
    }

    #[test]
    fn checkbox_rect_is_clipped_to_row() {
        assert_eq!(
            ResultItem::checkbox_rect(Rect::new(3, 7, 20, 1)),
            Rect::new(5, 7, 3, 1)
        );
        assert_eq!(ResultItem::checkbox_rect(Rect::new(0, 0, 4, 1)).width, 2);
    }

    #[test]
    fn option_ids_are_stable() {
        assert_eq!(option_id("fruit", 0), "fruit-option-0");
        assert_eq!(option_id("fruit", 12), "fruit-option-12");
    }
}
