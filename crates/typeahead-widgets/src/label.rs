#![forbid(unsafe_code)]

//! Single-line styled text.

use typeahead_core::geometry::Rect;
use typeahead_render::frame::Frame;

use crate::{Style, Widget, draw_text_span, set_style_area};

/// A widget that renders one line of text, clipped to its area.
#[derive(Debug, Clone, Default)]
pub struct Label<'a> {
    text: &'a str,
    style: Style,
}

impl<'a> Label<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            style: Style::default(),
        }
    }

    #[must_use]
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

impl Widget for Label<'_> {
    fn render(&self, area: Rect, frame: &mut Frame) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "widget_render",
            widget = "Label",
            x = area.x,
            y = area.y,
            w = area.width,
            h = area.height
        )
        .entered();

        if area.is_empty() {
            return;
        }
        let row = Rect::new(area.x, area.y, area.width, 1);
        set_style_area(frame, row, self.style);
        draw_text_span(frame, row.x, row.y, self.text, self.style, row.right());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use typeahead_render::cell::StyleFlags;

    #[test]
    fn renders_first_row_only() {
        let mut frame = Frame::new(12, 2);
        Label::new("Sync Search").render(Rect::new(1, 0, 11, 2), &mut frame);
        assert_eq!(frame.buffer.row_text(0), " Sync Search");
        assert_eq!(frame.buffer.row_text(1), "");
    }

    #[test]
    fn clips_and_styles() {
        let mut frame = Frame::new(4, 1);
        Label::new("Async")
            .style(Style::new().dim())
            .render(Rect::new(0, 0, 4, 1), &mut frame);
        assert_eq!(frame.buffer.row_text(0), "Asyn");
        let attrs = frame.buffer.get(0, 0).map(|c| c.attrs).unwrap_or_default();
        assert!(attrs.contains(StyleFlags::DIM));
    }
}
