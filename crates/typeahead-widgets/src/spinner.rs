#![forbid(unsafe_code)]

//! Spinner widget.

use crate::{StatefulWidget, Style, Widget, set_style_area};
use typeahead_core::geometry::Rect;
use typeahead_render::display_width;
use typeahead_render::frame::Frame;

/// Braille dot spinner animation frames.
pub const DOTS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
/// ASCII line spinner animation frames.
pub const LINE: &[&str] = &["|", "/", "-", "\\"];

/// A widget to display a spinner.
#[derive(Debug, Clone)]
pub struct Spinner<'a> {
    style: Style,
    frames: &'a [&'a str],
    label: Option<&'a str>,
}

impl Default for Spinner<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Spinner<'a> {
    /// Create a new spinner with default dot frames.
    pub fn new() -> Self {
        Self {
            style: Style::default(),
            frames: DOTS,
            label: None,
        }
    }

    #[must_use]
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Set the animation frame strings.
    #[must_use]
    pub fn frames(mut self, frames: &'a [&'a str]) -> Self {
        self.frames = frames;
        self
    }

    /// Set a text label displayed after the spinner.
    #[must_use]
    pub fn label(mut self, label: &'a str) -> Self {
        self.label = Some(label);
        self
    }

    /// Columns needed to draw the spinner and its label.
    pub fn width(&self) -> u16 {
        let glyph = self.frames.iter().map(|f| display_width(f)).max().unwrap_or(0);
        let label = self.label.map_or(0, |l| display_width(l) + 1);
        (glyph + label) as u16
    }
}

/// Mutable state for a [`Spinner`] widget.
#[derive(Debug, Clone, Default)]
pub struct SpinnerState {
    /// Index of the currently displayed animation frame.
    pub current_frame: usize,
}

impl SpinnerState {
    /// Advance to the next animation frame.
    pub fn tick(&mut self) {
        self.current_frame = self.current_frame.wrapping_add(1);
    }
}

impl StatefulWidget for Spinner<'_> {
    type State = SpinnerState;

    fn render(&self, area: Rect, frame: &mut Frame, state: &mut Self::State) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "widget_render",
            widget = "Spinner",
            x = area.x,
            y = area.y,
            w = area.width,
            h = area.height
        )
        .entered();

        if area.is_empty() || self.frames.is_empty() {
            return;
        }

        set_style_area(frame, area, self.style);

        let glyph = self.frames[state.current_frame % self.frames.len()];
        let mut x = crate::draw_text_span(frame, area.x, area.y, glyph, self.style, area.right());

        if let Some(label) = self.label {
            x += 1;
            if x < area.right() {
                crate::draw_text_span(frame, x, area.y, label, self.style, area.right());
            }
        }
    }
}

impl Widget for Spinner<'_> {
    fn render(&self, area: Rect, frame: &mut Frame) {
        let mut state = SpinnerState::default();
        StatefulWidget::render(self, area, frame, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_tick_wraps_on_overflow() {
        let mut state = SpinnerState {
            current_frame: usize::MAX,
        };
        state.tick();
        assert_eq!(state.current_frame, 0);
    }

    #[test]
    fn default_uses_dots_frames() {
        assert_eq!(Spinner::new().frames, DOTS);
    }

    #[test]
    fn width_counts_label() {
        assert_eq!(Spinner::new().width(), 1);
        assert_eq!(Spinner::new().label("Loading").width(), 9);
    }

    #[test]
    fn renders_current_frame() {
        let mut frame = Frame::new(6, 1);
        let mut state = SpinnerState { current_frame: 2 };
        StatefulWidget::render(
            &Spinner::new().frames(LINE),
            Rect::new(0, 0, 6, 1),
            &mut frame,
            &mut state,
        );
        assert_eq!(frame.buffer.row_text(0), "-");
    }

    #[test]
    fn renders_label_after_glyph() {
        let mut frame = Frame::new(12, 1);
        Widget::render(
            &Spinner::new().frames(LINE).label("wait"),
            Rect::new(0, 0, 12, 1),
            &mut frame,
        );
        assert_eq!(frame.buffer.row_text(0), "| wait");
    }

    #[test]
    fn zero_area_is_noop() {
        let mut frame = Frame::new(4, 1);
        Widget::render(&Spinner::new(), Rect::new(0, 0, 0, 0), &mut frame);
        assert_eq!(frame.buffer.row_text(0), "");
    }
}
