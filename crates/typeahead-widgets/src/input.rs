#![forbid(unsafe_code)]

//! Text input widget.
//!
//! A single-line text field with a grapheme-aware cursor, horizontal
//! scrolling, and a placeholder shown while empty.

use typeahead_core::event::{Event, KeyCode, KeyEvent};
use typeahead_core::geometry::Rect;
use typeahead_render::cell::{Cell, StyleFlags};
use typeahead_render::frame::Frame;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::{Style, Widget};

/// What a handled event changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputChange {
    /// The event was not for the input.
    Ignored,
    /// Only the cursor moved.
    Cursor,
    /// The text value changed.
    Value,
}

/// A single-line text input widget.
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    value: String,
    /// Cursor position (grapheme index).
    cursor: usize,
    placeholder: String,
    style: Style,
    placeholder_style: Style,
    /// Whether the input is focused (controls cursor output).
    focused: bool,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self.cursor = self.grapheme_count();
        self
    }

    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn with_placeholder_style(mut self, style: Style) -> Self {
        self.placeholder_style = style;
        self
    }

    #[must_use]
    pub fn with_focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Replace the value, clamping the cursor.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.cursor.min(self.grapheme_count());
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Cursor position in graphemes.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// Screen position of the cursor inside `area`.
    pub fn cursor_position(&self, area: Rect) -> (u16, u16) {
        let rel_x = self
            .cursor_visual_pos()
            .saturating_sub(self.scroll_for(area.width as usize));
        let x = area
            .x
            .saturating_add(rel_x as u16)
            .min(area.right().saturating_sub(1));
        (x, area.y)
    }

    /// Handle a terminal event.
    pub fn handle_event(&mut self, event: &Event) -> InputChange {
        match event {
            Event::Key(key) if key.is_press() => self.handle_key(key),
            Event::Paste(paste) => {
                let line: String = paste.text.chars().filter(|c| !c.is_control()).collect();
                if line.is_empty() {
                    InputChange::Ignored
                } else {
                    self.insert_str(&line);
                    InputChange::Value
                }
            }
            _ => InputChange::Ignored,
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> InputChange {
        let ctrl = key.ctrl();
        let before = self.value.len();
        let changed = |input: &Self| {
            if input.value.len() != before {
                InputChange::Value
            } else {
                InputChange::Cursor
            }
        };

        match key.code {
            KeyCode::Char('u') if ctrl => {
                if self.value.is_empty() {
                    return InputChange::Ignored;
                }
                self.clear();
                InputChange::Value
            }
            KeyCode::Char('w') if ctrl => {
                self.delete_word_back();
                changed(self)
            }
            KeyCode::Char(c) if !ctrl => {
                self.insert_char(c);
                InputChange::Value
            }
            KeyCode::Backspace => {
                if ctrl {
                    self.delete_word_back();
                } else {
                    self.delete_char_back();
                }
                changed(self)
            }
            KeyCode::Delete => {
                self.delete_char_forward();
                changed(self)
            }
            KeyCode::Left => {
                if ctrl {
                    self.cursor = self.word_boundary_left();
                } else {
                    self.cursor = self.cursor.saturating_sub(1);
                }
                InputChange::Cursor
            }
            KeyCode::Right => {
                if ctrl {
                    self.cursor = self.word_boundary_right();
                } else {
                    self.cursor = (self.cursor + 1).min(self.grapheme_count());
                }
                InputChange::Cursor
            }
            KeyCode::Home => {
                self.cursor = 0;
                InputChange::Cursor
            }
            KeyCode::End => {
                self.cursor = self.grapheme_count();
                InputChange::Cursor
            }
            _ => InputChange::Ignored,
        }
    }

    // --- Editing operations ---

    fn insert_char(&mut self, c: char) {
        let mut buf = [0u8; 4];
        self.insert_str(c.encode_utf8(&mut buf));
    }

    /// Insert at the cursor and advance it by the change in grapheme count,
    /// so combining marks join the grapheme before the cursor.
    fn insert_str(&mut self, text: &str) {
        let before = self.grapheme_count();
        let byte_offset = self.grapheme_byte_offset(self.cursor);
        self.value.insert_str(byte_offset, text);
        let added = self.grapheme_count().saturating_sub(before);
        self.cursor = (self.cursor + added).min(self.grapheme_count());
    }

    fn delete_char_back(&mut self) {
        if self.cursor > 0 {
            let byte_start = self.grapheme_byte_offset(self.cursor - 1);
            let byte_end = self.grapheme_byte_offset(self.cursor);
            self.value.drain(byte_start..byte_end);
            self.cursor -= 1;
        }
    }

    fn delete_char_forward(&mut self) {
        if self.cursor < self.grapheme_count() {
            let byte_start = self.grapheme_byte_offset(self.cursor);
            let byte_end = self.grapheme_byte_offset(self.cursor + 1);
            self.value.drain(byte_start..byte_end);
        }
    }

    fn delete_word_back(&mut self) {
        let start = self.word_boundary_left();
        if start < self.cursor {
            let byte_start = self.grapheme_byte_offset(start);
            let byte_end = self.grapheme_byte_offset(self.cursor);
            self.value.drain(byte_start..byte_end);
            self.cursor = start;
        }
    }

    fn word_boundary_left(&self) -> usize {
        let graphemes: Vec<&str> = self.value.graphemes(true).collect();
        let mut pos = self.cursor.min(graphemes.len());
        while pos > 0 && is_space(graphemes[pos - 1]) {
            pos -= 1;
        }
        while pos > 0 && !is_space(graphemes[pos - 1]) {
            pos -= 1;
        }
        pos
    }

    fn word_boundary_right(&self) -> usize {
        let graphemes: Vec<&str> = self.value.graphemes(true).collect();
        let mut pos = self.cursor;
        while pos < graphemes.len() && is_space(graphemes[pos]) {
            pos += 1;
        }
        while pos < graphemes.len() && !is_space(graphemes[pos]) {
            pos += 1;
        }
        pos
    }

    // --- Internal helpers ---

    fn grapheme_count(&self) -> usize {
        self.value.graphemes(true).count()
    }

    fn grapheme_byte_offset(&self, grapheme_idx: usize) -> usize {
        self.value
            .grapheme_indices(true)
            .nth(grapheme_idx)
            .map_or(self.value.len(), |(i, _)| i)
    }

    fn cursor_visual_pos(&self) -> usize {
        self.value
            .graphemes(true)
            .take(self.cursor)
            .map(UnicodeWidthStr::width)
            .sum()
    }

    /// Leftmost visible column so the cursor stays in view.
    fn scroll_for(&self, viewport_width: usize) -> usize {
        let cursor_visual = self.cursor_visual_pos();
        if viewport_width == 0 || cursor_visual < viewport_width {
            0
        } else {
            cursor_visual + 1 - viewport_width
        }
    }
}

fn is_space(g: &str) -> bool {
    g.chars().all(char::is_whitespace)
}

impl Widget for TextInput {
    fn render(&self, area: Rect, frame: &mut Frame) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "widget_render",
            widget = "TextInput",
            x = area.x,
            y = area.y,
            w = area.width,
            h = area.height
        )
        .entered();

        if area.is_empty() {
            return;
        }

        crate::set_style_area(frame, area, self.style);

        let viewport_width = area.width as usize;
        let scroll = self.scroll_for(viewport_width);
        let y = area.y;

        if self.value.is_empty() {
            crate::draw_text_span(
                frame,
                area.x,
                y,
                &self.placeholder,
                self.style.patch(self.placeholder_style),
                area.right(),
            );
        } else {
            let mut visual_x = 0usize;
            for g in self.value.graphemes(true) {
                let w = UnicodeWidthStr::width(g);
                if visual_x < scroll {
                    visual_x += w;
                    continue;
                }
                let rel_x = visual_x - scroll;
                if rel_x + w > viewport_width {
                    break;
                }
                if let Some(c) = g.chars().next() {
                    let mut cell = Cell::from_char(c);
                    crate::apply_style(&mut cell, self.style);
                    frame.buffer.set(area.x + rel_x as u16, y, cell);
                }
                visual_x += w;
            }
        }

        if !self.focused {
            return;
        }

        let (cursor_x, cursor_y) = self.cursor_position(area);
        if let Some(cell) = frame.buffer.get_mut(cursor_x, cursor_y) {
            cell.attrs ^= StyleFlags::REVERSE;
        }
        frame.set_cursor(Some((cursor_x, cursor_y)));
    }

    fn is_essential(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use typeahead_core::event::{Modifiers, PasteEvent};

    fn press(input: &mut TextInput, code: KeyCode) -> InputChange {
        input.handle_event(&Event::Key(KeyEvent::new(code)))
    }

    fn ctrl(input: &mut TextInput, c: char) -> InputChange {
        input.handle_event(&Event::Key(
            KeyEvent::new(KeyCode::Char(c)).with_modifiers(Modifiers::CTRL),
        ))
    }

    fn type_str(input: &mut TextInput, text: &str) {
        for c in text.chars() {
            press(input, KeyCode::Char(c));
        }
    }

    #[test]
    fn empty_input() {
        let input = TextInput::new();
        assert!(input.value().is_empty());
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn with_value_puts_cursor_at_end() {
        let input = TextInput::new().with_value("hello");
        assert_eq!(input.cursor(), 5);
    }

    #[test]
    fn set_value_clamps_cursor() {
        let mut input = TextInput::new().with_value("hello world");
        input.set_value("hi");
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn combining_mark_joins_previous_grapheme() {
        let mut input = TextInput::new();
        type_str(&mut input, "e\u{301}");
        assert_eq!(input.value(), "e\u{301}");
        assert_eq!(input.value().graphemes(true).count(), 1);
        assert_eq!(input.cursor(), 1);

        press(&mut input, KeyCode::Char('x'));
        press(&mut input, KeyCode::Left);
        type_str(&mut input, "\u{308}");
        assert_eq!(input.value(), "e\u{301}\u{308}x");
        assert_eq!(input.cursor(), 1);
        press(&mut input, KeyCode::Backspace);
        assert_eq!(input.value(), "x");
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn typing_reports_value_change() {
        let mut input = TextInput::new();
        assert_eq!(press(&mut input, KeyCode::Char('a')), InputChange::Value);
        assert_eq!(press(&mut input, KeyCode::Left), InputChange::Cursor);
        assert_eq!(press(&mut input, KeyCode::Char('b')), InputChange::Value);
        assert_eq!(input.value(), "ba");
    }

    #[test]
    fn backspace_at_start_changes_nothing() {
        let mut input = TextInput::new();
        assert_eq!(press(&mut input, KeyCode::Backspace), InputChange::Cursor);
        assert_eq!(input.value(), "");
    }

    #[test]
    fn backspace_and_delete() {
        let mut input = TextInput::new().with_value("abc");
        press(&mut input, KeyCode::Backspace);
        assert_eq!(input.value(), "ab");
        press(&mut input, KeyCode::Home);
        press(&mut input, KeyCode::Delete);
        assert_eq!(input.value(), "b");
    }

    #[test]
    fn combining_mark_is_one_grapheme() {
        let mut input = TextInput::new().with_value("e\u{301}x");
        assert_eq!(input.cursor(), 2);
        press(&mut input, KeyCode::Left);
        press(&mut input, KeyCode::Backspace);
        assert_eq!(input.value(), "x");
    }

    #[test]
    fn ctrl_w_deletes_word() {
        let mut input = TextInput::new().with_value("euro dollar");
        assert_eq!(ctrl(&mut input, 'w'), InputChange::Value);
        assert_eq!(input.value(), "euro ");
        ctrl(&mut input, 'w');
        assert_eq!(input.value(), "");
    }

    #[test]
    fn ctrl_u_clears() {
        let mut input = TextInput::new().with_value("yen");
        assert_eq!(ctrl(&mut input, 'u'), InputChange::Value);
        assert_eq!(input.value(), "");
        assert_eq!(ctrl(&mut input, 'u'), InputChange::Ignored);
    }

    #[test]
    fn word_motion() {
        let mut input = TextInput::new().with_value("one two three");
        input.handle_event(&Event::Key(
            KeyEvent::new(KeyCode::Left).with_modifiers(Modifiers::CTRL),
        ));
        assert_eq!(input.cursor(), 8);
        press(&mut input, KeyCode::Home);
        input.handle_event(&Event::Key(
            KeyEvent::new(KeyCode::Right).with_modifiers(Modifiers::CTRL),
        ));
        assert_eq!(input.cursor(), 3);
    }

    #[test]
    fn paste_inserts_single_line() {
        let mut input = TextInput::new();
        type_str(&mut input, "ab");
        press(&mut input, KeyCode::Left);
        let change = input.handle_event(&Event::Paste(PasteEvent::new("X\nY")));
        assert_eq!(change, InputChange::Value);
        assert_eq!(input.value(), "aXYb");
        assert_eq!(input.cursor(), 3);
    }

    #[test]
    fn render_shows_placeholder_when_empty() {
        let input = TextInput::new().with_placeholder("Type to begin searching");
        let mut frame = Frame::new(30, 1);
        input.render(Rect::new(0, 0, 30, 1), &mut frame);
        assert_eq!(frame.buffer.row_text(0), "Type to begin searching");
        assert_eq!(frame.cursor_position, None);
    }

    #[test]
    fn render_focused_sets_cursor() {
        let input = TextInput::new().with_value("abc").with_focused(true);
        let mut frame = Frame::new(10, 1);
        input.render(Rect::new(2, 0, 8, 1), &mut frame);
        assert_eq!(frame.buffer.row_text(0), "  abc");
        assert_eq!(frame.cursor_position, Some((5, 0)));
        let cursor_cell = frame.buffer.get(5, 0).expect("in bounds");
        assert!(cursor_cell.attrs.contains(StyleFlags::REVERSE));
    }

    #[test]
    fn render_scrolls_to_cursor() {
        let input = TextInput::new().with_value("abcdefgh").with_focused(true);
        let mut frame = Frame::new(4, 1);
        input.render(Rect::new(0, 0, 4, 1), &mut frame);
        assert_eq!(frame.buffer.row_text(0), "fgh");
        assert_eq!(frame.cursor_position, Some((3, 0)));
    }
}
