#![forbid(unsafe_code)]

//! Input events.
//!
//! Everything the widgets react to arrives as an [`Event`]. Crossterm events
//! are converted once, at the terminal boundary, so widget code and tests
//! never see backend types. Conversions that have no counterpart here
//! (CapsLock, horizontal scroll, media keys) yield `None` and are dropped.
//!
//! Mouse coordinates are 0-indexed cells. Terminals that do not report key
//! kinds produce [`KeyEventKind::Press`].

use bitflags::bitflags;
use crossterm::event as cte;

/// Input event delivered to models and widgets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    Mouse(MouseEvent),
    /// New terminal size in cells.
    Resize { width: u16, height: u16 },
    /// Bracketed paste, delivered whole.
    Paste(PasteEvent),
    /// `true` when the terminal window gained focus.
    Focus(bool),
    /// Periodic tick requested with `Cmd::tick`.
    Tick,
}

impl Event {
    /// Convert a crossterm event. `None` for events this crate does not model.
    #[must_use]
    pub fn from_crossterm(event: cte::Event) -> Option<Self> {
        Some(match event {
            cte::Event::Key(key) => Self::Key(KeyEvent::from_crossterm(key)?),
            cte::Event::Mouse(mouse) => Self::Mouse(MouseEvent::from_crossterm(mouse)?),
            cte::Event::Resize(width, height) => Self::Resize { width, height },
            cte::Event::Paste(text) => Self::Paste(PasteEvent::new(text)),
            cte::Event::FocusGained => Self::Focus(true),
            cte::Event::FocusLost => Self::Focus(false),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
    pub kind: KeyEventKind,
}

impl KeyEvent {
    /// A plain key press.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
            kind: KeyEventKind::Press,
        }
    }

    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn is_char(&self, c: char) -> bool {
        self.code == KeyCode::Char(c)
    }

    #[must_use]
    pub const fn ctrl(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }

    #[must_use]
    pub const fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }

    /// Press or auto-repeat. Releases never edit or navigate.
    #[must_use]
    pub const fn is_press(&self) -> bool {
        !matches!(self.kind, KeyEventKind::Release)
    }

    fn from_crossterm(event: cte::KeyEvent) -> Option<Self> {
        let kind = match event.kind {
            cte::KeyEventKind::Press => KeyEventKind::Press,
            cte::KeyEventKind::Repeat => KeyEventKind::Repeat,
            cte::KeyEventKind::Release => KeyEventKind::Release,
        };
        Some(Self {
            code: KeyCode::from_crossterm(event.code)?,
            modifiers: event.modifiers.into(),
            kind,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Escape,
    Backspace,
    Delete,
    Tab,
    /// Shift+Tab.
    BackTab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    /// F1 through F24.
    F(u8),
}

impl KeyCode {
    fn from_crossterm(code: cte::KeyCode) -> Option<Self> {
        Some(match code {
            cte::KeyCode::Char(c) => Self::Char(c),
            cte::KeyCode::Enter => Self::Enter,
            cte::KeyCode::Esc => Self::Escape,
            cte::KeyCode::Backspace => Self::Backspace,
            cte::KeyCode::Delete => Self::Delete,
            cte::KeyCode::Tab => Self::Tab,
            cte::KeyCode::BackTab => Self::BackTab,
            cte::KeyCode::Up => Self::Up,
            cte::KeyCode::Down => Self::Down,
            cte::KeyCode::Left => Self::Left,
            cte::KeyCode::Right => Self::Right,
            cte::KeyCode::Home => Self::Home,
            cte::KeyCode::End => Self::End,
            cte::KeyCode::PageUp => Self::PageUp,
            cte::KeyCode::PageDown => Self::PageDown,
            cte::KeyCode::F(n) => Self::F(n),
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    #[default]
    Press,
    Repeat,
    Release,
}

bitflags! {
    /// Held modifier keys.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const NONE = 0;
        const SHIFT = 1;
        const ALT = 1 << 1;
        const CTRL = 1 << 2;
        /// Super, Hyper, and Meta all land here.
        const SUPER = 1 << 3;
    }
}

impl From<cte::KeyModifiers> for Modifiers {
    fn from(held: cte::KeyModifiers) -> Self {
        let pairs = [
            (cte::KeyModifiers::SHIFT, Self::SHIFT),
            (cte::KeyModifiers::ALT, Self::ALT),
            (cte::KeyModifiers::CONTROL, Self::CTRL),
            (cte::KeyModifiers::SUPER, Self::SUPER),
            (cte::KeyModifiers::HYPER, Self::SUPER),
            (cte::KeyModifiers::META, Self::SUPER),
        ];
        pairs
            .into_iter()
            .filter(|(backend, _)| held.contains(*backend))
            .fold(Self::NONE, |acc, (_, ours)| acc | ours)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    /// Column, 0 at the left edge.
    pub x: u16,
    /// Row, 0 at the top.
    pub y: u16,
    pub modifiers: Modifiers,
}

impl MouseEvent {
    #[must_use]
    pub const fn new(kind: MouseEventKind, x: u16, y: u16) -> Self {
        Self {
            kind,
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    #[must_use]
    pub const fn position(&self) -> (u16, u16) {
        (self.x, self.y)
    }

    fn from_crossterm(event: cte::MouseEvent) -> Option<Self> {
        let kind = match event.kind {
            cte::MouseEventKind::Down(b) => MouseEventKind::Down(b.into()),
            cte::MouseEventKind::Up(b) => MouseEventKind::Up(b.into()),
            cte::MouseEventKind::Drag(b) => MouseEventKind::Drag(b.into()),
            cte::MouseEventKind::Moved => MouseEventKind::Moved,
            cte::MouseEventKind::ScrollUp => MouseEventKind::ScrollUp,
            cte::MouseEventKind::ScrollDown => MouseEventKind::ScrollDown,
            cte::MouseEventKind::ScrollLeft | cte::MouseEventKind::ScrollRight => return None,
        };
        Some(Self {
            modifiers: event.modifiers.into(),
            ..Self::new(kind, event.column, event.row)
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseEventKind {
    Down(MouseButton),
    Up(MouseButton),
    /// Moved with a button held.
    Drag(MouseButton),
    /// Moved with no button held.
    Moved,
    ScrollUp,
    ScrollDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl From<cte::MouseButton> for MouseButton {
    fn from(button: cte::MouseButton) -> Self {
        match button {
            cte::MouseButton::Left => Self::Left,
            cte::MouseButton::Right => Self::Right,
            cte::MouseButton::Middle => Self::Middle,
        }
    }
}

/// Text from a bracketed paste.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasteEvent {
    pub text: String,
}

impl PasteEvent {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}
