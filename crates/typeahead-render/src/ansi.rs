#![forbid(unsafe_code)]

//! ANSI escape sequence helpers.
//!
//! Pure byte generation; the [`Presenter`](crate::presenter::Presenter)
//! owns all state tracking.
//!
//! | Sequence | Meaning |
//! |----------|---------|
//! | `ESC [ n m` | SGR (Select Graphic Rendition) |
//! | `ESC [ row ; col H` | CUP (Cursor Position, 1-indexed) |
//! | `ESC [ 2 J` | ED (Erase Display) |
//! | `ESC [ ? 25 h/l` | Cursor show/hide |

use std::io::{self, Write};

use crate::cell::{PackedRgba, StyleFlags};

/// SGR reset: `CSI 0 m`
pub const SGR_RESET: &[u8] = b"\x1b[0m";

#[inline]
pub fn sgr_reset<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(SGR_RESET)
}

/// Enable the SGR attributes in `flags`.
pub fn sgr_flags<W: Write>(w: &mut W, flags: StyleFlags) -> io::Result<()> {
    const CODES: [(StyleFlags, u8); 5] = [
        (StyleFlags::BOLD, 1),
        (StyleFlags::DIM, 2),
        (StyleFlags::ITALIC, 3),
        (StyleFlags::UNDERLINE, 4),
        (StyleFlags::REVERSE, 7),
    ];
    for (flag, code) in CODES {
        if flags.contains(flag) {
            write!(w, "\x1b[{code}m")?;
        }
    }
    Ok(())
}

/// Set the foreground color; transparent maps to the default (`39`).
pub fn sgr_fg<W: Write>(w: &mut W, color: PackedRgba) -> io::Result<()> {
    if color.is_transparent() {
        w.write_all(b"\x1b[39m")
    } else {
        write!(w, "\x1b[38;2;{};{};{}m", color.r(), color.g(), color.b())
    }
}

/// Set the background color; transparent maps to the default (`49`).
pub fn sgr_bg<W: Write>(w: &mut W, color: PackedRgba) -> io::Result<()> {
    if color.is_transparent() {
        w.write_all(b"\x1b[49m")
    } else {
        write!(w, "\x1b[48;2;{};{};{}m", color.r(), color.g(), color.b())
    }
}

/// CUP: move the cursor to 0-indexed `(x, y)`.
#[inline]
pub fn cup<W: Write>(w: &mut W, x: u16, y: u16) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", y as u32 + 1, x as u32 + 1)
}

#[inline]
pub fn erase_display<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(b"\x1b[2J")
}

#[inline]
pub fn cursor_show<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(b"\x1b[?25h")
}

#[inline]
pub fn cursor_hide<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(b"\x1b[?25l")
}
