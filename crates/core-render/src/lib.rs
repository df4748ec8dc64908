//! Rendering primitives and frame assembly.
//!
//! Every redraw builds a full `Frame` (a grid of char cells) from the editor
//! state and a `Viewport`, then emits it row by row through a batched
//! `Writer`. Wide chars occupy a leader cell followed by continuation cells.
//!
//! Invariants:
//! - Leader: width >= 1.
//! - Continuation: width == 0; it never prints.
//! - Continuations immediately follow their leader horizontally.
//! - Flags applied over a span mark leader and continuations alike, but
//!   emission derives printable content solely from leaders.
//!
//! Layout, top to bottom: `height - 1` text rows (gutter + line text, or `~`
//! below the end of the document) and one status row.

use bitflags::bitflags;

pub mod gutter;
pub mod render_engine;
pub mod status;
pub mod viewport;
pub mod writer;

pub use render_engine::{RenderEngine, RenderOptions};
pub use viewport::Viewport;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CellFlags: u8 {
        const REVERSE = 0b0000_0001; // reverse-video (software cursor)
        const CURSOR  = 0b0000_0010; // marks cell part of cursor span
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    /// Visual width in terminal columns. `0` designates a continuation cell.
    pub width: u8,
    pub flags: CellFlags,
}

impl Cell {
    #[inline]
    pub fn leader(ch: char, width: u16, flags: CellFlags) -> Self {
        Self {
            ch,
            width: width.clamp(1, u16::from(u8::MAX)) as u8,
            flags,
        }
    }
    #[inline]
    pub fn continuation(flags: CellFlags) -> Self {
        Self {
            ch: ' ',
            width: 0,
            flags,
        }
    }
    #[inline]
    pub fn is_leader(&self) -> bool {
        self.width > 0
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::leader(' ', 1, CellFlags::empty())
    }
}

#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    pub cells: Vec<Cell>,
}

impl Frame {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); (width as usize) * (height as usize)],
        }
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.width && y < self.height {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    /// Place `ch` at (x,y) with continuations for its width. A wide char
    /// that does not fit before the right edge is replaced by a space.
    /// Returns the number of columns consumed.
    pub fn set_char(&mut self, x: u16, y: u16, ch: char, width: u16, flags: CellFlags) -> u16 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        let width = width.max(1);
        let room = self.width - x;
        let (ch, width) = if width > room { (' ', 1) } else { (ch, width) };
        if let Some(idx) = self.index(x, y) {
            self.cells[idx] = Cell::leader(ch, width, flags);
        }
        for dx in 1..width {
            if let Some(idx) = self.index(x + dx, y) {
                self.cells[idx] = Cell::continuation(flags);
            }
        }
        width
    }

    /// Write `s` starting at (x,y), clipped at the right edge. Returns the
    /// column after the last char written.
    pub fn put_str(&mut self, x: u16, y: u16, s: &str, flags: CellFlags) -> u16 {
        let mut x = x;
        for ch in s.chars() {
            if x >= self.width {
                break;
            }
            let w = display_char_width(ch);
            x = x.saturating_add(self.set_char(x, y, printable(ch), w, flags));
        }
        x
    }

    /// Apply additional flags over an existing span (leader + continuations).
    pub fn apply_flags_span(&mut self, x: u16, y: u16, span_width: u16, flags: CellFlags) {
        let span = span_width.min(self.width.saturating_sub(x));
        for dx in 0..span {
            if let Some(idx) = self.index(x + dx, y) {
                self.cells[idx].flags |= flags;
            }
        }
    }

    /// Iterate leader cells of a row, yielding (char, flags, start_x).
    pub fn row_leaders(&self, y: u16) -> impl Iterator<Item = (char, CellFlags, u16)> + '_ {
        let width = self.width;
        let start = y as usize * width as usize;
        let mut x = 0u16;
        std::iter::from_fn(move || {
            while x < width && (y as usize) < self.height as usize {
                let cell = &self.cells[start + x as usize];
                if cell.is_leader() {
                    let out = (cell.ch, cell.flags, x);
                    x = x.saturating_add(u16::from(cell.width));
                    return Some(out);
                }
                x += 1;
            }
            None
        })
    }

    /// Printable text of a row (testing / diagnostics).
    pub fn row_text(&self, y: u16) -> String {
        self.row_leaders(y).map(|(c, _, _)| c).collect()
    }

    pub fn cell(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }
}

/// Width used on screen. Control chars (a literal tab included) take one
/// column and are shown as a space, matching `core_text::width`.
fn display_char_width(ch: char) -> u16 {
    core_text::width::char_width(ch) as u16
}

fn printable(ch: char) -> char {
    if ch.is_control() { ' ' } else { ch }
}
