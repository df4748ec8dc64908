//! Status line composition.
//!
//! Format: `-- MODE -- <name>[ [+]][  <pending>][  <message>]` on the left,
//! `Ln X, Col Y` right-aligned.
//! * `<name>` is the base file name or `[No Name]`.
//! * `[+]` appears only when the buffer is dirty.
//! * `<pending>` echoes the keys of a pending multi-key command.
//! * `<message>` is the ephemeral message (save confirmation or failure).
//!
//! Two stages: `compose_status` produces ordered segments and
//! `format_status` lays them out for a given width, measured in terminal
//! columns. When space runs out the message is dropped first, then the file
//! name and pending keys are truncated, then the position is dropped. The
//! mode label goes last.

use core_state::Mode;
use core_text::width::{char_width, display_width};
use std::borrow::Cow;
use std::path::Path;

/// What we need to render a status line.
pub struct StatusContext<'a> {
    pub mode: Mode,
    pub line: usize, // 0-based current line index
    pub col: usize,  // 0-based display column
    pub file_name: Option<&'a Path>,
    pub dirty: bool,
    pub pending: Option<&'a str>,
    pub message: Option<&'a str>,
}

/// Discrete status line segments (order-sensitive).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusSegment<'a> {
    Mode(&'static str),
    FileName(Cow<'a, str>),
    Dirty,
    Pending(&'a str),
    Message(&'a str),
    /// 1-based cursor line & column for display.
    Position { line_1: usize, col_1: usize },
}

pub fn compose_status<'a>(ctx: &StatusContext<'a>) -> Vec<StatusSegment<'a>> {
    let name: Cow<'a, str> = ctx
        .file_name
        .and_then(|p| p.file_name())
        .map_or(Cow::Borrowed("[No Name]"), |n| n.to_string_lossy());
    let mut out = Vec::with_capacity(6);
    out.push(StatusSegment::Mode(ctx.mode.label()));
    out.push(StatusSegment::FileName(name));
    if ctx.dirty {
        out.push(StatusSegment::Dirty);
    }
    if let Some(keys) = ctx.pending.filter(|k| !k.is_empty()) {
        out.push(StatusSegment::Pending(keys));
    }
    if let Some(msg) = ctx.message.filter(|m| !m.is_empty()) {
        out.push(StatusSegment::Message(msg));
    }
    out.push(StatusSegment::Position {
        line_1: ctx.line + 1,
        col_1: ctx.col + 1,
    });
    out
}

/// Lay segments out into exactly `width` terminal columns.
pub fn format_status(segments: &[StatusSegment<'_>], width: u16) -> String {
    let width = width as usize;
    let mut mode = String::new();
    let mut rest = String::new();
    let mut message = None;
    let mut right = String::new();
    for seg in segments {
        match seg {
            StatusSegment::Mode(m) => {
                mode.push_str("-- ");
                mode.push_str(m);
                mode.push_str(" --");
            }
            StatusSegment::FileName(name) => {
                rest.push(' ');
                rest.push_str(name);
            }
            StatusSegment::Dirty => rest.push_str(" [+]"),
            StatusSegment::Pending(keys) => {
                rest.push_str("  ");
                rest.push_str(keys);
            }
            StatusSegment::Message(msg) => message = Some(*msg),
            StatusSegment::Position { line_1, col_1 } => {
                right = format!("Ln {line_1}, Col {col_1}");
            }
        }
    }

    // The mode label outranks the position, which outranks everything else.
    let mode_w = display_width(&mode);
    let left_budget = if mode_w + 1 + display_width(&right) <= width {
        width - display_width(&right) - 1
    } else {
        right.clear();
        width
    };
    if let Some(msg) = message {
        if mode_w + display_width(&rest) + 2 + display_width(msg) <= left_budget {
            rest.push_str("  ");
            rest.push_str(msg);
        }
    }

    let mut out = truncate_to_width(&mode, left_budget);
    let used = display_width(&out);
    out.push_str(&truncate_to_width(&rest, left_budget - used));
    let pad = width - display_width(&out) - display_width(&right);
    out.extend(std::iter::repeat_n(' ', pad));
    out.push_str(&right);
    out
}

/// Longest prefix of `s` that fits in `max` columns.
fn truncate_to_width(s: &str, max: usize) -> String {
    let mut used = 0;
    s.chars()
        .take_while(|&c| {
            used += char_width(c);
            used <= max
        })
        .collect()
}

pub fn build_status(ctx: &StatusContext<'_>, width: u16) -> String {
    format_status(&compose_status(ctx), width)
}
