//! Editor session state: line store, cursor, mode, pending command and file metadata.
//!
//! `EditorState` is the only unit of mutable state the editing engine touches.
//! The dispatcher in `core-actions` mutates it one action at a time; the
//! renderer and the writer only read it.
//!
//! Invariants (hold whenever control is outside the dispatcher):
//! * the buffer has at least one line (guaranteed by `core_text::Buffer`);
//! * `cursor.line < line_count`;
//! * `cursor.col <= max_col(len, mode.allows_past_end())`;
//! * `pending` is `None` unless `mode == Normal`.

use core_text::{Buffer, Position};
use std::path::PathBuf;
use std::time::{Duration, Instant};

mod line_ending;
pub use line_ending::{LineEnding, NormalizedText, normalize_line_endings};

/// Current editor mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Navigation and single-key commands. Cursor rests on a char.
    #[default]
    Normal,
    /// Text entry. Cursor may rest one past the last char.
    Insert,
}

impl Mode {
    /// Whether the cursor may sit on the insertion slot after the last char.
    pub const fn allows_past_end(self) -> bool {
        matches!(self, Mode::Insert)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Mode::Normal => "NORMAL",
            Mode::Insert => "INSERT",
        }
    }
}

/// Closed set of multi-key Normal-mode commands awaiting their second key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingCommand {
    /// `d` seen; a second `d` deletes the cursor line.
    DeleteLine,
}

impl PendingCommand {
    /// Keys typed so far, for the status line.
    pub const fn keys(self) -> &'static str {
        match self {
            PendingCommand::DeleteLine => "d",
        }
    }
}

/// Editing options sourced from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorOptions {
    pub tab_width: usize,
    pub expand_tabs: bool,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            tab_width: 4,
            expand_tabs: true,
        }
    }
}

/// Short-lived status line message (e.g. save confirmation).
#[derive(Debug, Clone)]
pub struct EphemeralMessage {
    pub text: String,
    pub expires_at: Instant,
}

/// The editor session.
#[derive(Debug, Clone)]
pub struct EditorState {
    pub buffer: Buffer,
    pub cursor: Position,
    pub mode: Mode,
    pub pending: Option<PendingCommand>,
    /// True iff the buffer differs from the last persisted content.
    pub dirty: bool,
    pub options: EditorOptions,
    pub file_name: Option<PathBuf>,
    pub original_line_ending: LineEnding,
    pub had_trailing_newline: bool,
    pub ephemeral_status: Option<EphemeralMessage>,
}

impl EditorState {
    /// New clean session in Normal mode with the cursor at the origin.
    pub fn new(buffer: Buffer) -> Self {
        Self {
            buffer,
            cursor: Position::origin(),
            mode: Mode::Normal,
            pending: None,
            dirty: false,
            options: EditorOptions::default(),
            file_name: None,
            original_line_ending: LineEnding::Lf,
            had_trailing_newline: true,
            ephemeral_status: None,
        }
    }

    /// Convenience constructor from pre-split lines.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Buffer::from_lines(lines))
    }

    pub fn past_end(&self) -> bool {
        self.mode.allows_past_end()
    }

    /// Re-clamp the cursor to the active mode's bound.
    pub fn reclamp(&mut self) {
        self.cursor = core_text::clamp(&self.buffer, self.cursor, self.past_end());
    }

    /// Switch mode, clearing any pending prefix and re-clamping the cursor.
    pub fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            tracing::debug!(target: "state.mode", from = ?self.mode, to = ?mode, "mode_change");
        }
        self.mode = mode;
        self.pending = None;
        self.reclamp();
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Lines in order, for the persistence layer.
    pub fn lines(&self) -> Vec<String> {
        self.buffer.to_lines()
    }

    /// True when every session invariant holds.
    pub fn invariants_hold(&self) -> bool {
        let count = self.buffer.line_count();
        if count == 0 || self.cursor.line >= count {
            return false;
        }
        let len = self.buffer.line_len(self.cursor.line);
        let col_ok = self.cursor.col <= core_text::max_col(len, self.past_end());
        let pending_ok = self.pending.is_none() || self.mode == Mode::Normal;
        col_ok && pending_ok
    }

    pub fn set_ephemeral(&mut self, msg: impl Into<String>, ttl: Duration) {
        self.ephemeral_status = Some(EphemeralMessage {
            text: msg.into(),
            expires_at: Instant::now() + ttl,
        });
    }

    /// Drop an expired ephemeral message. Returns true when one was removed.
    pub fn tick_ephemeral(&mut self, now: Instant) -> bool {
        let expired = self
            .ephemeral_status
            .as_ref()
            .is_some_and(|m| now >= m.expires_at);
        if expired {
            self.ephemeral_status = None;
        }
        expired
    }
}
