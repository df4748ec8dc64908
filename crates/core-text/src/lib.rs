//! Line-oriented text storage.
//!
//! The document is an ordered `Vec<String>`, one entry per row, without
//! trailing newlines. Columns are counted in `char`s; byte offsets never leak
//! out of this crate.
//!
//! Invariant: a `Buffer` always holds at least one line. An empty document is
//! exactly one empty line.

pub mod class;
pub mod motion;
pub mod width;

pub use class::{CharClass, classify};
pub use width::display_col;

/// A position inside a buffer expressed as (line index, char column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }

    pub const fn origin() -> Self {
        Self { line: 0, col: 0 }
    }
}

/// Largest valid column for a line of `len` chars.
///
/// `past_end` selects the insertion-point bound (`len`) instead of the
/// on-character bound (`len - 1`, or 0 for an empty line).
#[inline]
pub const fn max_col(len: usize, past_end: bool) -> usize {
    if past_end { len } else { len.saturating_sub(1) }
}

/// Clamp `pos` into the buffer under the selected column bound.
///
/// Idempotent: clamping an already valid position returns it unchanged.
#[must_use]
pub fn clamp(buf: &Buffer, pos: Position, past_end: bool) -> Position {
    let line = pos.line.min(buf.line_count() - 1);
    let col = pos.col.min(max_col(buf.line_len(line), past_end));
    Position { line, col }
}

/// The line store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    lines: Vec<String>,
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Buffer {
    /// An empty document (one empty line).
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
        }
    }

    /// Build from pre-split lines. An empty list is normalized to one empty line.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut lines: Vec<String> = lines.into_iter().map(Into::into).collect();
        if lines.is_empty() {
            lines.push(String::new());
        }
        Self { lines }
    }

    /// Split `text` on `\n` (a final newline does not produce an extra empty line).
    pub fn from_text(text: &str) -> Self {
        let body = text.strip_suffix('\n').unwrap_or(text);
        if text.is_empty() {
            return Self::new();
        }
        Self::from_lines(body.split('\n'))
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Content of a line, `None` when out of range.
    pub fn line(&self, idx: usize) -> Option<&str> {
        self.lines.get(idx).map(String::as_str)
    }

    /// Length of a line in chars; 0 when out of range.
    pub fn line_len(&self, idx: usize) -> usize {
        self.lines.get(idx).map_or(0, |l| l.chars().count())
    }

    pub fn is_blank(&self, idx: usize) -> bool {
        self.lines.get(idx).is_some_and(String::is_empty)
    }

    /// Char at (line, col), if any.
    pub fn char_at(&self, line: usize, col: usize) -> Option<char> {
        self.lines.get(line).and_then(|l| l.chars().nth(col))
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn to_lines(&self) -> Vec<String> {
        self.lines.clone()
    }

    /// Insert one char at `col`, shifting the remainder right.
    pub fn insert_char(&mut self, line: usize, col: usize, ch: char) {
        debug_assert!(ch != '\n' && ch != '\r', "insert_char does not split lines");
        let text = self.line_mut(line);
        let at = byte_index(text, col);
        text.insert(at, ch);
    }

    /// Insert a string at `col`. The string must not contain newlines.
    pub fn insert_str(&mut self, line: usize, col: usize, s: &str) {
        debug_assert!(!s.contains('\n'), "insert_str does not split lines");
        let text = self.line_mut(line);
        let at = byte_index(text, col);
        text.insert_str(at, s);
    }

    /// Remove the char at `col`. Returns `None` when there is nothing to delete.
    pub fn delete_char(&mut self, line: usize, col: usize) -> Option<char> {
        let text = self.line_mut(line);
        let (at, _) = text.char_indices().nth(col)?;
        Some(text.remove(at))
    }

    /// Split a line at `col`: `[0, col)` stays, `[col, end)` becomes line + 1.
    pub fn split_line(&mut self, line: usize, col: usize) {
        let text = self.line_mut(line);
        let at = byte_index(text, col);
        let tail = text.split_off(at);
        self.lines.insert(line + 1, tail);
        tracing::trace!(target: "text.buffer", op = "split_line", line, col, "structural");
    }

    /// Append line + 1 onto `line` and remove it. Returns false when `line` is the last line.
    pub fn join_line(&mut self, line: usize) -> bool {
        debug_assert!(line < self.lines.len(), "join_line out of range");
        if line + 1 >= self.lines.len() {
            return false;
        }
        let next = self.lines.remove(line + 1);
        self.lines[line].push_str(&next);
        tracing::trace!(target: "text.buffer", op = "join_line", line, "structural");
        true
    }

    /// Insert a new line at `idx` (`idx == line_count()` appends).
    pub fn insert_line(&mut self, idx: usize, text: impl Into<String>) {
        debug_assert!(idx <= self.lines.len(), "insert_line out of range");
        self.lines.insert(idx, text.into());
        tracing::trace!(target: "text.buffer", op = "insert_line", line = idx, "structural");
    }

    /// Remove a line. Removing the only line leaves a single empty line.
    pub fn remove_line(&mut self, line: usize) -> String {
        debug_assert!(line < self.lines.len(), "remove_line out of range");
        let removed = if self.lines.len() == 1 {
            std::mem::take(&mut self.lines[0])
        } else {
            self.lines.remove(line)
        };
        tracing::trace!(target: "text.buffer", op = "remove_line", line, remaining = self.lines.len(), "structural");
        removed
    }

    fn line_mut(&mut self, idx: usize) -> &mut String {
        debug_assert!(idx < self.lines.len(), "line index out of range");
        &mut self.lines[idx]
    }
}

/// Byte offset of char column `col`, clamped to the end of the string.
fn byte_index(s: &str, col: usize) -> usize {
    s.char_indices().nth(col).map_or(s.len(), |(b, _)| b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_normalizes_to_single_line() {
        let b = Buffer::from_lines(Vec::<String>::new());
        assert_eq!(b.line_count(), 1);
        assert_eq!(b.line(0), Some(""));
        assert_eq!(Buffer::from_text("").line_count(), 1);
    }

    #[test]
    fn from_text_drops_single_trailing_newline() {
        let b = Buffer::from_text("a\nb\n");
        assert_eq!(b.to_lines(), vec!["a", "b"]);
        let b = Buffer::from_text("a\n\n");
        assert_eq!(b.to_lines(), vec!["a", ""]);
    }

    #[test]
    fn insert_and_delete_chars_use_char_columns() {
        let mut b = Buffer::from_lines(["héllo"]);
        b.insert_char(0, 2, 'X');
        assert_eq!(b.line(0), Some("héXllo"));
        assert_eq!(b.line_len(0), 6);
        assert_eq!(b.delete_char(0, 1), Some('é'));
        assert_eq!(b.line(0), Some("hXllo"));
    }

    #[test]
    fn delete_char_past_end_is_noop() {
        let mut b = Buffer::from_lines(["ab", ""]);
        assert_eq!(b.delete_char(0, 2), None);
        assert_eq!(b.delete_char(1, 0), None);
        assert_eq!(b.to_lines(), vec!["ab", ""]);
    }

    #[test]
    fn split_then_join_restores_line() {
        let mut b = Buffer::from_lines(["hello"]);
        b.split_line(0, 2);
        assert_eq!(b.to_lines(), vec!["he", "llo"]);
        assert!(b.join_line(0));
        assert_eq!(b.to_lines(), vec!["hello"]);
        assert!(!b.join_line(0), "last line cannot join");
    }

    #[test]
    fn split_at_end_creates_empty_line() {
        let mut b = Buffer::from_lines(["abc"]);
        b.split_line(0, 3);
        assert_eq!(b.to_lines(), vec!["abc", ""]);
    }

    #[test]
    fn remove_only_line_keeps_one_empty_line() {
        let mut b = Buffer::from_lines(["only"]);
        assert_eq!(b.remove_line(0), "only");
        assert_eq!(b.line_count(), 1);
        assert_eq!(b.line(0), Some(""));
    }

    #[test]
    fn remove_middle_line() {
        let mut b = Buffer::from_lines(["x", "y", "z"]);
        b.remove_line(1);
        assert_eq!(b.to_lines(), vec!["x", "z"]);
    }

    #[test]
    fn insert_line_appends_at_end() {
        let mut b = Buffer::from_lines(["a"]);
        b.insert_line(1, "b");
        b.insert_line(0, "");
        assert_eq!(b.to_lines(), vec!["", "a", "b"]);
    }

    #[test]
    fn clamp_respects_bounds_and_is_idempotent() {
        let b = Buffer::from_lines(["abc", ""]);
        let p = clamp(&b, Position::new(9, 9), false);
        assert_eq!(p, Position::new(1, 0));
        let p = clamp(&b, Position::new(0, 9), false);
        assert_eq!(p, Position::new(0, 2));
        assert_eq!(clamp(&b, p, false), p);
        let p = clamp(&b, Position::new(0, 9), true);
        assert_eq!(p, Position::new(0, 3));
        assert_eq!(clamp(&b, p, true), p);
    }
}
