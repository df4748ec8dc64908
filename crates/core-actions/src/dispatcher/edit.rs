//! Text edit action handling (insert/backspace/delete/newline/line delete).
//!
//! Every handler leaves the cursor inside the current mode's bound and sets
//! `dirty` only when the buffer actually changed.

use super::DispatchResult;
use core_state::EditorState;
use core_text::Position;

/// Line breaks split the line; other control chars except tab are dropped.
pub(crate) fn insert_char(state: &mut EditorState, c: char) -> DispatchResult {
    if c == '\n' || c == '\r' {
        return insert_newline(state);
    }
    if c.is_control() && c != '\t' {
        return DispatchResult::clean();
    }
    let Position { line, col } = state.cursor;
    if c == '\t' && state.options.expand_tabs {
        let width = state.options.tab_width;
        state.buffer.insert_str(line, col, &" ".repeat(width));
        state.cursor.col += width;
    } else {
        state.buffer.insert_char(line, col, c);
        state.cursor.col += 1;
    }
    tracing::trace!(target: "actions.dispatch", op = "insert_char", ch = %c.escape_debug(), line, col, to_col = state.cursor.col, "edit");
    state.mark_dirty();
    DispatchResult::redraw()
}

pub(crate) fn insert_newline(state: &mut EditorState) -> DispatchResult {
    let Position { line, col } = state.cursor;
    state.buffer.split_line(line, col);
    state.cursor = Position::new(line + 1, 0);
    tracing::trace!(target: "actions.dispatch", op = "insert_newline", line, col, "edit");
    state.mark_dirty();
    DispatchResult::redraw()
}

pub(crate) fn backspace(state: &mut EditorState) -> DispatchResult {
    let Position { line, col } = state.cursor;
    if col > 0 {
        state.buffer.delete_char(line, col - 1);
        state.cursor.col = col - 1;
    } else if line > 0 {
        let joint = state.buffer.line_len(line - 1);
        state.buffer.join_line(line - 1);
        state.cursor = Position::new(line - 1, joint);
    } else {
        return DispatchResult::clean();
    }
    tracing::trace!(target: "actions.dispatch", op = "backspace", line, col, to_line = state.cursor.line, to_col = state.cursor.col, "edit");
    state.mark_dirty();
    DispatchResult::redraw()
}

/// `x` in Normal mode, the Delete key in either mode. Never joins lines.
pub(crate) fn delete_under_cursor(state: &mut EditorState) -> DispatchResult {
    let Position { line, col } = state.cursor;
    let Some(removed) = state.buffer.delete_char(line, col) else {
        return DispatchResult::clean();
    };
    tracing::trace!(target: "actions.dispatch", op = "delete_char", ch = %removed.escape_debug(), line, col, "edit");
    state.mark_dirty();
    state.reclamp();
    DispatchResult::redraw()
}

/// `dd`: remove the cursor line. The cursor keeps its line index (now the
/// following line) unless that falls off the end.
pub(crate) fn delete_line(state: &mut EditorState) -> DispatchResult {
    let line = state.cursor.line;
    let was_single = state.buffer.line_count() == 1;
    let removed = state.buffer.remove_line(line);
    tracing::trace!(target: "actions.dispatch", op = "delete_line", line, len = removed.chars().count(), "edit");
    if !(was_single && removed.is_empty()) {
        state.mark_dirty();
    }
    state.reclamp();
    DispatchResult::redraw()
}
