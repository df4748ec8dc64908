//! Mode transition handling (Normal <-> Insert).
//!
//! Entry commands position the cursor first (using Insert's bound) and then
//! switch mode; `set_mode` clears the pending slot and re-clamps.

use super::DispatchResult;
use crate::ModeChange;
use core_state::{EditorState, Mode};
use core_text::Position;

pub(crate) fn handle_mode_change(mc: ModeChange, state: &mut EditorState) -> DispatchResult {
    let line = state.cursor.line;
    let len = state.buffer.line_len(line);
    match mc {
        ModeChange::InsertBefore => {}
        ModeChange::InsertLineStart => state.cursor.col = 0,
        ModeChange::AppendAfter => state.cursor.col = (state.cursor.col + 1).min(len),
        ModeChange::AppendLineEnd => state.cursor.col = len,
        ModeChange::OpenLineBelow => {
            state.buffer.insert_line(line + 1, "");
            state.cursor = Position::new(line + 1, 0);
            state.mark_dirty();
        }
        ModeChange::OpenLineAbove => {
            state.buffer.insert_line(line, "");
            state.cursor = Position::new(line, 0);
            state.mark_dirty();
        }
        ModeChange::Exit => {
            if state.mode == Mode::Normal {
                return DispatchResult::clean();
            }
            state.set_mode(Mode::Normal);
            return DispatchResult::redraw();
        }
    }
    tracing::trace!(target: "actions.dispatch", ?mc, line = state.cursor.line, col = state.cursor.col, "enter_insert");
    state.set_mode(Mode::Insert);
    DispatchResult::redraw()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_after_on_empty_line_stays_at_zero() {
        let mut st = EditorState::from_lines([""]);
        handle_mode_change(ModeChange::AppendAfter, &mut st);
        assert_eq!(st.cursor, Position::origin());
        assert_eq!(st.mode, Mode::Insert);
    }

    #[test]
    fn open_line_above_first_line() {
        let mut st = EditorState::from_lines(["abc"]);
        st.cursor.col = 2;
        handle_mode_change(ModeChange::OpenLineAbove, &mut st);
        assert_eq!(st.lines(), vec!["", "abc"]);
        assert_eq!(st.cursor, Position::origin());
        assert!(st.dirty);
    }

    #[test]
    fn exit_in_normal_is_noop() {
        let mut st = EditorState::from_lines(["abc"]);
        assert_eq!(handle_mode_change(ModeChange::Exit, &mut st), DispatchResult::clean());
        assert_eq!(st.mode, Mode::Normal);
    }
}
