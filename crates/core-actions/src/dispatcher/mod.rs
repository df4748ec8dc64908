//! Dispatcher applying `Action` to mutable editor state.
//!
//! The transition table is total over `(mode, pending, action)`: every
//! combination resolves to a defined outcome, most of them a silent no-op.
//! Sub-modules:
//! * `motion`  - cursor movement
//! * `mode`    - mode entry / exit (Normal <-> Insert)
//! * `edit`    - text mutation (insert/delete/backspace/newline/line delete)
//!
//! Whatever a handler does, the session invariants hold again before
//! `dispatch` returns.

use crate::{Action, EditKind, ModeChange};
use core_state::{EditorState, Mode, PendingCommand};

mod edit;
mod mode;
mod motion;

/// Result of dispatching a single `Action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchResult {
    /// Something visible changed (text, cursor, mode or pending indicator);
    /// the runtime should redraw.
    pub redraw: bool,
    /// The user asked to leave the editor.
    pub quit: bool,
    /// The user asked to persist the buffer.
    pub save: bool,
}

impl DispatchResult {
    pub fn redraw() -> Self {
        Self {
            redraw: true,
            ..Self::default()
        }
    }
    pub fn clean() -> Self {
        Self::default()
    }
    pub fn quit() -> Self {
        Self {
            redraw: true,
            quit: true,
            save: false,
        }
    }
    pub fn save() -> Self {
        Self {
            redraw: true,
            quit: false,
            save: true,
        }
    }
}

/// Apply an action to editor state.
pub fn dispatch(action: Action, state: &mut EditorState) -> DispatchResult {
    let result = match state.mode {
        Mode::Normal => dispatch_normal(action, state),
        Mode::Insert => dispatch_insert(action, state),
    };
    debug_assert!(state.invariants_hold(), "invariants broken after {action:?}");
    result
}

fn dispatch_normal(action: Action, state: &mut EditorState) -> DispatchResult {
    if let Some(pending) = state.pending.take() {
        return resolve_pending(pending, action, state);
    }
    match action {
        Action::Motion(kind) => motion::handle_motion(kind, state),
        Action::Edit(EditKind::DeleteChar | EditKind::DeleteCharForward) => {
            edit::delete_under_cursor(state)
        }
        Action::LineDeletePrefix => {
            state.pending = Some(PendingCommand::DeleteLine);
            tracing::trace!(target: "actions.dispatch", pending = ?PendingCommand::DeleteLine, "pending_set");
            DispatchResult::redraw()
        }
        Action::ModeChange(mc) => mode::handle_mode_change(mc, state),
        Action::Quit => DispatchResult::quit(),
        Action::Save => DispatchResult::save(),
        Action::Char(_) | Action::Edit(EditKind::Enter | EditKind::Backspace) => {
            DispatchResult::clean()
        }
    }
}

/// Second key of a multi-key command. A mismatched key is consumed, not
/// reprocessed.
fn resolve_pending(
    pending: PendingCommand,
    action: Action,
    state: &mut EditorState,
) -> DispatchResult {
    match (pending, action) {
        (PendingCommand::DeleteLine, Action::LineDeletePrefix) => edit::delete_line(state),
        (pending, other) => {
            tracing::trace!(target: "actions.dispatch", ?pending, action = ?other, "pending_cancelled");
            // The pending indicator disappears from the status line.
            DispatchResult::redraw()
        }
    }
}

fn dispatch_insert(action: Action, state: &mut EditorState) -> DispatchResult {
    match action {
        Action::Char(c) => edit::insert_char(state, c),
        Action::Edit(EditKind::Enter) => edit::insert_newline(state),
        Action::Edit(EditKind::Backspace) => edit::backspace(state),
        Action::Edit(EditKind::DeleteCharForward | EditKind::DeleteChar) => {
            edit::delete_under_cursor(state)
        }
        Action::Motion(kind) => motion::handle_motion(kind, state),
        Action::ModeChange(ModeChange::Exit) => mode::handle_mode_change(ModeChange::Exit, state),
        Action::Quit => DispatchResult::quit(),
        Action::Save => DispatchResult::save(),
        Action::ModeChange(_) | Action::LineDeletePrefix => DispatchResult::clean(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MotionKind;
    use core_text::Position;

    fn state(lines: &[&str]) -> EditorState {
        EditorState::from_lines(lines.iter().copied())
    }

    #[test]
    fn normal_mode_ignores_printable_chars() {
        let mut st = state(&["abc"]);
        let r = dispatch(Action::Char('z'), &mut st);
        assert_eq!(r, DispatchResult::clean());
        assert_eq!(st.lines(), vec!["abc"]);
        assert!(!st.dirty);
    }

    #[test]
    fn pending_mismatch_discards_second_key() {
        let mut st = state(&["abc", "def"]);
        dispatch(Action::LineDeletePrefix, &mut st);
        assert_eq!(st.pending, Some(PendingCommand::DeleteLine));
        dispatch(Action::Motion(MotionKind::Down), &mut st);
        assert!(st.pending.is_none());
        assert_eq!(st.cursor, Position::origin(), "mismatched key is not reprocessed");
        assert_eq!(st.lines(), vec!["abc", "def"]);
    }

    #[test]
    fn quit_and_save_are_forwarded_in_both_modes() {
        let mut st = state(&["abc"]);
        assert!(dispatch(Action::Quit, &mut st).quit);
        assert!(dispatch(Action::Save, &mut st).save);
        st.set_mode(Mode::Insert);
        assert!(dispatch(Action::Save, &mut st).save);
        assert!(dispatch(Action::Quit, &mut st).quit);
        assert_eq!(st.lines(), vec!["abc"]);
    }

    #[test]
    fn insert_mode_ignores_mode_entry_and_delete_prefix() {
        let mut st = state(&["abc"]);
        st.set_mode(Mode::Insert);
        assert_eq!(
            dispatch(Action::ModeChange(ModeChange::AppendLineEnd), &mut st),
            DispatchResult::clean()
        );
        assert_eq!(dispatch(Action::LineDeletePrefix, &mut st), DispatchResult::clean());
        assert!(st.pending.is_none());
        assert_eq!(st.mode, Mode::Insert);
    }
}
