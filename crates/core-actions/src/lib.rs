//! Editor actions and the modal dispatcher that applies them.
//!
//! An `Action` is one decoded key event: either a printable char or a named
//! editor command. The terminal layer produces physical `KeyEvent`s;
//! [`translate_key`] maps those to actions for the current mode, and
//! [`dispatch`] applies an action to the `EditorState`.

pub mod dispatcher;
pub mod io_ops;
mod key_translator;

pub use dispatcher::{DispatchResult, dispatch};
pub use key_translator::translate_key;

use core_events::KeyEvent;
use core_state::EditorState;

/// Translate `key` for the current mode and dispatch it. Unbound keys are a
/// clean no-op, except that they still cancel a pending prefix.
pub fn handle_key(state: &mut EditorState, key: &KeyEvent) -> DispatchResult {
    match translate_key(state.mode, key) {
        Some(action) => dispatch(action, state),
        None => {
            if state.pending.take().is_some() {
                return DispatchResult::redraw();
            }
            DispatchResult::clean()
        }
    }
}

/// Cursor motions. All of them are mutation free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotionKind {
    Left,
    Down,
    Up,
    Right,
    WordForward,
    WordBackward,
    WordEnd,
    LineStart,
    LineEnd,
    ParagraphBackward,
    ParagraphForward,
}

/// Single-key text edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditKind {
    /// Normal-mode `x`.
    DeleteChar,
    /// The Delete key: removes the char under the cursor in either mode.
    DeleteCharForward,
    Enter,
    Backspace,
}

/// Mode entry / exit commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeChange {
    /// `i`
    InsertBefore,
    /// `I`
    InsertLineStart,
    /// `a`
    AppendAfter,
    /// `A`
    AppendLineEnd,
    /// `o`
    OpenLineBelow,
    /// `O`
    OpenLineAbove,
    /// Esc (or Ctrl-Space) back to Normal.
    Exit,
}

/// A decoded key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// A printable char. Inserted in Insert mode, ignored in Normal mode.
    Char(char),
    Motion(MotionKind),
    Edit(EditKind),
    ModeChange(ModeChange),
    /// First and second key of the two-key line delete (`dd`).
    LineDeletePrefix,
    Quit,
    Save,
}
