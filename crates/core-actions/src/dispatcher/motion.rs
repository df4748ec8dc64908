//! Motion sub-dispatch (cursor movement).
//!
//! Delegates to the pure `core_text::motion` primitives with the column bound
//! of the current mode. Never touches text or the dirty flag.

use super::DispatchResult;
use crate::MotionKind;
use core_state::EditorState;
use core_text::{Buffer, Position, motion};

type MotionFn = fn(&Buffer, Position, bool) -> Position;

fn primitive(kind: MotionKind) -> MotionFn {
    match kind {
        MotionKind::Left => motion::left,
        MotionKind::Down => motion::down,
        MotionKind::Up => motion::up,
        MotionKind::Right => motion::right,
        MotionKind::WordForward => motion::word_forward,
        MotionKind::WordBackward => motion::word_backward,
        MotionKind::WordEnd => motion::word_end,
        MotionKind::LineStart => motion::line_start,
        MotionKind::LineEnd => motion::line_end,
        MotionKind::ParagraphBackward => motion::paragraph_backward,
        MotionKind::ParagraphForward => motion::paragraph_forward,
    }
}

pub(crate) fn handle_motion(kind: MotionKind, state: &mut EditorState) -> DispatchResult {
    let before = state.cursor;
    state.cursor = primitive(kind)(&state.buffer, before, state.past_end());
    if state.cursor == before {
        return DispatchResult::clean();
    }
    tracing::trace!(target: "actions.dispatch", ?kind, from_line = before.line, from_col = before.col, to_line = state.cursor.line, to_col = state.cursor.col, "motion");
    DispatchResult::redraw()
}
