//! Physical key -> `Action` translation.
//!
//! Stateless: the only multi-key command (`dd`) is tracked by the pending
//! slot on `EditorState`, so the translator emits `LineDeletePrefix` for
//! every `d` and lets the dispatcher pair them.

use crate::{Action, EditKind, ModeChange, MotionKind};
use core_events::{KeyCode, KeyEvent, KeyModifiers};
use core_state::Mode;

/// Map a key to an action for `mode`. `None` means the key is unbound.
pub fn translate_key(mode: Mode, key: &KeyEvent) -> Option<Action> {
    tracing::trace!(target: "actions.translate", ?mode, key = ?key.code, ctrl = key.mods.contains(KeyModifiers::CTRL), "translate_key_attempt");
    if key.mods.contains(KeyModifiers::CTRL) {
        return translate_ctrl(mode, key.code);
    }
    if let Some(action) = translate_named(key.code) {
        return Some(action);
    }
    match (mode, key.code) {
        (Mode::Normal, KeyCode::Char(c)) => Some(normal_char(c)),
        (Mode::Normal, KeyCode::Esc) => Some(Action::ModeChange(ModeChange::Exit)),
        (Mode::Normal, _) => None,
        (Mode::Insert, KeyCode::Char(c)) if key.mods.contains(KeyModifiers::ALT) || c.is_control() => {
            None
        }
        (Mode::Insert, KeyCode::Char(c)) => Some(Action::Char(c)),
        (Mode::Insert, KeyCode::Esc) => Some(Action::ModeChange(ModeChange::Exit)),
        (Mode::Insert, KeyCode::Enter) => Some(Action::Edit(EditKind::Enter)),
        (Mode::Insert, KeyCode::Backspace) => Some(Action::Edit(EditKind::Backspace)),
        (Mode::Insert, KeyCode::Tab) => Some(Action::Char('\t')),
        (Mode::Insert, _) => None,
    }
}

/// Keys with the same meaning in every mode.
fn translate_named(code: KeyCode) -> Option<Action> {
    let action = match code {
        KeyCode::Left => Action::Motion(MotionKind::Left),
        KeyCode::Right => Action::Motion(MotionKind::Right),
        KeyCode::Up => Action::Motion(MotionKind::Up),
        KeyCode::Down => Action::Motion(MotionKind::Down),
        KeyCode::Home => Action::Motion(MotionKind::LineStart),
        KeyCode::End => Action::Motion(MotionKind::LineEnd),
        KeyCode::Delete => Action::Edit(EditKind::DeleteCharForward),
        _ => return None,
    };
    Some(action)
}

fn translate_ctrl(mode: Mode, code: KeyCode) -> Option<Action> {
    match (mode, code) {
        (_, KeyCode::Char('s')) => Some(Action::Save),
        (Mode::Insert, KeyCode::Char(' ')) => Some(Action::ModeChange(ModeChange::Exit)),
        _ => None,
    }
}

fn normal_char(c: char) -> Action {
    match c {
        'h' => Action::Motion(MotionKind::Left),
        'j' => Action::Motion(MotionKind::Down),
        'k' => Action::Motion(MotionKind::Up),
        'l' => Action::Motion(MotionKind::Right),
        'w' => Action::Motion(MotionKind::WordForward),
        'b' => Action::Motion(MotionKind::WordBackward),
        'e' => Action::Motion(MotionKind::WordEnd),
        '0' => Action::Motion(MotionKind::LineStart),
        '$' => Action::Motion(MotionKind::LineEnd),
        '{' => Action::Motion(MotionKind::ParagraphBackward),
        '}' => Action::Motion(MotionKind::ParagraphForward),
        'x' => Action::Edit(EditKind::DeleteChar),
        'd' => Action::LineDeletePrefix,
        'i' => Action::ModeChange(ModeChange::InsertBefore),
        'I' => Action::ModeChange(ModeChange::InsertLineStart),
        'a' => Action::ModeChange(ModeChange::AppendAfter),
        'A' => Action::ModeChange(ModeChange::AppendLineEnd),
        'o' => Action::ModeChange(ModeChange::OpenLineBelow),
        'O' => Action::ModeChange(ModeChange::OpenLineAbove),
        'q' => Action::Quit,
        's' => Action::Save,
        other => Action::Char(other),
    }
}
