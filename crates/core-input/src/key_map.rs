use core_events::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::event::{
    KeyCode as CKeyCode, KeyEvent as CKeyEvent, KeyEventKind as CKeyEventKind,
    KeyModifiers as CKeyModifiers,
};

/// Map a crossterm key event to a physical `KeyEvent`.
///
/// Returns `None` for releases and for keys the editor has no binding for
/// (function keys, media keys, bare modifiers).
pub(crate) fn map_key_event(event: &CKeyEvent) -> Option<KeyEvent> {
    if !matches!(event.kind, CKeyEventKind::Press | CKeyEventKind::Repeat) {
        return None;
    }
    let code = map_key_code(&event.code)?;
    Some(KeyEvent::new(code, map_mods(event.modifiers)))
}

fn map_key_code(code: &CKeyCode) -> Option<KeyCode> {
    let code = match code {
        CKeyCode::Char(c) => KeyCode::Char(*c),
        CKeyCode::Enter => KeyCode::Enter,
        CKeyCode::Esc => KeyCode::Esc,
        CKeyCode::Backspace => KeyCode::Backspace,
        CKeyCode::Delete => KeyCode::Delete,
        CKeyCode::Tab => KeyCode::Tab,
        CKeyCode::Up => KeyCode::Up,
        CKeyCode::Down => KeyCode::Down,
        CKeyCode::Left => KeyCode::Left,
        CKeyCode::Right => KeyCode::Right,
        CKeyCode::Home => KeyCode::Home,
        CKeyCode::End => KeyCode::End,
        _ => return None,
    };
    Some(code)
}

pub(crate) fn map_mods(mods: CKeyModifiers) -> KeyModifiers {
    let mut out = KeyModifiers::empty();
    if mods.contains(CKeyModifiers::CONTROL) {
        out |= KeyModifiers::CTRL;
    }
    if mods.contains(CKeyModifiers::ALT) {
        out |= KeyModifiers::ALT;
    }
    if mods.contains(CKeyModifiers::SHIFT) {
        out |= KeyModifiers::SHIFT;
    }
    out
}

/// Ctrl-C is reported as its own event so the runtime can quit from any mode.
pub(crate) fn is_ctrl_c(event: &CKeyEvent) -> bool {
    matches!(event.code, CKeyCode::Char('c')) && event.modifiers.contains(CKeyModifiers::CONTROL)
}
