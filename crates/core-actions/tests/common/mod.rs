#![allow(dead_code)] // Shared across integration tests; each test binary uses a subset of helpers.

use core_actions::{DispatchResult, handle_key};
use core_events::{KeyCode, KeyEvent, KeyModifiers};
use core_state::EditorState;

/// One physical keystroke in a replayed sequence.
#[derive(Clone, Copy, Debug)]
pub enum Stroke {
    Char(char),
    Ctrl(char),
    Key(KeyCode),
}

impl Stroke {
    pub fn to_event(self) -> KeyEvent {
        match self {
            Stroke::Char(c) => KeyEvent::plain(KeyCode::Char(c)),
            Stroke::Ctrl(c) => KeyEvent::new(KeyCode::Char(c), KeyModifiers::CTRL),
            Stroke::Key(code) => KeyEvent::plain(code),
        }
    }
}

/// Strokes for every char of `s`, typed literally.
pub fn typed(s: &str) -> Vec<Stroke> {
    s.chars().map(Stroke::Char).collect()
}

pub fn state(lines: &[&str]) -> EditorState {
    EditorState::from_lines(lines.iter().copied())
}

/// Feed strokes through the translator and dispatcher, stopping at a quit.
/// Returns the last dispatch result.
pub fn replay(state: &mut EditorState, keys: &[Stroke]) -> DispatchResult {
    let mut last = DispatchResult::clean();
    for stroke in keys {
        last = handle_key(state, &stroke.to_event());
        assert!(state.invariants_hold(), "invariants broken after {stroke:?}");
        if last.quit {
            break;
        }
    }
    last
}
