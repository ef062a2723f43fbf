//! Translation of crossterm events into `core_events` input.

use core_events::{InputEvent, KeyCode, KeyEvent, KeyModifiers};
use crossterm::event::{
    Event as CEvent, KeyCode as CCode, KeyEvent as CKeyEvent, KeyEventKind, KeyModifiers as CMods,
};

/// Map a raw crossterm event; `None` for events the editor ignores
/// (key releases, mouse, focus, paste, unsupported keys).
pub fn map_event(ev: CEvent) -> Option<InputEvent> {
    match ev {
        CEvent::Key(key) => map_key(key).map(InputEvent::Key),
        CEvent::Resize(w, h) => Some(InputEvent::Resize(w, h)),
        _ => None,
    }
}

pub fn map_key(key: CKeyEvent) -> Option<KeyEvent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let code = match key.code {
        CCode::Char(c) => KeyCode::Char(c),
        CCode::Enter => KeyCode::Enter,
        CCode::Esc => KeyCode::Esc,
        CCode::Backspace => KeyCode::Backspace,
        CCode::Tab => KeyCode::Tab,
        CCode::Up => KeyCode::Up,
        CCode::Down => KeyCode::Down,
        CCode::Left => KeyCode::Left,
        CCode::Right => KeyCode::Right,
        CCode::Home => KeyCode::Home,
        CCode::End => KeyCode::End,
        _ => return None,
    };
    Some(KeyEvent::new(code, map_mods(key.modifiers)))
}

pub(crate) fn map_mods(m: CMods) -> KeyModifiers {
    let mut out = KeyModifiers::empty();
    if m.contains(CMods::CONTROL) {
        out |= KeyModifiers::CTRL;
    }
    if m.contains(CMods::ALT) {
        out |= KeyModifiers::ALT;
    }
    if m.contains(CMods::SHIFT) {
        out |= KeyModifiers::SHIFT;
    }
    out
}
