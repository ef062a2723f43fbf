//! Key bindings: decoded `KeyEvent`s to editor commands.
//!
//! Two layers mirror the dispatcher's two states. The normal layer maps keys
//! to motions, the prefix key and the interrupt key; the prefixed layer maps
//! the key that follows the prefix to quit or save. Printable keys with no
//! binding fall through to insertion in the dispatcher.
//!
//! Bindings are written as short specs (`"C-x"`, `"M-f"`, `"Up"`, `"a"`) so
//! the config file can override the prefix, quit, save and interrupt keys.
//! Later bindings override earlier ones for the same key.

use core_events::{KeyCode, KeyEvent, KeyModifiers};
use core_state::Motion;
use std::collections::HashMap;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NormalBinding {
    Motion(Motion),
    Prefix,
    /// Leave immediately without saving.
    Interrupt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrefixedBinding {
    Quit,
    Save,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeySpecError {
    #[error("empty key spec")]
    Empty,
    #[error("unknown key `{0}`")]
    UnknownKey(String),
    #[error("unknown modifier `{0}` in `{1}`")]
    UnknownModifier(String, String),
}

/// Parse a key spec such as `C-x`, `M-a`, `C-M-q`, `Up`, `Home` or a single character.
pub fn parse_key(spec: &str) -> Result<KeyEvent, KeySpecError> {
    let spec = spec.trim();
    if spec.is_empty() {
        return Err(KeySpecError::Empty);
    }
    let mut mods = KeyModifiers::empty();
    let mut rest = spec;
    // A trailing `-` is the key itself (e.g. `C--`), so only split while more follows.
    while let Some((head, tail)) = rest.split_once('-') {
        if tail.is_empty() {
            break;
        }
        match head {
            "C" => mods |= KeyModifiers::CTRL,
            "M" | "A" => mods |= KeyModifiers::ALT,
            "S" => mods |= KeyModifiers::SHIFT,
            other => {
                return Err(KeySpecError::UnknownModifier(
                    other.to_string(),
                    spec.to_string(),
                ));
            }
        }
        rest = tail;
    }
    let code = match rest {
        "Up" => KeyCode::Up,
        "Down" => KeyCode::Down,
        "Left" => KeyCode::Left,
        "Right" => KeyCode::Right,
        "Home" => KeyCode::Home,
        "End" => KeyCode::End,
        "Enter" => KeyCode::Enter,
        "Esc" => KeyCode::Esc,
        "Tab" => KeyCode::Tab,
        "Backspace" => KeyCode::Backspace,
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => {
                    // Ctrl chords arrive lowercase from the terminal.
                    let c = if mods.contains(KeyModifiers::CTRL) {
                        c.to_ascii_lowercase()
                    } else {
                        c
                    };
                    KeyCode::Char(c)
                }
                _ => return Err(KeySpecError::UnknownKey(other.to_string())),
            }
        }
    };
    Ok(KeyEvent::new(code, mods))
}

/// Overridable key specs; everything else uses the built-in layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeymapSpec {
    pub prefix: String,
    pub quit: String,
    pub save: String,
    /// `None` disables the interrupt binding.
    pub interrupt: Option<String>,
}

impl Default for KeymapSpec {
    fn default() -> Self {
        Self {
            prefix: "C-x".into(),
            quit: "C-c".into(),
            save: "C-s".into(),
            interrupt: Some("C-c".into()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Keymap {
    normal: HashMap<KeyEvent, NormalBinding>,
    prefixed: HashMap<KeyEvent, PrefixedBinding>,
}

impl Default for Keymap {
    fn default() -> Self {
        Self::build(&KeymapSpec::default()).unwrap_or_else(|_| Self::motions_only())
    }
}

impl Keymap {
    fn motions_only() -> Self {
        let mut normal = HashMap::new();
        for (key, motion) in baseline_motions() {
            normal.insert(key, NormalBinding::Motion(motion));
        }
        Self {
            normal,
            prefixed: HashMap::new(),
        }
    }

    /// Built-in motion layout plus the prefix/quit/save/interrupt keys from `spec`.
    pub fn build(spec: &KeymapSpec) -> Result<Self, KeySpecError> {
        let mut map = Self::motions_only();
        if let Some(interrupt) = spec.interrupt.as_deref() {
            map.bind_normal(parse_key(interrupt)?, NormalBinding::Interrupt);
        }
        map.bind_normal(parse_key(&spec.prefix)?, NormalBinding::Prefix);
        map.bind_prefixed(parse_key(&spec.quit)?, PrefixedBinding::Quit);
        map.bind_prefixed(parse_key(&spec.save)?, PrefixedBinding::Save);
        debug!(
            target: "input.keymap",
            normal = map.normal.len(),
            prefixed = map.prefixed.len(),
            prefix = %spec.prefix,
            "keymap_built"
        );
        Ok(map)
    }

    pub fn bind_normal(&mut self, key: KeyEvent, binding: NormalBinding) {
        if let Some(prev) = self.normal.insert(key, binding) {
            trace!(target: "input.keymap", key = %key, ?prev, new = ?binding, "binding_override");
        }
    }

    pub fn bind_prefixed(&mut self, key: KeyEvent, binding: PrefixedBinding) {
        if let Some(prev) = self.prefixed.insert(key, binding) {
            trace!(target: "input.keymap", key = %key, ?prev, new = ?binding, "binding_override");
        }
    }

    pub fn resolve_normal(&self, key: &KeyEvent) -> Option<NormalBinding> {
        self.normal.get(&normalize(key)).copied()
    }

    pub fn resolve_prefixed(&self, key: &KeyEvent) -> Option<PrefixedBinding> {
        self.prefixed.get(&normalize(key)).copied()
    }
}

/// Drop SHIFT on characters (already folded into the char) so `A` and `S-A` agree.
fn normalize(key: &KeyEvent) -> KeyEvent {
    match key.code {
        KeyCode::Char(c) if key.mods.contains(KeyModifiers::CTRL) => {
            KeyEvent::new(KeyCode::Char(c.to_ascii_lowercase()), key.mods - KeyModifiers::SHIFT)
        }
        KeyCode::Char(_) => KeyEvent::new(key.code, key.mods - KeyModifiers::SHIFT),
        _ => *key,
    }
}

/// Emacs-style control keys plus the arrow/Home/End equivalents.
fn baseline_motions() -> [(KeyEvent, Motion); 12] {
    [
        (KeyEvent::ctrl('p'), Motion::Up),
        (KeyEvent::ctrl('n'), Motion::Down),
        (KeyEvent::ctrl('b'), Motion::Left),
        (KeyEvent::ctrl('f'), Motion::Right),
        (KeyEvent::ctrl('a'), Motion::LineStart),
        (KeyEvent::ctrl('e'), Motion::LineEnd),
        (KeyEvent::plain(KeyCode::Up), Motion::Up),
        (KeyEvent::plain(KeyCode::Down), Motion::Down),
        (KeyEvent::plain(KeyCode::Left), Motion::Left),
        (KeyEvent::plain(KeyCode::Right), Motion::Right),
        (KeyEvent::plain(KeyCode::Home), Motion::LineStart),
        (KeyEvent::plain(KeyCode::End), Motion::LineEnd),
    ]
}
