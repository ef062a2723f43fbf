//! Two-state key dispatcher.
//!
//! | State         | Key                      | Effect                              | Next          |
//! |---------------|--------------------------|-------------------------------------|---------------|
//! | Normal        | prefix                   | none                                | PendingPrefix |
//! | Normal        | interrupt                | quit without saving                 | -             |
//! | Normal        | motion                   | navigate                            | Normal        |
//! | Normal        | printable (writable)     | insert, set dirty                   | Normal        |
//! | Normal        | printable (read-only)    | status message only                 | Normal        |
//! | PendingPrefix | quit                     | quit without saving                 | -             |
//! | PendingPrefix | save                     | write if dirty, clear dirty on success | Normal     |
//! | PendingPrefix | anything else            | ignored                             | Normal        |
//!
//! The status message set by one key is cleared by the next.

use crate::io_ops::DocumentSink;
use core_events::KeyEvent;
use core_keymap::{Keymap, NormalBinding, PrefixedBinding};
use core_state::{EditorState, ScrollDelta};
use tracing::{debug, info, trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchState {
    #[default]
    Normal,
    PendingPrefix,
}

/// What a single key changed; drives render marks and loop exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchResult {
    pub quit: bool,
    /// Quit came from the interrupt key rather than the prefixed quit.
    pub interrupted: bool,
    pub scroll: ScrollDelta,
    /// Buffer line whose bytes changed.
    pub edited_line: Option<usize>,
    /// Status row content (message, dirty marker) may differ.
    pub status_changed: bool,
    /// Bytes written by a successful save.
    pub saved: Option<usize>,
}

impl DispatchResult {
    pub fn clean() -> Self {
        Self::default()
    }

    pub fn quit() -> Self {
        Self {
            quit: true,
            ..Self::default()
        }
    }

    pub fn interrupted() -> Self {
        Self {
            quit: true,
            interrupted: true,
            ..Self::default()
        }
    }

    pub fn scrolled(scroll: ScrollDelta) -> Self {
        Self {
            scroll,
            ..Self::default()
        }
    }

    pub fn edited(line: usize) -> Self {
        Self {
            edited_line: Some(line),
            status_changed: true,
            ..Self::default()
        }
    }
}

#[derive(Debug)]
pub struct Dispatcher {
    keymap: Keymap,
    state: DispatchState,
}

impl Dispatcher {
    pub fn new(keymap: Keymap) -> Self {
        Self {
            keymap,
            state: DispatchState::Normal,
        }
    }

    pub fn state(&self) -> DispatchState {
        self.state
    }

    pub fn dispatch<S: DocumentSink + ?Sized>(
        &mut self,
        key: &KeyEvent,
        editor: &mut EditorState<'_>,
        sink: &mut S,
    ) -> DispatchResult {
        let had_message = editor.clear_message();
        let mut result = match self.state {
            DispatchState::Normal => self.dispatch_normal(key, editor),
            DispatchState::PendingPrefix => {
                self.state = DispatchState::Normal;
                self.dispatch_prefixed(key, editor, sink)
            }
        };
        result.status_changed |= had_message;
        result
    }

    fn dispatch_normal(&mut self, key: &KeyEvent, editor: &mut EditorState<'_>) -> DispatchResult {
        match self.keymap.resolve_normal(key) {
            Some(NormalBinding::Prefix) => {
                trace!(target: "actions.dispatch", key = %key, "prefix_pending");
                self.state = DispatchState::PendingPrefix;
                DispatchResult::clean()
            }
            Some(NormalBinding::Interrupt) => {
                info!(target: "actions.dispatch", dirty = editor.dirty, "interrupt_quit");
                DispatchResult::interrupted()
            }
            Some(NormalBinding::Motion(m)) => DispatchResult::scrolled(editor.navigate(m)),
            None => match key.printable_byte() {
                Some(ch) if editor.is_writable() => DispatchResult::edited(editor.insert_at_cursor(ch)),
                Some(_) => {
                    editor.set_info("File is read-only");
                    DispatchResult {
                        status_changed: true,
                        ..DispatchResult::clean()
                    }
                }
                None => {
                    trace!(target: "actions.dispatch", key = %key, "unbound_key");
                    DispatchResult::clean()
                }
            },
        }
    }

    fn dispatch_prefixed<S: DocumentSink + ?Sized>(
        &mut self,
        key: &KeyEvent,
        editor: &mut EditorState<'_>,
        sink: &mut S,
    ) -> DispatchResult {
        match self.keymap.resolve_prefixed(key) {
            Some(PrefixedBinding::Quit) => {
                info!(target: "actions.dispatch", dirty = editor.dirty, "quit");
                DispatchResult::quit()
            }
            Some(PrefixedBinding::Save) => save(editor, sink),
            None => {
                trace!(target: "actions.dispatch", key = %key, "prefix_cancelled");
                DispatchResult::clean()
            }
        }
    }
}

/// Serialize and write the document if it has unsaved insertions.
fn save<S: DocumentSink + ?Sized>(editor: &mut EditorState<'_>, sink: &mut S) -> DispatchResult {
    if !editor.dirty {
        debug!(target: "io", "save_skipped_clean");
        return DispatchResult::clean();
    }
    let bytes = editor.store.serialize();
    match sink.write_document(&bytes) {
        Ok(()) => {
            editor.dirty = false;
            editor.set_info(format!("Wrote {} bytes", bytes.len()));
            info!(
                target: "io",
                bytes = bytes.len(),
                lines = editor.store.line_count(),
                owned = editor.store.owned_count(),
                "file_saved"
            );
            DispatchResult {
                status_changed: true,
                saved: Some(bytes.len()),
                ..DispatchResult::clean()
            }
        }
        Err(e) => {
            warn!(target: "io", error = %e, "save_failed");
            editor.set_error(format!("Write failed: {e}"));
            DispatchResult {
                status_changed: true,
                ..DispatchResult::clean()
            }
        }
    }
}
