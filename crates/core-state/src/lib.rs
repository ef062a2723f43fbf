//! Editor state: line store, cursor/viewport, dirty flag and status message.
//!
//! `EditorState` is owned by the event loop and passed by `&mut` into the
//! dispatcher; nothing else holds a writable reference. Navigation itself is
//! pure (see [`motion`]); the state only records the returned view.

use core_text::LineStore;
use std::path::PathBuf;

pub mod motion;
pub mod view;

pub use motion::{Motion, Navigation};
pub use view::{Cursor, ScreenPosition, ScrollDelta, ViewState, Viewport};

/// Whether insertions are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    ReadWrite,
    ReadOnly,
}

/// Severity of a status line message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: MessageKind,
    pub text: String,
}

pub struct EditorState<'a> {
    pub store: LineStore<'a>,
    pub view: ViewState,
    pub file_name: PathBuf,
    pub access: Access,
    /// Unsaved insertions exist.
    pub dirty: bool,
    /// Shown on the status row until the next key is handled.
    pub message: Option<StatusMessage>,
}

impl<'a> EditorState<'a> {
    pub fn new(store: LineStore<'a>, file_name: PathBuf, access: Access, view: ViewState) -> Self {
        Self {
            store,
            view,
            file_name,
            access,
            dirty: false,
            message: None,
        }
    }

    pub fn is_writable(&self) -> bool {
        matches!(self.access, Access::ReadWrite)
    }

    pub fn set_info<S: Into<String>>(&mut self, text: S) {
        self.message = Some(StatusMessage {
            kind: MessageKind::Info,
            text: text.into(),
        });
    }

    pub fn set_error<S: Into<String>>(&mut self, text: S) {
        self.message = Some(StatusMessage {
            kind: MessageKind::Error,
            text: text.into(),
        });
    }

    /// Drop the current message; returns true if one was present.
    pub fn clear_message(&mut self) -> bool {
        self.message.take().is_some()
    }

    /// Run a motion and record the resulting view.
    pub fn navigate(&mut self, m: Motion) -> ScrollDelta {
        let before = self.view;
        let nav = motion::apply(m, self.view, &self.store);
        self.view = nav.view;
        if before != nav.view {
            tracing::trace!(
                target: "state.motion",
                motion = ?m,
                line = before.cursor.line,
                column = before.cursor.column,
                to_line = nav.view.cursor.line,
                to_column = nav.view.cursor.column,
                top = nav.view.viewport.top,
                scroll = nav.scroll.rows(),
                "motion"
            );
        }
        nav.scroll
    }

    /// Insert `ch` at the cursor and advance the column; returns the edited line.
    ///
    /// Callers check `is_writable` first.
    pub fn insert_at_cursor(&mut self, ch: u8) -> usize {
        let Cursor { line, column } = self.view.cursor;
        let line = line.min(self.store.line_count());
        let column = column.min(self.store.line_len(line));
        let appended = line == self.store.line_count();
        self.store.insert_char(line, column, ch);
        self.view.cursor = Cursor::new(line, column + 1);
        self.dirty = true;
        tracing::trace!(target: "state.edit", line, column, appended, "insert_char");
        line
    }

    pub fn resize(&mut self, height: usize, width: usize) {
        self.view = self.view.resize(height, width, self.store.line_count());
    }
}
