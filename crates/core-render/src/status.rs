//! Status row composition.
//!
//! Format: `<name>[ [RO]][ [+]]  <line>:<col>[  <message>]` with 1-based
//! line and column. Two stages: `compose_status` yields ordered segments and
//! `format_status` renders them, truncated to the terminal width.

use core_state::{Access, EditorState, MessageKind};
use std::borrow::Cow;
use std::path::Path;

/// Everything the status row depends on.
pub struct StatusContext<'a> {
    pub file_name: &'a Path,
    pub read_only: bool,
    pub dirty: bool,
    /// 0-based cursor line.
    pub line: usize,
    /// 0-based cursor column.
    pub col: usize,
    pub message: Option<(&'a str, MessageKind)>,
}

impl<'a> StatusContext<'a> {
    pub fn from_state(state: &'a EditorState<'_>) -> Self {
        Self {
            file_name: &state.file_name,
            read_only: matches!(state.access, Access::ReadOnly),
            dirty: state.dirty,
            line: state.view.cursor.line,
            col: state.view.cursor.column,
            message: state.message.as_ref().map(|m| (m.text.as_str(), m.kind)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusSegment<'a> {
    FileName(Cow<'a, str>),
    ReadOnly,
    Dirty,
    Position { line_1: usize, col_1: usize },
    Message(&'a str, MessageKind),
}

pub fn compose_status<'a>(ctx: &'a StatusContext<'a>) -> Vec<StatusSegment<'a>> {
    let name = ctx
        .file_name
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_else(|| ctx.file_name.to_string_lossy());
    let mut out = Vec::with_capacity(5);
    out.push(StatusSegment::FileName(name));
    if ctx.read_only {
        out.push(StatusSegment::ReadOnly);
    }
    if ctx.dirty {
        out.push(StatusSegment::Dirty);
    }
    out.push(StatusSegment::Position {
        line_1: ctx.line + 1,
        col_1: ctx.col + 1,
    });
    if let Some((text, kind)) = ctx.message {
        out.push(StatusSegment::Message(text, kind));
    }
    out
}

/// Render segments into at most `width` columns.
pub fn format_status(segments: &[StatusSegment<'_>], width: usize) -> String {
    let mut s = String::with_capacity(48);
    for seg in segments {
        match seg {
            StatusSegment::FileName(name) => s.push_str(name),
            StatusSegment::ReadOnly => s.push_str(" [RO]"),
            StatusSegment::Dirty => s.push_str(" [+]"),
            StatusSegment::Position { line_1, col_1 } => {
                s.push_str(&format!("  {line_1}:{col_1}"));
            }
            StatusSegment::Message(text, MessageKind::Info) => {
                s.push_str("  ");
                s.push_str(text);
            }
            StatusSegment::Message(text, MessageKind::Error) => {
                s.push_str("  ! ");
                s.push_str(text);
            }
        }
    }
    if let Some((idx, _)) = s.char_indices().nth(width) {
        s.truncate(idx);
    }
    s
}

/// Compose and format in one step.
pub fn build_status(state: &EditorState<'_>, width: usize) -> String {
    let ctx = StatusContext::from_state(state);
    format_status(&compose_status(&ctx), width)
}
