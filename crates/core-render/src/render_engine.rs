//! Applies scheduler decisions to a [`TerminalBackend`].
//!
//! Row-granular policy:
//! - `Initial`: paint visible rows from the top, stopping after the last line.
//! - `Full`: clear and repaint every text row.
//! - `Scroll(Up)`: shift the text region down one row, repaint the new top row.
//! - `Scroll(Down)`: shift the text region up one row, repaint the new bottom
//!   row if a line backs it (otherwise the exposed row stays blank).
//! - `Line(l)`: repaint the screen row showing buffer line `l`.
//!
//! The scroll region always excludes the status row, which is repainted only
//! when its text changes. Every frame ends with cursor placement and a flush.

use crate::partial_metrics::{RenderPathMetrics, RenderPathMetricsSnapshot};
use crate::scheduler::{RenderDelta, RenderScheduler};
use crate::status::build_status;
use anyhow::Result;
use core_state::{EditorState, ScrollDelta};
use core_terminal::{TerminalBackend, TerminalCapabilities};
use core_text::LineSlot;

/// Byte shown for a buffer byte; one cell per byte.
pub fn display_byte(b: u8) -> u8 {
    match b {
        b'\t' => b' ',
        0x20..=0x7e => b,
        _ => b'?',
    }
}

pub struct RenderEngine {
    capabilities: TerminalCapabilities,
    scheduler: RenderScheduler,
    metrics: RenderPathMetrics,
    prev_status: Option<String>,
    last_repaint_rows: Vec<u16>,
    last_repaint_kind: Option<&'static str>,
}

impl RenderEngine {
    pub fn new(capabilities: TerminalCapabilities) -> Self {
        Self {
            capabilities,
            scheduler: RenderScheduler::new(),
            metrics: RenderPathMetrics::default(),
            prev_status: None,
            last_repaint_rows: Vec::new(),
            last_repaint_kind: None,
        }
    }

    pub fn mark(&mut self, delta: RenderDelta) {
        self.scheduler.mark(delta);
    }

    /// Forget the cached status text so the next frame repaints it.
    pub fn invalidate_status(&mut self) {
        self.prev_status = None;
    }

    pub fn metrics(&self) -> RenderPathMetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Text rows repainted by the most recent frame.
    pub fn last_repaint_rows(&self) -> &[u16] {
        &self.last_repaint_rows
    }

    pub fn last_repaint_kind(&self) -> Option<&'static str> {
        self.last_repaint_kind
    }

    /// Consume pending marks and bring the terminal in sync with `state`.
    pub fn render<B: TerminalBackend>(&mut self, term: &mut B, state: &EditorState<'_>) -> Result<()> {
        let decision = self
            .scheduler
            .consume(self.capabilities.supports_scroll_region);
        self.last_repaint_rows.clear();
        let height = state.view.viewport.height;
        let top = state.view.viewport.top;
        match decision.effective {
            RenderDelta::Initial => {
                self.last_repaint_kind = Some("initial");
                RenderPathMetrics::bump(&self.metrics.initial_frames, 1);
                let rows = height.min(state.store.line_count().saturating_sub(top));
                for row in 0..rows {
                    self.repaint_row(term, state, row as u16)?;
                }
            }
            RenderDelta::Full => {
                self.last_repaint_kind = Some("full");
                RenderPathMetrics::bump(&self.metrics.full_frames, 1);
                if matches!(decision.semantic, RenderDelta::Scroll(_)) {
                    RenderPathMetrics::bump(&self.metrics.scroll_shift_degraded_full, 1);
                }
                for row in 0..height {
                    self.repaint_row(term, state, row as u16)?;
                }
            }
            RenderDelta::Scroll(delta) => {
                self.last_repaint_kind = Some("scroll_shift");
                RenderPathMetrics::bump(&self.metrics.scroll_region_shifts, 1);
                term.scroll_region(height as u16, delta.rows())?;
                match delta {
                    ScrollDelta::Up => self.repaint_row(term, state, 0)?,
                    ScrollDelta::Down => {
                        if top + height - 1 < state.store.line_count() {
                            self.repaint_row(term, state, (height - 1) as u16)?;
                        }
                    }
                    ScrollDelta::None => {}
                }
            }
            RenderDelta::Line(line) => {
                self.last_repaint_kind = Some("line");
                if state.view.viewport.contains(line) {
                    RenderPathMetrics::bump(&self.metrics.line_frames, 1);
                    self.repaint_row(term, state, (line - top) as u16)?;
                }
            }
            RenderDelta::StatusLine | RenderDelta::CursorOnly => {
                self.last_repaint_kind = Some("cursor_only");
            }
        }
        tracing::trace!(
            target: "render",
            semantic = ?decision.semantic,
            effective = ?decision.effective,
            rows = self.last_repaint_rows.len(),
            "frame"
        );
        self.paint_status(term, state)?;
        let pos = state.view.screen_position();
        term.set_cursor(pos.row as u16, pos.col as u16)?;
        term.flush()
    }

    fn repaint_row<B: TerminalBackend>(
        &mut self,
        term: &mut B,
        state: &EditorState<'_>,
        row: u16,
    ) -> Result<()> {
        term.clear_row(row)?;
        let index = state.view.viewport.top + row as usize;
        if let LineSlot::Line(bytes) = state.store.get(index) {
            let width = state.view.viewport.width;
            for (col, b) in bytes.iter().take(width).enumerate() {
                term.draw_cell(row, col as u16, display_byte(*b))?;
            }
        }
        self.last_repaint_rows.push(row);
        RenderPathMetrics::bump(&self.metrics.rows_repainted, 1);
        Ok(())
    }

    fn paint_status<B: TerminalBackend>(&mut self, term: &mut B, state: &EditorState<'_>) -> Result<()> {
        let text = build_status(state, state.view.viewport.width);
        if self.prev_status.as_deref() == Some(text.as_str()) {
            RenderPathMetrics::bump(&self.metrics.status_skipped, 1);
            return Ok(());
        }
        let row = state.view.viewport.height as u16;
        let (rows, _) = term.dimensions()?;
        if row >= rows {
            // No room below the text area.
            return Ok(());
        }
        term.clear_row(row)?;
        for (col, b) in text.bytes().enumerate() {
            term.draw_cell(row, col as u16, display_byte(b))?;
        }
        RenderPathMetrics::bump(&self.metrics.status_repaints, 1);
        self.prev_status = Some(text);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_state::{Access, Motion, ViewState};
    use core_terminal::HeadlessTerminal;
    use core_text::LineStore;
    use std::path::PathBuf;

    fn state(content: &[u8], height: usize, width: usize) -> EditorState<'_> {
        EditorState::new(
            LineStore::load(content),
            PathBuf::from("t.txt"),
            Access::ReadWrite,
            ViewState::new(height, width),
        )
    }

    #[test]
    fn display_byte_maps_controls() {
        assert_eq!(display_byte(b'a'), b'a');
        assert_eq!(display_byte(b'\t'), b' ');
        assert_eq!(display_byte(0x07), b'?');
        assert_eq!(display_byte(0xc3), b'?');
    }

    #[test]
    fn initial_paint_stops_at_last_line() {
        let content = b"one\ntwo\n".to_vec();
        let st = state(&content, 4, 10);
        let mut term = HeadlessTerminal::new(5, 10);
        let mut eng = RenderEngine::new(TerminalCapabilities::with_scroll_region(true));
        eng.mark(RenderDelta::Initial);
        eng.render(&mut term, &st).unwrap();
        assert_eq!(eng.last_repaint_rows(), &[0, 1]);
        assert_eq!(term.row_text(0), "one");
        assert_eq!(term.row_text(1), "two");
        assert_eq!(term.row_text(4), "t.txt  1:1");
        assert_eq!(term.cursor(), (0, 0));
    }

    #[test]
    fn long_lines_are_cut_at_width() {
        let content = b"abcdefgh\n".to_vec();
        let st = state(&content, 1, 4);
        let mut term = HeadlessTerminal::new(2, 4);
        let mut eng = RenderEngine::new(TerminalCapabilities::with_scroll_region(true));
        eng.mark(RenderDelta::Initial);
        eng.render(&mut term, &st).unwrap();
        assert_eq!(term.row_text(0), "abcd");
    }

    #[test]
    fn unchanged_status_is_skipped() {
        let content = b"a\nb\n".to_vec();
        let mut st = state(&content, 2, 10);
        let mut term = HeadlessTerminal::new(3, 10);
        let mut eng = RenderEngine::new(TerminalCapabilities::with_scroll_region(true));
        eng.mark(RenderDelta::Initial);
        eng.render(&mut term, &st).unwrap();
        st.navigate(Motion::Right);
        eng.render(&mut term, &st).unwrap();
        st.navigate(Motion::Right);
        eng.render(&mut term, &st).unwrap();
        let m = eng.metrics();
        assert_eq!(m.status_repaints, 2);
        assert_eq!(m.status_skipped, 1);
        assert_eq!(term.row_text(2), "t.txt  1:2");
    }

    #[test]
    fn single_row_terminal_keeps_text_row() {
        let content = b"ab
cd
".to_vec();
        let st = state(&content, 1, 10);
        let mut term = HeadlessTerminal::new(1, 10);
        let mut eng = RenderEngine::new(TerminalCapabilities::with_scroll_region(true));
        eng.mark(RenderDelta::Initial);
        eng.render(&mut term, &st).unwrap();
        assert_eq!(term.screen(), vec!["ab"]);
        assert_eq!(eng.metrics().status_repaints, 0);
        assert_eq!(term.cursor(), (0, 0));
    }
}
