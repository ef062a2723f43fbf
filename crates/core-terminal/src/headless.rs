//! In-memory terminal used by tests and scripted sessions.
//!
//! Keeps a byte grid, the hardware cursor, a queue of scripted input and a log
//! of every primitive operation so callers can assert both the final screen
//! and how much work it took to get there.

use crate::{TerminalBackend, TerminalCapabilities};
use anyhow::{Result, bail};
use core_events::InputEvent;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Enter,
    Leave,
    ClearRow(u16),
    Cell(u16, u16, u8),
    Scroll { rows: u16, delta: i8 },
    Cursor(u16, u16),
    Flush,
}

#[derive(Debug)]
pub struct HeadlessTerminal {
    rows: u16,
    cols: u16,
    grid: Vec<Vec<u8>>,
    cursor: (u16, u16),
    input: VecDeque<InputEvent>,
    caps: TerminalCapabilities,
    entered: bool,
    ops: Vec<Op>,
}

impl HeadlessTerminal {
    pub fn new(rows: u16, cols: u16) -> Self {
        Self {
            rows,
            cols,
            grid: vec![vec![b' '; cols as usize]; rows as usize],
            cursor: (0, 0),
            input: VecDeque::new(),
            caps: TerminalCapabilities::with_scroll_region(true),
            entered: false,
            ops: Vec::new(),
        }
    }

    pub fn with_capabilities(mut self, caps: TerminalCapabilities) -> Self {
        self.caps = caps;
        self
    }

    pub fn push_input(&mut self, ev: InputEvent) {
        self.input.push_back(ev);
    }

    pub fn extend_input<I: IntoIterator<Item = InputEvent>>(&mut self, evs: I) {
        self.input.extend(evs);
    }

    /// Row contents with trailing blanks trimmed.
    pub fn row_text(&self, row: u16) -> String {
        let bytes = &self.grid[row as usize];
        let end = bytes.iter().rposition(|b| *b != b' ').map_or(0, |i| i + 1);
        String::from_utf8_lossy(&bytes[..end]).into_owned()
    }

    pub fn screen(&self) -> Vec<String> {
        (0..self.rows).map(|r| self.row_text(r)).collect()
    }

    pub fn cursor(&self) -> (u16, u16) {
        self.cursor
    }

    pub fn is_entered(&self) -> bool {
        self.entered
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    /// Return and forget the operations recorded so far.
    pub fn take_ops(&mut self) -> Vec<Op> {
        std::mem::take(&mut self.ops)
    }

    /// Change the screen size, blanking the grid. A scripted
    /// `InputEvent::Resize` does the same when it is read.
    pub fn resize(&mut self, rows: u16, cols: u16) {
        self.rows = rows;
        self.cols = cols;
        self.grid = vec![vec![b' '; cols as usize]; rows as usize];
    }
}

impl TerminalBackend for HeadlessTerminal {
    fn enter(&mut self) -> Result<()> {
        self.entered = true;
        self.ops.push(Op::Enter);
        Ok(())
    }

    fn leave(&mut self) -> Result<()> {
        if self.entered {
            self.entered = false;
            self.ops.push(Op::Leave);
        }
        Ok(())
    }

    fn set_title(&mut self, _title: &str) -> Result<()> {
        Ok(())
    }

    fn capabilities(&self) -> TerminalCapabilities {
        self.caps
    }

    fn dimensions(&self) -> Result<(u16, u16)> {
        Ok((self.rows, self.cols))
    }

    fn read_event(&mut self) -> Result<InputEvent> {
        match self.input.pop_front() {
            Some(InputEvent::Resize(cols, rows)) => {
                self.resize(rows, cols);
                Ok(InputEvent::Resize(cols, rows))
            }
            Some(ev) => Ok(ev),
            None => bail!("scripted input exhausted"),
        }
    }

    fn set_cursor(&mut self, row: u16, col: u16) -> Result<()> {
        self.cursor = (
            row.min(self.rows.saturating_sub(1)),
            col.min(self.cols.saturating_sub(1)),
        );
        self.ops.push(Op::Cursor(row, col));
        Ok(())
    }

    fn draw_cell(&mut self, row: u16, col: u16, byte: u8) -> Result<()> {
        if row < self.rows && col < self.cols {
            self.grid[row as usize][col as usize] = byte;
        }
        self.ops.push(Op::Cell(row, col, byte));
        Ok(())
    }

    fn clear_row(&mut self, row: u16) -> Result<()> {
        if let Some(r) = self.grid.get_mut(row as usize) {
            r.fill(b' ');
        }
        self.ops.push(Op::ClearRow(row));
        Ok(())
    }

    fn scroll_region(&mut self, rows: u16, delta: i8) -> Result<()> {
        let rows = (rows as usize).min(self.grid.len());
        if rows > 0 {
            let blank = vec![b' '; self.cols as usize];
            let region = &mut self.grid[..rows];
            if delta > 0 {
                region.rotate_left(1);
                region[rows - 1] = blank;
            } else if delta < 0 {
                region.rotate_right(1);
                region[0] = blank;
            }
        }
        self.ops.push(Op::Scroll {
            rows: rows as u16,
            delta,
        });
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.ops.push(Op::Flush);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_events::{KeyEvent, KeyCode};

    fn paint(t: &mut HeadlessTerminal, row: u16, text: &str) {
        t.clear_row(row).unwrap();
        for (i, b) in text.bytes().enumerate() {
            t.draw_cell(row, i as u16, b).unwrap();
        }
    }

    #[test]
    fn scroll_up_region_keeps_rows_below() {
        let mut t = HeadlessTerminal::new(4, 10);
        paint(&mut t, 0, "a");
        paint(&mut t, 1, "b");
        paint(&mut t, 2, "c");
        paint(&mut t, 3, "status");
        t.scroll_region(3, 1).unwrap();
        assert_eq!(t.screen(), vec!["b", "c", "", "status"]);
        t.scroll_region(3, -1).unwrap();
        assert_eq!(t.screen(), vec!["", "b", "c", "status"]);
    }

    #[test]
    fn scripted_input_drains_then_errors() {
        let mut t = HeadlessTerminal::new(2, 2);
        t.push_input(InputEvent::Key(KeyEvent::plain(KeyCode::Up)));
        assert!(t.read_event().is_ok());
        assert!(t.read_event().is_err());
    }

    #[test]
    fn cursor_is_clamped_to_screen() {
        let mut t = HeadlessTerminal::new(3, 5);
        t.set_cursor(1, 9).unwrap();
        assert_eq!(t.cursor(), (1, 4));
    }
}
