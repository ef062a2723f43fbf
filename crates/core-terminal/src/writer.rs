//! Batched terminal command queue.
//!
//! Cells drawn left-to-right on one row coalesce into a single `Print`, so a
//! full row repaint costs one cursor move and one print rather than one pair
//! per cell. Commands keep their order and nothing reaches the terminal until
//! `flush`.
//!
//! Invariants:
//! * Positions are absolute with a (0,0) origin; callers keep them in bounds.
//! * A pending run is closed by any non-contiguous cell or other command.

use anyhow::Result;
use crossterm::{
    cursor::MoveTo,
    queue,
    style::Print,
    terminal::{Clear, ClearType, ScrollDown, ScrollUp},
};
use std::io::Write;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    MoveTo(u16, u16),
    /// Clear the row under the cursor; always preceded by a `MoveTo(0, y)`.
    ClearLine,
    Print(Vec<u8>),
    /// Restrict scrolling to rows `[0, rows)` and shift content by `delta`.
    ScrollRegion { rows: u16, delta: i8 },
}

#[derive(Debug, Default)]
pub struct Writer {
    cmds: Vec<Command>,
    run: Option<Run>,
}

#[derive(Debug)]
struct Run {
    row: u16,
    next_col: u16,
    bytes: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, x: u16, y: u16) {
        self.close_run();
        self.cmds.push(Command::MoveTo(x, y));
    }

    pub fn clear_line(&mut self, y: u16) {
        self.move_to(0, y);
        self.cmds.push(Command::ClearLine);
    }

    pub fn cell(&mut self, x: u16, y: u16, byte: u8) {
        if let Some(run) = &mut self.run
            && run.row == y
            && run.next_col == x
        {
            run.bytes.push(byte);
            run.next_col = x.saturating_add(1);
            return;
        }
        self.close_run();
        self.run = Some(Run {
            row: y,
            next_col: x.saturating_add(1),
            bytes: vec![byte],
        });
        self.cmds.push(Command::MoveTo(x, y));
    }

    pub fn scroll_region(&mut self, rows: u16, delta: i8) {
        self.close_run();
        self.cmds.push(Command::ScrollRegion { rows, delta });
    }

    fn close_run(&mut self) {
        if let Some(run) = self.run.take() {
            self.cmds.push(Command::Print(run.bytes));
        }
    }

    /// Pending commands with any open run closed; used by tests and logging.
    pub fn commands(&mut self) -> &[Command] {
        self.close_run();
        &self.cmds
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty() && self.run.is_none()
    }

    /// Emit every queued command to `out` and flush it. Returns the number of commands.
    pub fn flush_to<W: Write>(&mut self, out: &mut W) -> Result<usize> {
        self.close_run();
        let count = self.cmds.len();
        for c in self.cmds.drain(..) {
            match c {
                Command::MoveTo(x, y) => {
                    queue!(out, MoveTo(x, y))?;
                }
                Command::ClearLine => {
                    queue!(out, Clear(ClearType::CurrentLine))?;
                }
                Command::Print(bytes) => {
                    // Single-byte cells: every byte is its own column.
                    queue!(out, Print(String::from_utf8_lossy(&bytes)))?;
                }
                Command::ScrollRegion { rows, delta } => {
                    queue!(out, Print(format!("\x1b[1;{rows}r")))?;
                    if delta > 0 {
                        queue!(out, ScrollUp(delta as u16))?;
                    } else if delta < 0 {
                        queue!(out, ScrollDown(delta.unsigned_abs() as u16))?;
                    }
                    queue!(out, Print("\x1b[r"))?;
                }
            }
        }
        out.flush()?;
        Ok(count)
    }
}
