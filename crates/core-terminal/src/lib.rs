//! Terminal backend abstraction, crossterm implementation and headless grid.
//!
//! The editor core talks to the terminal only through [`TerminalBackend`]:
//! blocking event reads, per-cell drawing, row clears, a one-row hardware
//! scroll confined to the text area, cursor placement and flush. Raw mode is
//! scoped by [`TerminalGuard`], which restores the terminal when dropped on
//! every exit path including error returns and panic unwinding.

use anyhow::Result;
use core_events::InputEvent;
use crossterm::{
    cursor::{MoveTo, Show},
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode,
    },
};
use std::io::{Stdout, stdout};
use std::ops::{Deref, DerefMut};

pub mod capabilities;
pub mod headless;
pub mod input;
pub mod writer;

pub use capabilities::TerminalCapabilities;
pub use headless::HeadlessTerminal;
use writer::Writer;

pub trait TerminalBackend {
    fn enter(&mut self) -> Result<()>;
    fn leave(&mut self) -> Result<()>;
    fn set_title(&mut self, title: &str) -> Result<()>;
    fn capabilities(&self) -> TerminalCapabilities;
    /// Current size as `(rows, columns)`.
    fn dimensions(&self) -> Result<(u16, u16)>;
    /// Block until the next event the editor understands.
    fn read_event(&mut self) -> Result<InputEvent>;
    fn set_cursor(&mut self, row: u16, col: u16) -> Result<()>;
    fn draw_cell(&mut self, row: u16, col: u16, byte: u8) -> Result<()>;
    fn clear_row(&mut self, row: u16) -> Result<()>;
    /// Shift rows `[0, rows)` by one: `delta > 0` moves content up (bottom row
    /// exposed), `delta < 0` moves content down (top row exposed).
    fn scroll_region(&mut self, rows: u16, delta: i8) -> Result<()>;
    fn flush(&mut self) -> Result<()>;

    /// Enter and return a guard that will leave on drop.
    fn enter_guard(&mut self) -> Result<TerminalGuard<'_, Self>>
    where
        Self: Sized,
    {
        self.enter()?;
        Ok(TerminalGuard {
            backend: self,
            active: true,
        })
    }
}

/// RAII guard ensuring terminal state restoration even if caller early-returns or panics.
pub struct TerminalGuard<'a, B: TerminalBackend> {
    backend: &'a mut B,
    active: bool,
}

impl<B: TerminalBackend> TerminalGuard<'_, B> {
    /// Leave now instead of at drop, surfacing any error.
    pub fn release(mut self) -> Result<()> {
        self.active = false;
        self.backend.leave()
    }
}

impl<B: TerminalBackend> Deref for TerminalGuard<'_, B> {
    type Target = B;

    fn deref(&self) -> &B {
        self.backend
    }
}

impl<B: TerminalBackend> DerefMut for TerminalGuard<'_, B> {
    fn deref_mut(&mut self) -> &mut B {
        self.backend
    }
}

impl<B: TerminalBackend> Drop for TerminalGuard<'_, B> {
    fn drop(&mut self) {
        if self.active {
            let _ = self.backend.leave();
        }
    }
}

/// Best-effort restore from a panic hook, before the panic message is printed.
pub fn emergency_restore() {
    let mut out = stdout();
    let _ = execute!(out, crossterm::style::Print("\x1b[r"), LeaveAlternateScreen, Show);
    let _ = disable_raw_mode();
}

pub struct CrosstermBackend {
    entered: bool,
    caps: TerminalCapabilities,
    writer: Writer,
    out: Stdout,
}

impl Default for CrosstermBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CrosstermBackend {
    pub fn new() -> Self {
        Self {
            entered: false,
            caps: TerminalCapabilities::detect(),
            writer: Writer::new(),
            out: stdout(),
        }
    }
}

impl TerminalBackend for CrosstermBackend {
    fn enter(&mut self) -> Result<()> {
        if !self.entered {
            enable_raw_mode()?;
            execute!(self.out, EnterAlternateScreen, MoveTo(0, 0))?;
            self.entered = true;
            tracing::debug!(target: "terminal", "raw_mode_entered");
        }
        Ok(())
    }

    fn leave(&mut self) -> Result<()> {
        if self.entered {
            // Reset any scroll region left behind before handing the screen back.
            execute!(self.out, crossterm::style::Print("\x1b[r"), LeaveAlternateScreen, Show)?;
            disable_raw_mode()?;
            self.entered = false;
            tracing::debug!(target: "terminal", "raw_mode_left");
        }
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        execute!(self.out, SetTitle(title))?;
        Ok(())
    }

    fn capabilities(&self) -> TerminalCapabilities {
        self.caps
    }

    fn dimensions(&self) -> Result<(u16, u16)> {
        let (cols, rows) = crossterm::terminal::size()?;
        Ok((rows, cols))
    }

    fn read_event(&mut self) -> Result<InputEvent> {
        loop {
            let raw = crossterm::event::read()?;
            if let Some(ev) = input::map_event(raw) {
                return Ok(ev);
            }
        }
    }

    fn set_cursor(&mut self, row: u16, col: u16) -> Result<()> {
        self.writer.move_to(col, row);
        Ok(())
    }

    fn draw_cell(&mut self, row: u16, col: u16, byte: u8) -> Result<()> {
        self.writer.cell(col, row, byte);
        Ok(())
    }

    fn clear_row(&mut self, row: u16) -> Result<()> {
        self.writer.clear_line(row);
        Ok(())
    }

    fn scroll_region(&mut self, rows: u16, delta: i8) -> Result<()> {
        self.writer.scroll_region(rows, delta);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        let commands = self.writer.flush_to(&mut self.out)?;
        tracing::trace!(target: "terminal", commands, "flush");
        Ok(())
    }
}

impl Drop for CrosstermBackend {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}
