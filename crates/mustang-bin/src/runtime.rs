//! Synchronous event loop: read a key, dispatch it, sync the screen.

use anyhow::Result;
use core_actions::{DispatchResult, Dispatcher, DocumentSink};
use core_events::{InputEvent, KeyEvent};
use core_render::{RenderDelta, RenderEngine};
use core_state::EditorState;
use core_terminal::TerminalBackend;
use tracing::{debug, info, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    /// Prefix followed by the quit key.
    Quit,
    /// Interrupt key in the normal state.
    Interrupt,
}

impl ShutdownReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShutdownReason::Quit => "quit",
            ShutdownReason::Interrupt => "interrupt",
        }
    }
}

enum LoopControl {
    Continue,
    Break { reason: ShutdownReason },
}

pub struct EditorRuntime<'t, 'c, B: TerminalBackend, S: DocumentSink + ?Sized> {
    term: &'t mut B,
    sink: &'t mut S,
    state: EditorState<'c>,
    dispatcher: Dispatcher,
    engine: RenderEngine,
}

impl<'t, 'c, B: TerminalBackend, S: DocumentSink + ?Sized> EditorRuntime<'t, 'c, B, S> {
    pub fn new(term: &'t mut B, sink: &'t mut S, state: EditorState<'c>, dispatcher: Dispatcher) -> Self {
        let engine = RenderEngine::new(term.capabilities());
        Self {
            term,
            sink,
            state,
            dispatcher,
            engine,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> &EditorState<'c> {
        &self.state
    }

    pub fn run(&mut self) -> Result<ShutdownReason> {
        self.perform_initial_render()?;
        let loop_span = tracing::debug_span!(target: "runtime", "event_loop");
        let _enter = loop_span.enter();
        loop {
            let event = self.term.read_event()?;
            let control = match event {
                InputEvent::Key(key) => self.handle_key(&key)?,
                InputEvent::Resize(cols, rows) => self.handle_resize(cols, rows)?,
            };
            if let LoopControl::Break { reason } = control {
                info!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    dirty = self.state.dirty,
                    "shutdown"
                );
                return Ok(reason);
            }
        }
    }

    fn perform_initial_render(&mut self) -> Result<()> {
        self.engine.mark(RenderDelta::Initial);
        self.engine.render(&mut *self.term, &self.state)
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Result<LoopControl> {
        let result = self.dispatcher.dispatch(key, &mut self.state, &mut *self.sink);
        trace!(target: "runtime", key = %key, ?result, "dispatched");
        if result.quit {
            let reason = if result.interrupted {
                ShutdownReason::Interrupt
            } else {
                ShutdownReason::Quit
            };
            return Ok(LoopControl::Break { reason });
        }
        self.mark_result(&result);
        self.engine.render(&mut *self.term, &self.state)?;
        Ok(LoopControl::Continue)
    }

    fn mark_result(&mut self, result: &DispatchResult) {
        self.engine.mark(RenderDelta::Scroll(result.scroll));
        if let Some(line) = result.edited_line {
            self.engine.mark(RenderDelta::Line(line));
        }
        if result.status_changed {
            self.engine.mark(RenderDelta::StatusLine);
        }
    }

    fn handle_resize(&mut self, cols: u16, rows: u16) -> Result<LoopControl> {
        let (height, width) = crate::text_area(rows, cols);
        self.state.resize(height, width);
        debug!(target: "runtime", rows, cols, top = self.state.view.viewport.top, "resize");
        self.engine.invalidate_status();
        self.engine.mark(RenderDelta::Full);
        self.engine.render(&mut *self.term, &self.state)?;
        Ok(LoopControl::Continue)
    }
}
