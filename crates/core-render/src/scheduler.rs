//! Render scheduler.
//!
//! Producers report what changed during one key dispatch via `mark`; `consume`
//! merges the queued intents into a single [`Decision`] for the engine.
//!
//! Merge semantics:
//! - Any `Full` or `Initial` wins (`Full` over `Initial`).
//! - A `Scroll` together with a `Line` repaint escalates to `Full`: a hardware
//!   scroll would invalidate the edited row index.
//! - Otherwise precedence is `Scroll` > `Line` > `StatusLine` > `CursorOnly`.
//! - Opposite scrolls within one frame cancel out into `CursorOnly`.
//!
//! `effective` differs from `semantic` only when the terminal lacks scroll
//! region support; a scroll then degrades to a full repaint.

use core_state::ScrollDelta;

/// Invalidation intents produced by a single dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderDelta {
    /// First paint after load: visible rows up to the last line.
    Initial,
    /// Every text row is cleared and repainted (resize, degraded scroll).
    Full,
    /// Viewport moved by one row.
    Scroll(ScrollDelta),
    /// Buffer line whose contents changed.
    Line(usize),
    /// Only the status row changed.
    StatusLine,
    /// Only the cursor moved.
    CursorOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub semantic: RenderDelta,
    pub effective: RenderDelta,
}

#[derive(Debug, Default)]
pub struct RenderScheduler {
    pending: Vec<RenderDelta>,
}

impl RenderScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&mut self, delta: RenderDelta) {
        if let RenderDelta::Scroll(ScrollDelta::None) = delta {
            return;
        }
        self.pending.push(delta);
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Merge and clear the queue. `scroll_region` reports terminal support.
    pub fn consume(&mut self, scroll_region: bool) -> Decision {
        let semantic = collapse(&self.pending);
        self.pending.clear();
        let effective = match semantic {
            RenderDelta::Scroll(_) if !scroll_region => RenderDelta::Full,
            other => other,
        };
        if effective != semantic {
            tracing::debug!(target: "render.scheduler", ?semantic, ?effective, "scroll_degraded_full");
        }
        Decision {
            semantic,
            effective,
        }
    }
}

fn collapse(pending: &[RenderDelta]) -> RenderDelta {
    if pending.contains(&RenderDelta::Full) {
        return RenderDelta::Full;
    }
    if pending.contains(&RenderDelta::Initial) {
        return RenderDelta::Initial;
    }
    let net: i32 = pending
        .iter()
        .filter_map(|d| match d {
            RenderDelta::Scroll(s) => Some(i32::from(s.rows())),
            _ => None,
        })
        .sum();
    let scrolled = pending.iter().any(|d| matches!(d, RenderDelta::Scroll(_)));
    let line = pending.iter().rev().find_map(|d| match d {
        RenderDelta::Line(l) => Some(*l),
        _ => None,
    });
    match (net, line) {
        (0, Some(l)) if !scrolled => RenderDelta::Line(l),
        (0, None) if scrolled => RenderDelta::CursorOnly,
        (0, None) => {
            if pending.contains(&RenderDelta::StatusLine) {
                RenderDelta::StatusLine
            } else {
                RenderDelta::CursorOnly
            }
        }
        (1, None) => RenderDelta::Scroll(ScrollDelta::Down),
        (-1, None) => RenderDelta::Scroll(ScrollDelta::Up),
        _ => RenderDelta::Full,
    }
}
