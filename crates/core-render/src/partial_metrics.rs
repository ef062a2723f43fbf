//! Render path metrics.
//!
//! Counts what the engine actually executed per frame, separate from what the
//! dispatcher asked for. Tests use the snapshot to assert that a one-row
//! scroll or an insertion touched exactly one text row.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct RenderPathMetrics {
    /// Initial paints (stop at the last line).
    pub initial_frames: AtomicU64,
    /// Frames that cleared and repainted every text row.
    pub full_frames: AtomicU64,
    /// Hardware scroll-region shifts executed.
    pub scroll_region_shifts: AtomicU64,
    /// Scrolls that degraded to a full repaint for lack of region support.
    pub scroll_shift_degraded_full: AtomicU64,
    /// Frames that repainted a single edited row.
    pub line_frames: AtomicU64,
    /// Text rows repainted across all frames.
    pub rows_repainted: AtomicU64,
    /// Status row repaints.
    pub status_repaints: AtomicU64,
    /// Status row repaints skipped because content was unchanged.
    pub status_skipped: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderPathMetricsSnapshot {
    pub initial_frames: u64,
    pub full_frames: u64,
    pub scroll_region_shifts: u64,
    pub scroll_shift_degraded_full: u64,
    pub line_frames: u64,
    pub rows_repainted: u64,
    pub status_repaints: u64,
    pub status_skipped: u64,
}

impl RenderPathMetrics {
    pub fn snapshot(&self) -> RenderPathMetricsSnapshot {
        use Ordering::Relaxed;
        RenderPathMetricsSnapshot {
            initial_frames: self.initial_frames.load(Relaxed),
            full_frames: self.full_frames.load(Relaxed),
            scroll_region_shifts: self.scroll_region_shifts.load(Relaxed),
            scroll_shift_degraded_full: self.scroll_shift_degraded_full.load(Relaxed),
            line_frames: self.line_frames.load(Relaxed),
            rows_repainted: self.rows_repainted.load(Relaxed),
            status_repaints: self.status_repaints.load(Relaxed),
            status_skipped: self.status_skipped.load(Relaxed),
        }
    }

    pub(crate) fn bump(counter: &AtomicU64, by: u64) {
        counter.fetch_add(by, Ordering::Relaxed);
    }
}
