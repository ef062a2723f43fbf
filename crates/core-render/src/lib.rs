//! Render sync: keeps the terminal in step with editor state one row at a time.
//!
//! Pipeline per dispatched key:
//! 1. The caller marks what changed (`RenderDelta`): a one-row scroll, an
//!    edited line, the status row, or nothing but the cursor.
//! 2. `scheduler` merges the marks into a `Decision`; a scroll degrades to a
//!    full repaint when the terminal lacks scroll-region support.
//! 3. `render_engine` applies the decision through the `TerminalBackend`
//!    trait, repaints the status row if its text changed, places the cursor
//!    and flushes.
//!
//! Exposed components:
//! - `scheduler`: delta merge rules.
//! - `render_engine`: row painting, hardware scroll, cursor placement.
//! - `status`: status row composition.
//! - `partial_metrics`: execution counters used by tests and debug logging.

pub mod partial_metrics;
pub mod render_engine;
pub mod scheduler;
pub mod status;

pub use partial_metrics::RenderPathMetricsSnapshot;
pub use render_engine::RenderEngine;
pub use scheduler::{Decision, RenderDelta, RenderScheduler};
pub use status::build_status;
