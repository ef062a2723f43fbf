//! Terminal capability flags consulted by render sync.
//!
//! Only one capability matters today: whether the terminal honours a scroll
//! region (DECSTBM) so a one-row viewport move can be done with a hardware
//! scroll plus a single row repaint. Without it render sync repaints every
//! visible row instead.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct TerminalCapabilities {
    pub supports_scroll_region: bool,
}

impl TerminalCapabilities {
    /// Every terminal crossterm targets supports scroll regions except the
    /// legacy Windows console API.
    pub fn detect() -> Self {
        Self {
            supports_scroll_region: !cfg!(windows),
        }
    }

    pub const fn with_scroll_region(supports_scroll_region: bool) -> Self {
        Self {
            supports_scroll_region,
        }
    }
}
