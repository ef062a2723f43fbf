//! Cursor and viewport coordinate model.
//!
//! Logical positions index the line store; screen positions are derived on
//! demand and never stored. The viewport keeps `top <= cursor.line < top + height`
//! after every navigation, and never scrolls past the point where the one-past-end
//! virtual line sits on the bottom row.

/// Logical cursor position: line index into the store and byte column in that line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub line: usize,
    pub column: usize,
}

impl Cursor {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    pub fn origin() -> Self {
        Self::default()
    }
}

/// Window into the line store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Index of the first visible line.
    pub top: usize,
    /// Text rows (status row excluded). Always at least 1.
    pub height: usize,
    /// Columns.
    pub width: usize,
}

impl Viewport {
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            top: 0,
            height: height.max(1),
            width,
        }
    }

    /// One past the last visible line index.
    pub fn bottom(&self) -> usize {
        self.top + self.height
    }

    pub fn contains(&self, line: usize) -> bool {
        line >= self.top && line < self.bottom()
    }

    /// Largest `top` reachable by scrolling for a store of `line_count` lines.
    ///
    /// The virtual line at `line_count` is navigable, so `line_count + 1` rows
    /// participate.
    pub fn max_top(&self, line_count: usize) -> usize {
        (line_count + 1).saturating_sub(self.height)
    }
}

/// Vertical movement of the viewport produced by a single navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollDelta {
    /// Viewport moved toward the start of the buffer (content shifts down).
    Up,
    #[default]
    None,
    /// Viewport moved toward the end of the buffer (content shifts up).
    Down,
}

impl ScrollDelta {
    pub fn rows(self) -> i8 {
        match self {
            ScrollDelta::Up => -1,
            ScrollDelta::None => 0,
            ScrollDelta::Down => 1,
        }
    }

    pub fn is_none(self) -> bool {
        matches!(self, ScrollDelta::None)
    }
}

/// Screen coordinates of the cursor relative to the text area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenPosition {
    pub row: usize,
    pub col: usize,
}

/// Cursor plus viewport, passed by value into every navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewState {
    pub cursor: Cursor,
    pub viewport: Viewport,
}

impl ViewState {
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            cursor: Cursor::origin(),
            viewport: Viewport::new(height, width),
        }
    }

    pub fn screen_position(&self) -> ScreenPosition {
        ScreenPosition {
            row: self.cursor.line.saturating_sub(self.viewport.top),
            col: self.cursor.column.min(self.viewport.width),
        }
    }

    /// Adopt new terminal dimensions and restore the scroll invariant.
    pub fn resize(mut self, height: usize, width: usize, line_count: usize) -> Self {
        self.viewport.height = height.max(1);
        self.viewport.width = width;
        self.viewport.top = self.viewport.top.min(self.viewport.max_top(line_count));
        if self.cursor.line < self.viewport.top {
            self.viewport.top = self.cursor.line;
        } else if self.cursor.line >= self.viewport.bottom() {
            self.viewport.top = self.cursor.line + 1 - self.viewport.height;
        }
        self
    }
}
