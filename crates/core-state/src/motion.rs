//! Navigation as pure functions of `(ViewState, &LineStore)`.
//!
//! Each motion returns the updated view plus the `ScrollDelta` that render
//! sync uses to choose between a one-row hardware scroll and no scroll at all.
//! Motions clamp instead of failing; moving past the first or last line is a
//! no-op rather than a wraparound.

use crate::view::{ScrollDelta, ViewState};
use core_text::LineStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Motion {
    Up,
    Down,
    Left,
    Right,
    LineStart,
    LineEnd,
}

/// Result of a navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigation {
    pub view: ViewState,
    pub scroll: ScrollDelta,
}

impl Navigation {
    fn still(view: ViewState) -> Self {
        Self {
            view,
            scroll: ScrollDelta::None,
        }
    }
}

pub fn apply(motion: Motion, view: ViewState, store: &LineStore<'_>) -> Navigation {
    match motion {
        Motion::Up => move_up(view, store),
        Motion::Down => move_down(view, store),
        Motion::Left => move_left(view, store),
        Motion::Right => move_right(view, store),
        Motion::LineStart => move_line_start(view, store),
        Motion::LineEnd => move_line_end(view, store),
    }
}

/// Rightmost column reachable by horizontal motions on the cursor line.
fn horizontal_limit(view: &ViewState, store: &LineStore<'_>) -> usize {
    store.line_len(view.cursor.line).min(view.viewport.width)
}

pub fn move_up(mut view: ViewState, store: &LineStore<'_>) -> Navigation {
    if view.cursor.line == 0 {
        return Navigation::still(view);
    }
    let mut scroll = ScrollDelta::None;
    if view.cursor.line == view.viewport.top {
        view.viewport.top -= 1;
        scroll = ScrollDelta::Up;
    }
    view.cursor.line -= 1;
    view.cursor.column = view.cursor.column.min(store.line_len(view.cursor.line));
    Navigation { view, scroll }
}

pub fn move_down(mut view: ViewState, store: &LineStore<'_>) -> Navigation {
    let line_count = store.line_count();
    if view.cursor.line >= line_count {
        return Navigation::still(view);
    }
    let mut scroll = ScrollDelta::None;
    let next = view.cursor.line + 1;
    if next - view.viewport.top == view.viewport.height {
        if view.viewport.top + view.viewport.height > line_count {
            return Navigation::still(view);
        }
        view.viewport.top += 1;
        scroll = ScrollDelta::Down;
    }
    view.cursor.line = next;
    view.cursor.column = view.cursor.column.min(store.line_len(next));
    Navigation { view, scroll }
}

pub fn move_left(mut view: ViewState, store: &LineStore<'_>) -> Navigation {
    let limit = horizontal_limit(&view, store);
    view.cursor.column = view.cursor.column.saturating_sub(1).min(limit);
    Navigation::still(view)
}

pub fn move_right(mut view: ViewState, store: &LineStore<'_>) -> Navigation {
    let limit = horizontal_limit(&view, store);
    view.cursor.column = (view.cursor.column + 1).min(limit);
    Navigation::still(view)
}

pub fn move_line_start(mut view: ViewState, _store: &LineStore<'_>) -> Navigation {
    view.cursor.column = 0;
    Navigation::still(view)
}

pub fn move_line_end(mut view: ViewState, store: &LineStore<'_>) -> Navigation {
    view.cursor.column = horizontal_limit(&view, store);
    Navigation::still(view)
}
