use core_render::{RenderDelta, RenderEngine};
use core_state::{Access, EditorState, Motion, ViewState};
use core_terminal::headless::Op;
use core_terminal::{HeadlessTerminal, TerminalCapabilities};
use core_text::LineStore;
use pretty_assertions::assert_eq;
use std::path::PathBuf;

fn numbered(n: usize) -> Vec<u8> {
    (0..n).map(|i| format!("line{i}\n")).collect::<String>().into_bytes()
}

fn setup<'a>(content: &'a [u8], rows: u16, caps: bool) -> (EditorState<'a>, HeadlessTerminal, RenderEngine) {
    let st = EditorState::new(
        LineStore::load(content),
        PathBuf::from("n.txt"),
        Access::ReadWrite,
        ViewState::new(rows as usize - 1, 20),
    );
    let caps = TerminalCapabilities::with_scroll_region(caps);
    let term = HeadlessTerminal::new(rows, 20).with_capabilities(caps);
    let mut eng = RenderEngine::new(caps);
    eng.mark(RenderDelta::Initial);
    (st, term, eng)
}

fn step(st: &mut EditorState<'_>, term: &mut HeadlessTerminal, eng: &mut RenderEngine, m: Motion) {
    let delta = st.navigate(m);
    eng.mark(RenderDelta::Scroll(delta));
    eng.render(term, st).unwrap();
}

#[test]
fn scroll_down_repaints_only_bottom_row() {
    let content = numbered(6);
    let (mut st, mut term, mut eng) = setup(&content, 4, true);
    eng.render(&mut term, &st).unwrap();
    for _ in 0..2 {
        step(&mut st, &mut term, &mut eng, Motion::Down);
    }
    assert_eq!(eng.last_repaint_kind(), Some("cursor_only"));
    term.take_ops();

    step(&mut st, &mut term, &mut eng, Motion::Down);
    assert_eq!(st.view.viewport.top, 1);
    assert_eq!(eng.last_repaint_rows(), &[2]);
    assert!(term.ops().contains(&Op::Scroll { rows: 3, delta: 1 }));
    assert_eq!(
        term.screen(),
        vec!["line1", "line2", "line3", "n.txt  4:1"]
    );
    assert_eq!(term.cursor(), (2, 0));
}

#[test]
fn scroll_up_repaints_only_top_row() {
    let content = numbered(6);
    let (mut st, mut term, mut eng) = setup(&content, 3, true);
    eng.render(&mut term, &st).unwrap();
    for _ in 0..3 {
        step(&mut st, &mut term, &mut eng, Motion::Down);
    }
    assert_eq!(st.view.viewport.top, 2);
    assert_eq!(term.screen(), vec!["line2", "line3", "n.txt  4:1"]);

    step(&mut st, &mut term, &mut eng, Motion::Up);
    assert_eq!(eng.last_repaint_kind(), Some("cursor_only"));
    step(&mut st, &mut term, &mut eng, Motion::Up);
    assert_eq!(st.view.viewport.top, 1);
    assert_eq!(eng.last_repaint_rows(), &[0]);
    assert_eq!(term.screen(), vec!["line1", "line2", "n.txt  2:1"]);
}

#[test]
fn scroll_onto_virtual_line_leaves_row_blank() {
    let content = numbered(2);
    let (mut st, mut term, mut eng) = setup(&content, 3, true);
    eng.render(&mut term, &st).unwrap();
    step(&mut st, &mut term, &mut eng, Motion::Down);
    step(&mut st, &mut term, &mut eng, Motion::Down);
    assert_eq!(st.view.viewport.top, 1);
    assert_eq!(st.view.cursor.line, 2);
    assert!(eng.last_repaint_rows().is_empty());
    assert_eq!(term.screen(), vec!["line1", "", "n.txt  3:1"]);
}

#[test]
fn scroll_without_region_support_repaints_everything() {
    let content = numbered(5);
    let (mut st, mut term, mut eng) = setup(&content, 3, false);
    eng.render(&mut term, &st).unwrap();
    step(&mut st, &mut term, &mut eng, Motion::Down);
    term.take_ops();
    step(&mut st, &mut term, &mut eng, Motion::Down);
    assert_eq!(eng.last_repaint_rows(), &[0, 1]);
    assert!(!term.ops().iter().any(|op| matches!(op, Op::Scroll { .. })));
    assert_eq!(eng.metrics().scroll_shift_degraded_full, 1);
    assert_eq!(term.screen(), vec!["line1", "line2", "n.txt  3:1"]);
}
