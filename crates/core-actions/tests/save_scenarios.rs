use core_actions::{Dispatcher, MemorySink, open_for_edit};
use core_events::{KeyCode, KeyEvent};
use core_keymap::Keymap;
use core_state::{EditorState, ScrollDelta, ViewState};
use core_text::LineStore;
use pretty_assertions::assert_eq;

fn ch(c: char) -> KeyEvent {
    KeyEvent::plain(KeyCode::Char(c))
}

fn save_keys() -> [KeyEvent; 2] {
    [KeyEvent::ctrl('x'), KeyEvent::ctrl('s')]
}

#[test]
fn move_insert_save_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.txt");
    std::fs::write(&path, b"ab\ncd\n").unwrap();

    let mut file = open_for_edit(&path).unwrap();
    let content = file.read_all().unwrap();
    let mut ed = EditorState::new(
        LineStore::load(&content),
        path.clone(),
        file.access(),
        ViewState::new(1, 80),
    );
    let mut d = Dispatcher::new(Keymap::default());

    let r = d.dispatch(&KeyEvent::ctrl('n'), &mut ed, &mut file);
    assert_eq!(r.scroll, ScrollDelta::Down);
    assert_eq!(ed.view.viewport.top, 1);
    assert_eq!(ed.view.cursor.line, 1);

    d.dispatch(&KeyEvent::ctrl('e'), &mut ed, &mut file);
    let r = d.dispatch(&ch('x'), &mut ed, &mut file);
    assert_eq!(r.edited_line, Some(1));
    assert_eq!(ed.store.get(1).bytes(), b"cdx");
    assert!(ed.dirty);

    let [prefix, save] = save_keys();
    d.dispatch(&prefix, &mut ed, &mut file);
    let r = d.dispatch(&save, &mut ed, &mut file);
    assert_eq!(r.saved, Some(7));
    assert!(!ed.dirty);
    assert_eq!(std::fs::read(&path).unwrap(), b"ab\ncdx\n");
    assert_eq!(
        ed.message.as_ref().map(|m| m.text.as_str()),
        Some("Wrote 7 bytes")
    );
}

#[test]
fn save_without_edits_performs_no_write() {
    let content = b"ab\ncd\n".to_vec();
    let mut ed = EditorState::new(
        LineStore::load(&content),
        "m.txt".into(),
        core_state::Access::ReadWrite,
        ViewState::new(3, 80),
    );
    let mut d = Dispatcher::new(Keymap::default());
    let mut sink = MemorySink::default();
    let [prefix, save] = save_keys();
    d.dispatch(&prefix, &mut ed, &mut sink);
    let r = d.dispatch(&save, &mut ed, &mut sink);
    assert!(r.saved.is_none());
    assert!(sink.writes.is_empty());

    d.dispatch(&ch('!'), &mut ed, &mut sink);
    d.dispatch(&prefix, &mut ed, &mut sink);
    d.dispatch(&save, &mut ed, &mut sink);
    d.dispatch(&prefix, &mut ed, &mut sink);
    d.dispatch(&save, &mut ed, &mut sink);
    assert_eq!(sink.writes.len(), 1, "second save is a no-op");
    assert_eq!(sink.last(), Some(&b"!ab\ncd\n"[..]));
}

#[test]
fn insert_into_partial_only_file_creates_line() {
    let content = b"only_line".to_vec();
    let mut ed = EditorState::new(
        LineStore::load(&content),
        "p.txt".into(),
        core_state::Access::ReadWrite,
        ViewState::new(3, 80),
    );
    assert_eq!(ed.store.line_count(), 0);
    let mut d = Dispatcher::new(Keymap::default());
    let mut sink = MemorySink::default();
    d.dispatch(&ch('q'), &mut ed, &mut sink);
    assert_eq!(ed.store.line_count(), 1);
    assert!(ed.store.is_owned(0));
    let [prefix, save] = save_keys();
    d.dispatch(&prefix, &mut ed, &mut sink);
    d.dispatch(&save, &mut ed, &mut sink);
    assert_eq!(sink.last(), Some(&b"q\n"[..]));
}
