use tower_lsp::lsp_types::{Position, Range, TextDocumentContentChangeEvent, Url};

use super::*;

fn doc(text: &str) -> Document {
    Document::new(Url::parse("file:///tmp/test.py").expect("static url"), text.to_string(), 1)
}

fn ranged_change(
    start: (u32, u32),
    end: (u32, u32),
    text: &str,
) -> TextDocumentContentChangeEvent {
    TextDocumentContentChangeEvent {
        range: Some(Range::new(Position::new(start.0, start.1), Position::new(end.0, end.1))),
        range_length: None,
        text: text.to_string(),
    }
}

#[test]
fn full_sync_replaces_content() {
    let mut document = doc("old");
    document.apply_changes(
        vec![TextDocumentContentChangeEvent {
            range: None,
            range_length: None,
            text: "new".to_string(),
        }],
        2,
    );
    assert_eq!(document.text, "new");
    assert_eq!(document.version, 2);
}

#[test]
fn incremental_change_replaces_range() {
    let mut document = doc("def foo():\n    pass\n");
    document.apply_changes(vec![ranged_change((0, 4), (0, 7), "bar")], 2);
    assert_eq!(document.text, "def bar():\n    pass\n");
}

#[test]
fn changes_apply_in_order() {
    let mut document = doc("abc");
    document.apply_changes(vec![ranged_change((0, 0), (0, 1), "x"), ranged_change((0, 2), (0, 3), "y")], 2);
    assert_eq!(document.text, "xby");
}

#[test]
fn out_of_range_change_is_dropped() {
    let mut document = doc("short");
    document.apply_changes(vec![ranged_change((9, 0), (9, 5), "ignored")], 3);
    assert_eq!(document.text, "short");
    assert_eq!(document.version, 3);
}
