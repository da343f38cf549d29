use tower_lsp::lsp_types::Position;

use super::*;

#[test]
fn word_under_cursor() {
    let source = "let foo_bar = 1;\n";
    assert_eq!(word_at_position(source, Position::new(0, 6)), Some("foo_bar".to_string()));
}

#[test]
fn cursor_just_after_word_selects_it() {
    let source = "let foo_bar = 1;\n";
    assert_eq!(word_at_position(source, Position::new(0, 11)), Some("foo_bar".to_string()));
}

#[test]
fn whitespace_between_words_is_no_selection() {
    let source = "x +  y\n";
    assert_eq!(word_at_position(source, Position::new(0, 4)), None);
}

#[test]
fn position_past_last_line_is_no_selection() {
    assert_eq!(word_at_position("only line", Position::new(5, 0)), None);
}

#[test]
fn second_line_word() {
    let source = "first\nsecond_word here\n";
    assert_eq!(word_at_position(source, Position::new(1, 3)), Some("second_word".to_string()));
}
