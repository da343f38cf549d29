use tower_lsp::lsp_types::Position;

use super::*;

#[test]
fn byte_offset_walks_lines() {
    let source = "alpha\nbeta gamma\n";
    assert_eq!(byte_offset_from_position(source, Position::new(0, 0)), Some(0));
    assert_eq!(byte_offset_from_position(source, Position::new(1, 0)), Some(6));
    assert_eq!(byte_offset_from_position(source, Position::new(1, 5)), Some(11));
}

#[test]
fn byte_offset_missing_line_is_none() {
    assert_eq!(byte_offset_from_position("one line", Position::new(3, 0)), None);
}

#[test]
fn position_from_offset_round_trips() {
    let source = "alpha\nbeta gamma\n";
    assert_eq!(position_from_byte_offset(source, 11), Position::new(1, 5));
    assert_eq!(position_from_byte_offset(source, 0), Position::new(0, 0));
}

#[test]
fn position_from_offset_counts_utf16_columns() {
    // 'é' is two bytes in UTF-8 but one UTF-16 code unit
    let source = "é x\n";
    assert_eq!(position_from_byte_offset(source, 3), Position::new(0, 2));
}

#[test]
fn line_and_column_at_position() {
    let source = "alpha\nbeta gamma";
    let (line, column) = line_and_byte_column_at_position(source, Position::new(1, 5)).expect("position exists");
    assert_eq!(line, "beta gamma");
    assert_eq!(column, 5);
}

#[test]
fn selection_range_covers_whole_line() {
    let source = "alpha\nbeta gamma\n";
    let range = line_selection_range(source, 11);
    assert_eq!(range.start, Position::new(1, 0));
    assert_eq!(range.end, Position::new(1, 10));
}

#[test]
fn selection_range_ignores_carriage_return() {
    let source = "alpha\r\nbeta\r\n";
    let range = line_selection_range(source, 7);
    assert_eq!(range.start, Position::new(1, 0));
    assert_eq!(range.end, Position::new(1, 4));
}
