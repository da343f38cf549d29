use tower_lsp::lsp_types::Position;

use crate::text_pos::line_and_byte_column_at_position;

/// Extract the identifier under the request position.
///
/// Walks outward from the cursor over word characters, so a position
/// anywhere inside (or immediately after) an identifier selects it.
pub fn word_at_position(
    source: &str,
    position: Position,
) -> Option<String> {
    let (line, byte_column) = line_and_byte_column_at_position(source, position)?;
    let chars: Vec<char> = line.chars().collect();

    let mut cursor = 0usize;
    let mut bytes = 0usize;
    for ch in &chars {
        if bytes >= byte_column {
            break;
        }
        bytes += ch.len_utf8();
        cursor += 1;
    }

    let mut start = cursor;
    while start > 0 && is_ident_char(chars[start - 1]) {
        start -= 1;
    }
    let mut end = cursor;
    while end < chars.len() && is_ident_char(chars[end]) {
        end += 1;
    }

    if start == end {
        return None;
    }
    Some(chars[start..end].iter().collect())
}

fn is_ident_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

#[cfg(test)]
#[path = "../../tests/src/search/word_tests.rs"]
mod tests;
