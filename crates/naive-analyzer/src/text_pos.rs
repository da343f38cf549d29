use tower_lsp::lsp_types::{Position, Range};

/// Convert an LSP `Position` (0-based line, UTF-16 character) to a byte
/// offset into `source`. Returns `None` if the line does not exist.
pub fn byte_offset_from_position(
    source: &str,
    position: Position,
) -> Option<usize> {
    let mut lines = source.split('\n');
    let mut byte_offset = 0usize;

    for _ in 0..position.line as usize {
        let line = lines.next()?;
        byte_offset += line.len() + 1;
    }

    let line = lines.next()?;
    let mut utf16_offset = 0u32;
    let mut char_offset = 0usize;
    for ch in line.chars() {
        if utf16_offset >= position.character {
            break;
        }
        utf16_offset += ch.len_utf16() as u32;
        char_offset += ch.len_utf8();
    }

    Some(byte_offset + char_offset)
}

pub fn position_from_byte_offset(
    source: &str,
    byte_offset: usize,
) -> Position {
    let mut remaining = byte_offset.min(source.len());

    for (line_index, line) in source.split('\n').enumerate() {
        if remaining <= line.len() {
            return Position::new(line_index as u32, utf16_column_of_byte_offset(line, remaining));
        }
        remaining = remaining.saturating_sub(line.len() + 1);
    }

    Position::new(0, 0)
}

/// Return the line containing `position` together with the byte column of
/// the position inside that line.
pub fn line_and_byte_column_at_position(
    source: &str,
    position: Position,
) -> Option<(&str, usize)> {
    let byte_offset = byte_offset_from_position(source, position)?;
    let line_start = source[..byte_offset].rfind('\n').map(|idx| idx + 1).unwrap_or(0);
    let line_end = source[byte_offset..].find('\n').map(|idx| byte_offset + idx).unwrap_or(source.len());
    Some((&source[line_start..line_end], byte_offset - line_start))
}

/// Selection range covering the whole line that contains `byte_offset`.
///
/// Matched definitions are presented as a full-line selection so the
/// editor reveals the definition line, not just the match prefix.
pub fn line_selection_range(
    source: &str,
    byte_offset: usize,
) -> Range {
    let start = position_from_byte_offset(source, byte_offset);
    let line_text = source
        .split('\n')
        .nth(start.line as usize)
        .unwrap_or("")
        .trim_end_matches('\r');
    Range::new(
        Position::new(start.line, 0),
        Position::new(start.line, utf16_column_of_byte_offset(line_text, line_text.len())),
    )
}

fn utf16_column_of_byte_offset(
    line: &str,
    byte_offset: usize,
) -> u32 {
    line[..byte_offset.min(line.len())].encode_utf16().count() as u32
}

#[cfg(test)]
#[path = "../tests/src/text_pos_tests.rs"]
mod tests;
