use tower_lsp::lsp_types::{TextDocumentContentChangeEvent, Url};

use crate::text_pos::byte_offset_from_position;

/// Snapshot of a single open text document.
#[derive(Debug, Clone)]
pub struct Document {
    pub uri: Url,
    /// Full source text, kept current across edits.
    pub text: String,
    /// Document version as reported by the client.
    pub version: i32,
}

impl Document {
    pub fn new(
        uri: Url,
        text: String,
        version: i32,
    ) -> Self {
        Self {
            uri,
            text,
            version,
        }
    }

    pub fn set_content(
        &mut self,
        text: String,
        version: i32,
    ) {
        self.text = text;
        self.version = version;
    }

    /// Apply incremental or full-content changes, in order.
    ///
    /// A change without a range replaces the whole document. A ranged
    /// change whose positions fall outside the current text is dropped;
    /// the client and server are out of sync and the next full sync wins.
    pub fn apply_changes(
        &mut self,
        changes: Vec<TextDocumentContentChangeEvent>,
        version: i32,
    ) {
        for change in changes {
            match change.range {
                None => self.text = change.text,
                Some(range) => {
                    let start = byte_offset_from_position(&self.text, range.start);
                    let end = byte_offset_from_position(&self.text, range.end);
                    if let (Some(start), Some(end)) = (start, end)
                        && start <= end
                        && end <= self.text.len()
                    {
                        self.text.replace_range(start..end, &change.text);
                    }
                },
            }
        }
        self.version = version;
    }
}

#[cfg(test)]
#[path = "../../tests/src/document/text_document_tests.rs"]
mod tests;
