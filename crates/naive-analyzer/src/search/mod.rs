//! The definition resolver: answers one go-to-definition query.

mod searcher;
mod word;

use std::fmt::{Display, Formatter};

pub use searcher::{Jump, SearchContext, SearchOutcome, SearchPhase, Searcher};
pub use word::word_at_position;

/// Conditions that abort a query before the search state machine runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryAbort {
    /// No identifier under the request position.
    NoSelection,
    /// No workspace folder open.
    NoWorkspace,
}

impl Display for QueryAbort {
    fn fmt(
        &self,
        f: &mut Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Self::NoSelection => f.write_str("No text selected."),
            Self::NoWorkspace => f.write_str("No workspace open."),
        }
    }
}
