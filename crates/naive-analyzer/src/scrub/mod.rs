//! The index builder: a full workspace pass that pre-computes a
//! symbol → location index using every configured definition rule.

mod scrubber;
mod symbol_index;
mod types;

pub use scrubber::{SENTINEL_DIR, SENTINEL_FILENAME, ScrubPhase, ScrubPlan, ScrubReport, Scrubber};
pub use symbol_index::SymbolIndex;
pub use types::Occurrence;
