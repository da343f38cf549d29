pub mod config;
pub mod document;
pub mod matcher;
pub mod progress;
pub mod scrub;
pub mod search;
pub mod server;
pub mod text_pos;
pub mod workspace;

pub use config::ServerSettings;
pub use matcher::{RuleError, RuleExpansionError, RuleSet, expand_discovery_prefix, expand_query_pattern};
pub use scrub::{Occurrence, ScrubPhase, ScrubPlan, ScrubReport, Scrubber, SymbolIndex};
pub use search::{Jump, SearchContext, SearchOutcome, SearchPhase, Searcher};
pub use server::NaiveLanguageServer;
pub use workspace::FileId;
