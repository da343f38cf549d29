//! Rule expansion: turning configured definition-rule templates into
//! concrete search patterns.

mod expand;
mod ruleset;

pub use expand::{
    DEFINITION_TOKEN, REGEX_MARKER, RuleExpansionError, SELECTED_TEXT_TOKEN, discovery_regex, expand_discovery_prefix,
    expand_query_pattern,
};
pub use ruleset::{CompiledRule, RuleError, RuleSet};
