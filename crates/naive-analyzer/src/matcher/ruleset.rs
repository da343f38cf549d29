use std::fmt::{Display, Formatter};

use regex::Regex;

use crate::config::RulesSettings;
use crate::matcher::expand::{RuleExpansionError, discovery_regex, expand_discovery_prefix, expand_query_pattern};

/// Why a configured rule was rejected during pre-compilation.
#[derive(Debug, Clone)]
pub enum RuleError {
    Expansion(RuleExpansionError),
    Pattern {
        rule: String,
        error: regex::Error,
    },
}

impl Display for RuleError {
    fn fmt(
        &self,
        f: &mut Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Self::Expansion(error) => error.fmt(f),
            Self::Pattern {
                rule,
                error,
            } => {
                write!(f, "Definition {rule} does not compile as a regular expression: {error}. Ignoring!")
            },
        }
    }
}

/// One configured rule with its per-cycle compilation outcome.
///
/// Invalid rules stay in the list: the engines must mark them tried and
/// warn, never silently drop them or stall on them.
#[derive(Debug)]
pub struct CompiledRule {
    pub template: String,
    pub outcome: Result<Regex, RuleError>,
}

/// Ordered definition rules plus the general-matcher template,
/// snapshotted at the start of a builder/resolver cycle.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    definitions: Vec<String>,
    general_matcher: String,
}

impl RuleSet {
    pub fn new(
        definitions: Vec<String>,
        general_matcher: String,
    ) -> Self {
        Self {
            definitions,
            general_matcher,
        }
    }

    pub fn from_settings(settings: &RulesSettings) -> Self {
        Self::new(settings.definitions.clone(), settings.general_matcher.clone())
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Compile every rule into its discovery pattern, in rule order.
    pub fn compile_discovery(&self) -> Vec<CompiledRule> {
        self.definitions
            .iter()
            .map(|rule| {
                let outcome = match expand_discovery_prefix(rule, &self.general_matcher) {
                    Ok(prefix) => discovery_regex(&prefix).map_err(|error| RuleError::Pattern {
                        rule: rule.clone(),
                        error,
                    }),
                    Err(error) => Err(RuleError::Expansion(error)),
                };
                CompiledRule {
                    template: rule.clone(),
                    outcome,
                }
            })
            .collect()
    }

    /// Compile every rule into a confirmation pattern for one symbol,
    /// in rule order.
    pub fn compile_query(
        &self,
        symbol: &str,
    ) -> Vec<CompiledRule> {
        self.definitions
            .iter()
            .map(|rule| {
                let outcome = match expand_query_pattern(rule, symbol, &self.general_matcher) {
                    Ok(pattern) => Regex::new(&pattern).map_err(|error| RuleError::Pattern {
                        rule: rule.clone(),
                        error,
                    }),
                    Err(error) => Err(RuleError::Expansion(error)),
                };
                CompiledRule {
                    template: rule.clone(),
                    outcome,
                }
            })
            .collect()
    }
}
