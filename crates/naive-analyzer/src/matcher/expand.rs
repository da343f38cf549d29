use std::fmt::{Display, Formatter};

use regex::Regex;

/// Marks a rule whose remainder is a raw regular expression.
pub const REGEX_MARKER: &str = "${regex}=";
/// Placeholder for the rule token, valid only in the general matcher.
pub const DEFINITION_TOKEN: &str = "${DEFINITION}";
/// Placeholder for the query symbol.
pub const SELECTED_TEXT_TOKEN: &str = "${SELECTED_TEXT}";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleExpansionError {
    /// `${DEFINITION}` appeared in a raw-regex rule; the placeholder is
    /// only meaningful inside the general-matcher template.
    DefinitionTokenInRegexRule {
        rule: String,
    },
}

impl Display for RuleExpansionError {
    fn fmt(
        &self,
        f: &mut Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Self::DefinitionTokenInRegexRule {
                rule,
            } => {
                write!(f, "Invalid token ${{DEFINITION}} found in definition {rule}. Ignoring!")
            },
        }
    }
}

/// Expand a definition rule for one query symbol.
///
/// Exactly one of three expansion paths applies:
///
/// 1. rule carries [`REGEX_MARKER`]: the remainder is the pattern; the
///    symbol is substituted for [`SELECTED_TEXT_TOKEN`] if present,
///    appended otherwise;
/// 2. a non-empty general matcher: both placeholders are substituted
///    unconditionally (a template without the query placeholder is *not*
///    an error, unlike the raw-regex case);
/// 3. plain concatenation of rule and symbol.
///
/// Pure function: same inputs always yield the same pattern or error.
pub fn expand_query_pattern(
    rule: &str,
    symbol: &str,
    general_matcher: &str,
) -> Result<String, RuleExpansionError> {
    if rule.contains(REGEX_MARKER) {
        let remainder = rule.replacen(REGEX_MARKER, "", 1);
        if remainder.contains(DEFINITION_TOKEN) {
            return Err(RuleExpansionError::DefinitionTokenInRegexRule {
                rule: rule.to_owned(),
            });
        }
        if remainder.contains(SELECTED_TEXT_TOKEN) {
            return Ok(remainder.replace(SELECTED_TEXT_TOKEN, symbol));
        }
        return Ok(format!("{remainder}{symbol}"));
    }

    if !general_matcher.is_empty() {
        return Ok(general_matcher.replace(DEFINITION_TOKEN, rule).replace(SELECTED_TEXT_TOKEN, symbol));
    }

    Ok(format!("{rule}{symbol}"))
}

/// Expand a rule into the match prefix used to *discover* symbol names.
///
/// The index builder does not know any symbol in advance, so the query
/// placeholder resolves to nothing and a literal rule stands alone.
pub fn expand_discovery_prefix(
    rule: &str,
    general_matcher: &str,
) -> Result<String, RuleExpansionError> {
    expand_query_pattern(rule, "", general_matcher)
}

/// Wrap a discovery prefix into the full discovery pattern: the rule
/// match, an optional separator run, then the captured identifier.
///
/// The identifier group is named so that capture groups inside a user
/// pattern cannot shift it.
pub fn discovery_regex(prefix: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(r"({prefix})(\W*)(?P<sym>\w*)"))
}
