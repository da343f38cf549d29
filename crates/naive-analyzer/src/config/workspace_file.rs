use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::config::rules::RulesSettings;

pub const WORKSPACE_RULES_FILENAME: &str = "naive-analyzer.toml";

/// Workspace-local overrides for the rule set, e.g.:
///
/// ```toml
/// definitions = ["def ", "class ", "${regex}=fn\\s+${SELECTED_TEXT}"]
/// file_types = "**/*.py"
/// general_matcher = "(^|\\W)${DEFINITION}${SELECTED_TEXT}"
/// ```
///
/// Unknown keys are rejected silently (parse failure falls back to the
/// editor-supplied settings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct WorkspaceRules {
    pub definitions: Option<Vec<String>>,
    pub file_types: Option<String>,
    pub general_matcher: Option<String>,
}

/// Read and parse `naive-analyzer.toml` at the workspace root.
/// Returns `None` if the file is absent, unreadable or malformed.
pub fn load_workspace_rules(root: &Path) -> Option<WorkspaceRules> {
    let path = root.join(WORKSPACE_RULES_FILENAME);
    let content = std::fs::read_to_string(&path).ok()?;
    match toml::from_str::<WorkspaceRules>(&content) {
        Ok(rules) => {
            debug!("loaded workspace rules from {}", path.display());
            Some(rules)
        },
        Err(error) => {
            debug!("ignoring malformed {}: {error}", path.display());
            None
        },
    }
}

/// The rule settings in effect for one builder/resolver cycle: the
/// editor-supplied settings overlaid with the workspace rule file.
///
/// Called at the start of every cycle so edits to the file are picked up
/// without an editor round-trip.
pub fn effective_rules(
    base: &RulesSettings,
    root: Option<&Path>,
) -> RulesSettings {
    let mut rules = base.clone();
    if let Some(overlay) = root.and_then(load_workspace_rules) {
        if let Some(definitions) = overlay.definitions {
            rules.definitions = definitions;
        }
        if let Some(file_types) = overlay.file_types {
            rules.file_types = file_types;
        }
        if let Some(general_matcher) = overlay.general_matcher {
            rules.general_matcher = general_matcher;
        }
        rules.normalize();
    }
    rules
}
