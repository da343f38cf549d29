use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

/// The user-supplied definition rule list and its companions.
///
/// `definitions` keeps its configured order; rule order decides match
/// priority everywhere in the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct RulesSettings {
    pub definitions: Vec<String>,
    pub file_types: String,
    pub general_matcher: String,
    pub use_index: bool,
}

impl Default for RulesSettings {
    fn default() -> Self {
        Self {
            definitions: Vec::new(),
            file_types: "**/*".to_string(),
            general_matcher: String::new(),
            use_index: true,
        }
    }
}

impl RulesSettings {
    pub(crate) fn apply_patch(
        &mut self,
        patch: RulesSettingsPatch,
    ) {
        if let Some(v) = patch.definitions {
            self.definitions = v;
        }
        if let Some(v) = patch.file_types {
            self.file_types = v;
        }
        if let Some(v) = patch.general_matcher {
            self.general_matcher = v;
        }
        if let Some(v) = patch.use_index {
            self.use_index = v;
        }
    }

    pub(crate) fn normalize(&mut self) {
        self.definitions.retain(|rule| !rule.is_empty());
        if self.file_types.trim().is_empty() {
            self.file_types = "**/*".to_string();
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct RulesSettingsPatch {
    pub(crate) definitions: Option<Vec<String>>,
    pub(crate) file_types: Option<String>,
    pub(crate) general_matcher: Option<String>,
    pub(crate) use_index: Option<bool>,
    #[serde(flatten)]
    pub(crate) _extra: HashMap<String, Value>,
}
