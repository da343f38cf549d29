//! Declarative configuration, one file per category.
//!
//! [`ServerSettings`] aggregates all categories and handles JSON
//! deserialization from LSP initialization options and
//! `didChangeConfiguration` payloads. The rule set additionally accepts a
//! workspace-local `naive-analyzer.toml` overlay, re-read at the start of
//! every scrub/search cycle.

pub(crate) mod indexing;
pub(crate) mod logging;
pub(crate) mod rules;
pub(crate) mod workspace_file;

use std::collections::HashMap;

use indexing::IndexingSettingsPatch;
pub use indexing::{
    IndexingSettings, MAX_FILE_SIZE_KB_CEILING, MAX_FILE_SIZE_KB_FLOOR, MAX_SCAN_CONCURRENCY, MIN_SCAN_CONCURRENCY,
};
use logging::LoggingSettingsPatch;
pub use logging::{LogLevel, LoggingSettings};
use rules::RulesSettingsPatch;
pub use rules::RulesSettings;
use serde::Deserialize;
use serde_json::Value;
pub use workspace_file::{WORKSPACE_RULES_FILENAME, WorkspaceRules, effective_rules, load_workspace_rules};

pub const SETTINGS_SECTION_KEY: &str = "naive-analyzer";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ServerSettings {
    pub rules: RulesSettings,
    pub indexing: IndexingSettings,
    pub logging: LoggingSettings,
}

impl ServerSettings {
    pub fn from_lsp_payload(payload: Option<&Value>) -> Self {
        let mut settings = Self::default();
        if let Some(payload) = payload {
            settings = settings.merged_with_payload(payload);
        }
        settings
    }

    pub fn merged_with_payload(
        &self,
        payload: &Value,
    ) -> Self {
        let mut merged = self.clone();

        for candidate in payload_candidates(payload) {
            if let Ok(patch) = serde_json::from_value::<ServerSettingsPatch>(candidate.clone()) {
                merged.apply_patch(patch);
            }
        }

        merged.normalize();
        merged
    }

    fn apply_patch(
        &mut self,
        patch: ServerSettingsPatch,
    ) {
        if let Some(p) = patch.rules {
            self.rules.apply_patch(p);
        }
        if let Some(p) = patch.indexing {
            self.indexing.apply_patch(p);
        }
        if let Some(p) = patch.logging {
            self.logging.apply_patch(p);
        }
    }

    fn normalize(&mut self) {
        self.rules.normalize();
        self.indexing.normalize();
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct ServerSettingsPatch {
    rules: Option<RulesSettingsPatch>,
    indexing: Option<IndexingSettingsPatch>,
    logging: Option<LoggingSettingsPatch>,
    #[serde(flatten)]
    _extra: HashMap<String, Value>,
}

fn payload_candidates(payload: &Value) -> Vec<Value> {
    let mut candidates = Vec::new();
    candidates.push(payload.clone());
    if let Some(scoped) = payload.get(SETTINGS_SECTION_KEY) {
        candidates.push(scoped.clone());
    }
    candidates
}

#[cfg(test)]
#[path = "../../tests/src/config/settings_tests.rs"]
mod tests;
