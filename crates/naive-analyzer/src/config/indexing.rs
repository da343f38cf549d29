use std::collections::{HashMap, HashSet};

use serde::Deserialize;
use serde_json::Value;

pub const MIN_SCAN_CONCURRENCY: usize = 1;
pub const MAX_SCAN_CONCURRENCY: usize = 32;
pub const MAX_FILE_SIZE_KB_FLOOR: u64 = 16;
pub const MAX_FILE_SIZE_KB_CEILING: u64 = 1024 * 64;

#[derive(Debug, Clone, PartialEq)]
pub struct IndexingSettings {
    pub enable: bool,
    pub rebuild_on_save: bool,
    pub concurrency: usize,
    pub max_file_size_kb: u64,
    pub exclude_paths: Vec<String>,
}

impl Default for IndexingSettings {
    fn default() -> Self {
        Self {
            enable: true,
            rebuild_on_save: true,
            concurrency: 8,
            max_file_size_kb: 512,
            exclude_paths: Vec::new(),
        }
    }
}

impl IndexingSettings {
    pub(crate) fn apply_patch(
        &mut self,
        patch: IndexingSettingsPatch,
    ) {
        if let Some(v) = patch.enable {
            self.enable = v;
        }
        if let Some(v) = patch.rebuild_on_save {
            self.rebuild_on_save = v;
        }
        if let Some(v) = patch.concurrency {
            self.concurrency = v;
        }
        if let Some(v) = patch.max_file_size_kb {
            self.max_file_size_kb = v;
        }
        if let Some(v) = patch.exclude_paths {
            self.exclude_paths = v;
        }
    }

    pub(crate) fn normalize(&mut self) {
        self.concurrency = self.concurrency.clamp(MIN_SCAN_CONCURRENCY, MAX_SCAN_CONCURRENCY);
        self.max_file_size_kb = self.max_file_size_kb.clamp(MAX_FILE_SIZE_KB_FLOOR, MAX_FILE_SIZE_KB_CEILING);
        let mut seen = HashSet::new();
        self.exclude_paths = self
            .exclude_paths
            .iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .filter(|p| seen.insert(p.clone()))
            .collect();
    }

    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_kb.saturating_mul(1024)
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct IndexingSettingsPatch {
    pub(crate) enable: Option<bool>,
    pub(crate) rebuild_on_save: Option<bool>,
    pub(crate) concurrency: Option<usize>,
    pub(crate) max_file_size_kb: Option<u64>,
    pub(crate) exclude_paths: Option<Vec<String>>,
    #[serde(flatten)]
    pub(crate) _extra: HashMap<String, Value>,
}
