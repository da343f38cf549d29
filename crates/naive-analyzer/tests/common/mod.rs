#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use naive_analyzer::matcher::RuleSet;
use naive_analyzer::scrub::ScrubPlan;
use naive_analyzer::workspace::{compile_file_filter, enumerate_files};

/// Fresh workspace directory under the system temp dir, keyed by a
/// nanosecond timestamp so parallel tests never collide.
pub fn temp_workspace(tag: &str) -> PathBuf {
    let root = std::env::temp_dir().join(format!(
        "naive-analyzer-test-{tag}-{}",
        std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH).expect("clock drift").as_nanos()
    ));
    fs::create_dir_all(&root).expect("create temp workspace");
    root
}

pub fn write_file(
    root: &Path,
    name: &str,
    contents: &str,
) -> PathBuf {
    let path = root.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(&path, contents).expect("write fixture file");
    path
}

pub fn rule_set(
    definitions: &[&str],
    general_matcher: &str,
) -> RuleSet {
    RuleSet::new(definitions.iter().map(|d| d.to_string()).collect(), general_matcher.to_string())
}

/// A scrub plan covering every file under `root`, with the sentinel
/// landing in `root` as in a real workspace.
pub fn plan_for(
    root: &Path,
    definitions: &[&str],
    general_matcher: &str,
) -> ScrubPlan {
    let filter = compile_file_filter("**/*");
    let files = enumerate_files(&[root.to_path_buf()], &filter, &[], u64::MAX);
    ScrubPlan {
        files,
        rules: rule_set(definitions, general_matcher),
        concurrency: 4,
        sentinel_root: Some(root.to_path_buf()),
    }
}
