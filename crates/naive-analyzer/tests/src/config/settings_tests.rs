use serde_json::json;

use super::*;

#[test]
fn defaults_are_sane() {
    let settings = ServerSettings::default();
    assert!(settings.rules.definitions.is_empty());
    assert_eq!(settings.rules.file_types, "**/*");
    assert!(settings.rules.general_matcher.is_empty());
    assert!(settings.rules.use_index);
    assert!(settings.indexing.enable);
    assert!(settings.indexing.rebuild_on_save);
}

#[test]
fn scoped_payload_merges_rules_and_clamps_indexing() {
    let payload = json!({
        "naive-analyzer": {
            "rules": {
                "definitions": ["def ", "class "],
                "fileTypes": "**/*.py",
                "generalMatcher": "${DEFINITION}${SELECTED_TEXT}",
                "useIndex": false
            },
            "indexing": { "concurrency": 128, "maxFileSizeKb": 1 }
        }
    });

    let settings = ServerSettings::from_lsp_payload(Some(&payload));
    assert_eq!(settings.rules.definitions, vec!["def ".to_string(), "class ".to_string()]);
    assert_eq!(settings.rules.file_types, "**/*.py");
    assert_eq!(settings.rules.general_matcher, "${DEFINITION}${SELECTED_TEXT}");
    assert!(!settings.rules.use_index);
    assert_eq!(settings.indexing.concurrency, MAX_SCAN_CONCURRENCY);
    assert_eq!(settings.indexing.max_file_size_kb, MAX_FILE_SIZE_KB_FLOOR);
}

#[test]
fn unscoped_payload_is_accepted() {
    let payload = json!({ "rules": { "definitions": ["fn "] } });
    let settings = ServerSettings::from_lsp_payload(Some(&payload));
    assert_eq!(settings.rules.definitions, vec!["fn ".to_string()]);
}

#[test]
fn normalize_drops_empty_rules_and_blank_filter() {
    let payload = json!({ "rules": { "definitions": ["def ", ""], "fileTypes": "   " } });
    let settings = ServerSettings::from_lsp_payload(Some(&payload));
    assert_eq!(settings.rules.definitions, vec!["def ".to_string()]);
    assert_eq!(settings.rules.file_types, "**/*");
}

#[test]
fn merging_an_empty_payload_changes_nothing() {
    let settings = ServerSettings::default();
    assert_eq!(settings, settings.merged_with_payload(&json!({})));
}

#[test]
fn unknown_keys_are_ignored() {
    let payload = json!({
        "naive-analyzer": {
            "rules": { "definitions": ["def "], "someFutureKnob": true },
            "telemetry": { "enable": true }
        }
    });
    let settings = ServerSettings::from_lsp_payload(Some(&payload));
    assert_eq!(settings.rules.definitions, vec!["def ".to_string()]);
}
