use std::fs;
use std::path::PathBuf;

use super::*;

fn temp_root(tag: &str) -> PathBuf {
    let root = std::env::temp_dir().join(format!(
        "naive-analyzer-{tag}-{}",
        std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH).expect("clock drift").as_nanos()
    ));
    fs::create_dir_all(&root).expect("create temp root");
    root
}

fn names(files: &[PathBuf]) -> Vec<String> {
    files.iter().filter_map(|p| p.file_name()).map(|n| n.to_string_lossy().into_owned()).collect()
}

#[test]
fn glob_filter_limits_enumeration() {
    let root = temp_root("glob");
    fs::write(root.join("a.py"), "def foo(): pass").expect("write");
    fs::write(root.join("b.txt"), "nothing").expect("write");
    fs::create_dir_all(root.join("nested")).expect("mkdir");
    fs::write(root.join("nested").join("c.py"), "def bar(): pass").expect("write");

    let filter = compile_file_filter("**/*.py");
    let files = enumerate_files(&[root.clone()], &filter, &[], u64::MAX);
    assert_eq!(names(&files), vec!["a.py", "c.py"]);

    let _ = fs::remove_dir_all(root);
}

#[test]
fn hidden_directories_are_not_descended() {
    let root = temp_root("hidden");
    fs::write(root.join("seen.py"), "x").expect("write");
    fs::create_dir_all(root.join(".cache")).expect("mkdir");
    fs::write(root.join(".cache").join("unseen.py"), "x").expect("write");

    let filter = compile_file_filter("**/*.py");
    let files = enumerate_files(&[root.clone()], &filter, &[], u64::MAX);
    assert_eq!(names(&files), vec!["seen.py"]);

    let _ = fs::remove_dir_all(root);
}

#[test]
fn exclude_prefixes_are_skipped() {
    let root = temp_root("exclude");
    fs::write(root.join("kept.py"), "x").expect("write");
    fs::create_dir_all(root.join("vendor")).expect("mkdir");
    fs::write(root.join("vendor").join("dropped.py"), "x").expect("write");

    let filter = compile_file_filter("**/*.py");
    let files = enumerate_files(&[root.clone()], &filter, &["vendor".to_string()], u64::MAX);
    assert_eq!(names(&files), vec!["kept.py"]);

    let _ = fs::remove_dir_all(root);
}

#[test]
fn oversized_files_are_skipped() {
    let root = temp_root("size");
    fs::write(root.join("small.py"), "ok").expect("write");
    fs::write(root.join("large.py"), "x".repeat(1024)).expect("write");

    let filter = compile_file_filter("**/*.py");
    let files = enumerate_files(&[root.clone()], &filter, &[], 16);
    assert_eq!(names(&files), vec!["small.py"]);

    let _ = fs::remove_dir_all(root);
}

#[test]
fn empty_and_invalid_filters_match_everything() {
    let root = temp_root("fallback");
    fs::write(root.join("a.py"), "x").expect("write");

    for pattern in ["", "   ", "[invalid"] {
        let filter = compile_file_filter(pattern);
        let files = enumerate_files(&[root.clone()], &filter, &[], u64::MAX);
        assert_eq!(names(&files), vec!["a.py"], "pattern {pattern:?}");
    }

    let _ = fs::remove_dir_all(root);
}

#[test]
fn saved_file_matches_filter_relative_to_root() {
    let root = temp_root("saved");
    fs::create_dir_all(root.join("src")).expect("mkdir");
    let saved = root.join("src").join("mod.py");
    fs::write(&saved, "x").expect("write");

    let filter = compile_file_filter("**/*.py");
    let roots = vec![root.clone()];
    assert!(file_matches_filter(&filter, &roots, &saved));
    assert!(!file_matches_filter(&filter, &roots, &root.join("src").join("notes.txt")));

    let _ = fs::remove_dir_all(root);
}
