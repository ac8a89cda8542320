//! Integration tests for the `tagpick` CLI.
//!
//! Each test creates a temp directory holding a `tagpick.toml` and a small
//! tag corpus, runs `tagpick` as a subprocess, and verifies stdout and/or the
//! state file.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Get the path to the built `tagpick` binary.
fn tagpick_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_tagpick"))
}

/// Create a config and corpus in the given directory.
fn create_test_workspace(root: &Path) {
    fs::write(
        root.join("tagpick.toml"),
        r#"[search]
corpus = "tags.csv"
limit = 3

[storage]
path = "state.json"
"#,
    )
    .unwrap();

    fs::write(
        root.join("tags.csv"),
        "\
tag,times_used
1girl,5000
long_hair,3200
red_eyes,1200
Red_Hair,800
short_hair,700
dark_red,12
smile,
",
    )
    .unwrap();
}

/// Run `tagpick` with the given args in the given directory, returning (stdout, stderr, success).
fn run_tp(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(tagpick_bin())
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run tagpick");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `tagpick` expecting success, return stdout.
fn run_tp_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_tp(dir, args);
    if !success {
        panic!(
            "tagpick {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

fn read_state(dir: &Path) -> serde_json::Value {
    let text = fs::read_to_string(dir.join("state.json")).unwrap();
    serde_json::from_str(&text).unwrap()
}

// ---------------------------------------------------------------------------
// Collection commands
// ---------------------------------------------------------------------------

#[test]
fn test_add_then_list() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_workspace(tmp.path());

    let out = run_tp_ok(tmp.path(), &["add", "1girl", "blue_eyes"]);
    assert_eq!(out, "1girl\nblue_eyes\n");

    let out = run_tp_ok(tmp.path(), &["list"]);
    assert_eq!(out, "1girl\nblue_eyes\n");
}

#[test]
fn test_add_skips_duplicates_and_blanks() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_workspace(tmp.path());

    run_tp_ok(tmp.path(), &["add", "smile"]);
    let (stdout, stderr, success) = run_tp(tmp.path(), &["add", "smile", "  ", "1girl"]);
    assert!(success);
    assert_eq!(stdout, "1girl\n");
    assert!(stderr.contains("skipped smile (already picked)"));
    assert!(stderr.contains("skipped blank tag"));
}

#[test]
fn test_snapshot_is_stored_under_saved_prompt() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_workspace(tmp.path());

    run_tp_ok(tmp.path(), &["add", "a", "b"]);
    let state = read_state(tmp.path());
    assert_eq!(state["saved_prompt"], serde_json::json!(["a", "b"]));
}

#[test]
fn test_list_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_workspace(tmp.path());

    run_tp_ok(tmp.path(), &["add", "x", "y"]);
    let out = run_tp_ok(tmp.path(), &["list", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    let arr = parsed.as_array().unwrap();
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[1]["position"], 1);
    assert_eq!(arr[1]["label"], "y");
}

#[test]
fn test_remove() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_workspace(tmp.path());

    run_tp_ok(tmp.path(), &["add", "a", "b", "c"]);
    run_tp_ok(tmp.path(), &["remove", "b"]);
    assert_eq!(run_tp_ok(tmp.path(), &["list"]), "a\nc\n");

    let (_, stderr, success) = run_tp(tmp.path(), &["remove", "zzz"]);
    assert!(!success);
    assert!(stderr.contains("tag not found: zzz"));
}

#[test]
fn test_mv_positions() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_workspace(tmp.path());

    run_tp_ok(tmp.path(), &["add", "a", "b", "c", "d"]);
    run_tp_ok(tmp.path(), &["mv", "a", "2"]);
    assert_eq!(run_tp_ok(tmp.path(), &["export"]), "b, c, a, d\n");

    run_tp_ok(tmp.path(), &["mv", "d", "--top"]);
    assert_eq!(run_tp_ok(tmp.path(), &["export"]), "d, b, c, a\n");

    // Past the end clamps to the last slot
    run_tp_ok(tmp.path(), &["mv", "d", "99"]);
    assert_eq!(run_tp_ok(tmp.path(), &["export"]), "b, c, a, d\n");
}

#[test]
fn test_mv_unknown_tag_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_workspace(tmp.path());

    run_tp_ok(tmp.path(), &["add", "a"]);
    let (_, stderr, success) = run_tp(tmp.path(), &["mv", "nope", "0"]);
    assert!(!success);
    assert!(stderr.contains("tag not found: nope"));
}

#[test]
fn test_clear_requires_yes() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_workspace(tmp.path());

    run_tp_ok(tmp.path(), &["add", "a", "b"]);
    let (_, stderr, success) = run_tp(tmp.path(), &["clear"]);
    assert!(!success);
    assert!(stderr.contains("without --yes"));
    assert_eq!(run_tp_ok(tmp.path(), &["list"]), "a\nb\n");

    let out = run_tp_ok(tmp.path(), &["clear", "--yes"]);
    assert_eq!(out, "cleared 2 tags\n");
    assert_eq!(run_tp_ok(tmp.path(), &["list"]), "");
    assert!(!tmp.path().join("state.json").exists());
}

#[test]
fn test_export_separator_override() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_workspace(tmp.path());

    run_tp_ok(tmp.path(), &["add", "1girl", "smile"]);
    assert_eq!(
        run_tp_ok(tmp.path(), &["export", "--separator", " | "]),
        "1girl | smile\n"
    );
}

#[test]
fn test_ephemeral_writes_nothing() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_workspace(tmp.path());

    run_tp_ok(tmp.path(), &["--ephemeral", "add", "a"]);
    assert!(!tmp.path().join("state.json").exists());
}

#[test]
fn test_malformed_state_reads_as_empty() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_workspace(tmp.path());

    fs::write(tmp.path().join("state.json"), "{not json").unwrap();
    assert_eq!(run_tp_ok(tmp.path(), &["list"]), "");
    run_tp_ok(tmp.path(), &["add", "fresh"]);
    assert_eq!(run_tp_ok(tmp.path(), &["list"]), "fresh\n");
}

#[test]
fn test_clear_removes_malformed_state() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_workspace(tmp.path());

    fs::write(tmp.path().join("state.json"), r#"{"saved_prompt": "oops"}"#).unwrap();
    assert_eq!(run_tp_ok(tmp.path(), &["list"]), "");
    assert_eq!(run_tp_ok(tmp.path(), &["clear"]), "cleared 0 tags\n");
    assert!(!tmp.path().join("state.json").exists());
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[test]
fn test_search_corpus_case_insensitive_and_limited() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_workspace(tmp.path());

    let out = run_tp_ok(tmp.path(), &["search", "RED"]);
    assert_eq!(out, "red_eyes\t1200 uses\nRed_Hair\t800 uses\ndark_red\t12 uses\n");

    let out = run_tp_ok(tmp.path(), &["search", "hair"]);
    assert_eq!(out.lines().count(), 3);
}

#[test]
fn test_search_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_workspace(tmp.path());

    let out = run_tp_ok(tmp.path(), &["search", "smile", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed, serde_json::json!([{ "label": "smile" }]));
}

#[test]
fn test_search_no_results() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_workspace(tmp.path());

    let (stdout, stderr, success) = run_tp(tmp.path(), &["search", "qqq"]);
    assert!(success);
    assert_eq!(stdout, "");
    assert!(stderr.contains("No results found"));
}

#[test]
fn test_search_without_backend_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(tmp.path().join("tagpick.toml"), "[storage]\npath = \"state.json\"\n").unwrap();

    let (_, stderr, success) = run_tp(tmp.path(), &["search", "red"]);
    assert!(!success);
    assert!(stderr.contains("no search backend configured"));
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[test]
fn test_config_discovered_from_subdirectory() {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_workspace(tmp.path());
    let nested = tmp.path().join("a/b");
    fs::create_dir_all(&nested).unwrap();

    run_tp_ok(&nested, &["add", "deep"]);
    assert_eq!(read_state(tmp.path())["saved_prompt"], serde_json::json!(["deep"]));
}

#[test]
fn test_bad_config_is_an_error() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(tmp.path().join("tagpick.toml"), "[search\n").unwrap();

    let (_, stderr, success) = run_tp(tmp.path(), &["list"]);
    assert!(!success);
    assert!(stderr.starts_with("error: could not parse"));
}
