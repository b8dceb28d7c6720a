//! Integration tests for the Tx3 CLI
//!
//! These tests invoke the actual tx3-cli binary and verify:
//! - Exit codes (0 = clean, 1 = syntax errors, 2 = unreadable file)
//! - stdout/stderr output
//! - JSON output format

use std::path::PathBuf;
use std::process::Command;

// ── Helpers ───────────────────────────────────────────────

fn tx3_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_tx3-cli"))
}

fn fixture_valid(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(format!("../../tests/fixtures/valid/{}", name))
}

fn fixture_invalid(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join(format!("../../tests/fixtures/invalid/{}", name))
}

fn run_tx3(args: &[&str]) -> std::process::Output {
    Command::new(tx3_bin())
        .args(args)
        .env("NO_COLOR", "1")
        .env_remove("TX3_LOG")
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .output()
        .expect("failed to execute tx3-cli")
}

fn tx3_files(dir: &str) -> Vec<PathBuf> {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(dir);
    let mut files: Vec<_> = std::fs::read_dir(&dir)
        .expect("read dir")
        .map(|entry| entry.expect("entry").path())
        .filter(|path| path.extension().is_some_and(|e| e == "tx3"))
        .collect();
    files.sort();
    files
}

// ── Version ───────────────────────────────────────────────

#[test]
fn test_version_command() {
    let output = run_tx3(&["version"]);
    assert!(output.status.success(), "version should exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("tx3-cli"), "should contain 'tx3-cli'");
    assert!(
        stdout.contains(env!("CARGO_PKG_VERSION")),
        "should contain version"
    );
}

#[test]
fn test_version_flag() {
    let output = run_tx3(&["--version"]);
    assert!(output.status.success(), "--version should exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

// ── Check ─────────────────────────────────────────────────

#[test]
fn test_check_valid_file() {
    let output = run_tx3(&["check", fixture_valid("transfer.tx3").to_str().unwrap()]);
    assert!(output.status.success(), "valid file should exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("valid"), "should mention valid");
}

#[test]
fn test_check_invalid_file() {
    let output = run_tx3(&[
        "check",
        fixture_invalid("missing-brace.tx3").to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(1), "invalid file should exit 1");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error"), "should mention error");
    assert!(
        stderr.contains("missing-brace.tx3:8:1: error: Expected '}'"),
        "should render line:column, got: {}",
        stderr
    );
}

#[test]
fn test_check_nonexistent_file() {
    let output = run_tx3(&["check", "nonexistent.tx3"]);
    assert_eq!(output.status.code(), Some(2), "missing file should exit 2");
}

#[test]
fn test_check_json_output() {
    let output = run_tx3(&[
        "check",
        "--json",
        fixture_valid("transfer.tx3").to_str().unwrap(),
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("should be valid JSON");
    assert_eq!(json["valid"], true);
    assert_eq!(json["errors"], 0);
    assert_eq!(json["diagnostics"].as_array().map(Vec::len), Some(0));
}

#[test]
fn test_check_json_invalid() {
    let output = run_tx3(&[
        "check",
        "--json",
        fixture_invalid("bad-token.tx3").to_str().unwrap(),
    ]);
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("should be valid JSON");
    assert_eq!(json["valid"], false);
    assert_eq!(json["diagnostics"][0]["message"], "Expected an expression");
    assert_eq!(json["diagnostics"][0]["severity"], "error");
}

#[test]
fn test_check_quiet_valid() {
    let output = run_tx3(&[
        "--quiet",
        "check",
        fixture_valid("transfer.tx3").to_str().unwrap(),
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.is_empty(), "quiet mode should produce no stdout");
}

#[test]
fn test_verbose_logs_to_stderr_only() {
    let output = run_tx3(&[
        "--verbose",
        "check",
        "--json",
        fixture_valid("transfer.tx3").to_str().unwrap(),
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str::<serde_json::Value>(&stdout).expect("stdout stays JSON");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("parsed tx3 source"), "got: {}", stderr);
}

// ── Tokens ────────────────────────────────────────────────

#[test]
fn test_tokens_lists_significant_tokens() {
    let output = run_tx3(&["tokens", fixture_valid("transfer.tx3").to_str().unwrap()]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let first: Vec<_> = stdout.lines().take(3).collect();
    assert_eq!(
        first,
        vec!["party 'party' 0..5", "IDENTIFIER 'Sender' 6..12", "; ';' 12..13"]
    );
    assert!(!stdout.contains("WHITE_SPACE"));
}

#[test]
fn test_tokens_trivia_flag() {
    let output = run_tx3(&[
        "tokens",
        "--trivia",
        fixture_valid("types.tx3").to_str().unwrap(),
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("LINE_COMMENT"));
    assert!(stdout.contains("WHITE_SPACE"));
}

#[test]
fn test_tokens_json_covers_file() {
    let path = fixture_valid("policies.tx3");
    let output = run_tx3(&["tokens", "--json", "--trivia", path.to_str().unwrap()]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("should be valid JSON");
    let text: String = json
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["text"].as_str().unwrap())
        .collect();
    assert_eq!(text, std::fs::read_to_string(&path).unwrap());
}

// ── Tree ──────────────────────────────────────────────────

#[test]
fn test_tree_dump() {
    let output = run_tx3(&["tree", fixture_valid("transfer.tx3").to_str().unwrap()]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("FILE(0,"));
    assert!(stdout.contains("  PARTY_DECL(0,13)"));
    assert!(stdout.contains("TX_DECL"));
    assert!(stdout.contains("INPUT_BLOCK"));
}

#[test]
fn test_tree_json() {
    let output = run_tx3(&[
        "tree",
        "--json",
        fixture_invalid("missing-brace.tx3").to_str().unwrap(),
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("should be valid JSON");
    assert_eq!(json["root"]["kind"], "File");
    assert!(!json["diagnostics"].as_array().unwrap().is_empty());
}

// ── All fixtures ──────────────────────────────────────────

#[test]
fn test_all_valid_fixtures_check() {
    let files = tx3_files("../../tests/fixtures/valid");
    assert!(!files.is_empty());
    for path in files {
        let output = run_tx3(&["check", path.to_str().unwrap()]);
        assert!(
            output.status.success(),
            "fixture {:?} should check clean: {}",
            path.file_name(),
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

#[test]
fn test_all_invalid_fixtures_fail() {
    let files = tx3_files("../../tests/fixtures/invalid");
    assert!(!files.is_empty());
    for path in files {
        let output = run_tx3(&["check", path.to_str().unwrap()]);
        assert_eq!(
            output.status.code(),
            Some(1),
            "fixture {:?} should fail check",
            path.file_name()
        );
    }
}

// ── Determinism: CLI output ───────────────────────────────

#[test]
fn test_cli_check_determinism_20_iterations() {
    let path = fixture_invalid("missing-brace.tx3")
        .to_str()
        .unwrap()
        .to_string();

    let first = run_tx3(&["check", "--json", &path]);
    let first_stdout = String::from_utf8_lossy(&first.stdout).to_string();

    for i in 0..20 {
        let output = run_tx3(&["check", "--json", &path]);
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        assert_eq!(
            first_stdout, stdout,
            "check --json determinism failure at iteration {}",
            i
        );
    }
}
