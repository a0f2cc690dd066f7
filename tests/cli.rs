//! End-to-end tests for the `cite` binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn cite_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("cite");
    path
}

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let corpus = root.join("corpus");
    fs::create_dir_all(corpus.join("examples")).unwrap();
    fs::create_dir_all(corpus.join("docs")).unwrap();

    fs::write(
        corpus.join("examples/ask-name.yml"),
        "metadata:\n  title: Ask for a name\n---\nquestion: |\n  What is your name?\nfields:\n  - Name: user_name\n",
    )
    .unwrap();
    fs::write(
        corpus.join("docs/fields.md"),
        "# Fields\n\nEach entry under `fields` asks one question.\n",
    )
    .unwrap();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();
    let config_path = config_dir.join("cite.toml");
    fs::write(
        &config_path,
        format!(
            r#"[corpus]
root = "{}"

[search]
default_limit = 5
"#,
            corpus.display()
        ),
    )
    .unwrap();

    (tmp, config_path)
}

fn run_cite(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = cite_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run cite binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

#[test]
fn test_stats() {
    let (_tmp, config_path) = setup_test_env();
    let (stdout, stderr, success) = run_cite(&config_path, &["stats"]);
    assert!(success, "stats failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("Files:       2"));
}

#[test]
fn test_search_prints_ranked_windows() {
    let (_tmp, config_path) = setup_test_env();
    let (stdout, stderr, success) = run_cite(&config_path, &["search", "question"]);
    assert!(success, "search failed: stderr={}", stderr);
    assert!(stdout.starts_with("1. ["));
    assert!(stdout.contains("examples/ask-name.yml:2-8"));
    assert!(stdout.contains("docs/fields.md"));
}

#[test]
fn test_search_scope_flag() {
    let (_tmp, config_path) = setup_test_env();
    let (stdout, _, success) =
        run_cite(&config_path, &["search", "question", "--scope", "docs"]);
    assert!(success);
    assert!(!stdout.contains("examples/ask-name.yml"));

    let (_, _, success) = run_cite(&config_path, &["search", "question", "--scope", "bogus"]);
    assert!(!success);
}

#[test]
fn test_empty_search() {
    let (_tmp, config_path) = setup_test_env();
    let (stdout, _, success) = run_cite(&config_path, &["search", "   "]);
    assert!(success);
    assert!(stdout.contains("No results."));
}

#[test]
fn test_cite_valid_and_invalid() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_cite(
        &config_path,
        &["cite", "examples/ask-name.yml", "4", "5", "--reason", "question text"],
    );
    assert!(success);
    assert!(stdout.contains("examples/ask-name.yml:4-5"));
    assert!(stdout.contains("reason: question text"));
    assert!(stdout.contains("  What is your name?"));

    let (_, stderr, success) = run_cite(&config_path, &["cite", "examples/ask-name.yml", "5", "3"]);
    assert!(!success);
    assert!(stderr.contains("invalid citation"));
}

#[test]
fn test_get_and_example() {
    let (_tmp, config_path) = setup_test_env();

    let (stdout, _, success) = run_cite(&config_path, &["get", "docs/fields.md"]);
    assert!(success);
    assert!(stdout.contains("classification: doc"));

    let (stdout, _, success) = run_cite(&config_path, &["example", "ask-name"]);
    assert!(success);
    assert!(stdout.contains("title:          Ask for a name"));

    let (_, _, success) = run_cite(&config_path, &["get", "docs/missing.md"]);
    assert!(!success);
}

#[test]
fn test_tools_call_outputs_json() {
    let (_tmp, config_path) = setup_test_env();
    let (stdout, stderr, success) = run_cite(
        &config_path,
        &[
            "tools",
            "call",
            "cite",
            "--params",
            r#"{"path": "nonexistent/file.yml", "line_start": 1, "line_end": 2}"#,
        ],
    );
    assert!(success, "tools call failed: {}", stderr);
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["valid"], false);
}

#[test]
fn test_tools_list_without_corpus() {
    let tmp = TempDir::new().unwrap();
    let config_path = tmp.path().join("cite.toml");
    fs::write(&config_path, "[corpus]\nroot = \"/no/such/corpus\"\n").unwrap();

    let (stdout, _, success) = run_cite(&config_path, &["tools", "list"]);
    assert!(success);
    assert!(stdout.contains("\"files_with_keyword\""));
}

#[test]
fn test_missing_corpus_root_exits_nonzero() {
    let tmp = TempDir::new().unwrap();
    let config_path = tmp.path().join("cite.toml");
    fs::write(&config_path, "[corpus]\nroot = \"/no/such/corpus\"\n").unwrap();

    let (_, stderr, success) = run_cite(&config_path, &["stats"]);
    assert!(!success);
    assert!(stderr.contains("Corpus root does not exist"));
}
