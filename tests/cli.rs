//! Integration tests for the fzr binary in filter and benchmark modes.
//!
//! Interactive mode needs a terminal, so these tests drive the
//! non-interactive `-e/--show-matches` path with candidates on stdin.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tempfile::TempDir;

/// Path to the fzr binary built for this test run
fn fzr_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_fzr"))
}

/// Run fzr with `args`, feeding `input` on stdin, with an isolated config
fn run_fzr_with_config(args: &[&str], input: &[u8], config: &Path) -> (String, String, bool) {
    let mut child = Command::new(fzr_binary())
        .args(args)
        .env("FZR_CONFIG", config)
        .env_remove("FZR_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to run fzr");

    // fzr may exit (e.g. on an argument error) before reading stdin
    if let Err(e) = child.stdin.take().expect("stdin is piped").write_all(input) {
        assert_eq!(e.kind(), std::io::ErrorKind::BrokenPipe, "Failed to write stdin: {e}");
    }

    let output = child.wait_with_output().expect("Failed to wait for fzr");
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.success(),
    )
}

fn run_fzr(args: &[&str], input: &str) -> (String, String, bool) {
    let dir = TempDir::new().unwrap();
    run_fzr_with_config(args, input.as_bytes(), &dir.path().join("missing.json"))
}

#[test]
fn test_show_matches_ranks_results() {
    let (stdout, _, ok) = run_fzr(&["-e", "ts"], "tags\ntest\n");
    assert!(ok);
    assert_eq!(stdout, "test\ntags\n");
}

#[test]
fn test_show_matches_filters() {
    let (stdout, _, ok) = run_fzr(&["-e", "te"], "tags\ntest\n");
    assert!(ok);
    assert_eq!(stdout, "test\n");
}

#[test]
fn test_empty_query_keeps_input_order() {
    let (stdout, _, ok) = run_fzr(&["-e", ""], "zeta\nalpha\nmid\n");
    assert!(ok);
    assert_eq!(stdout, "zeta\nalpha\nmid\n");
}

#[test]
fn test_no_matches_is_success() {
    let (stdout, _, ok) = run_fzr(&["-e", "xyz"], "tags\ntest\n");
    assert!(ok);
    assert!(stdout.is_empty());
}

#[test]
fn test_show_scores() {
    let (stdout, _, ok) = run_fzr(&["-s", "-e", "abc"], "abc\nzzz\n");
    assert!(ok);
    assert_eq!(stdout, "inf\tabc\n");

    let (stdout, _, ok) = run_fzr(&["-s", "-e", "ab"], "axxb\n");
    assert!(ok);
    let (score, candidate) = stdout.trim_end().split_once('\t').unwrap();
    assert_eq!(candidate, "axxb");
    assert!(score.parse::<f64>().unwrap().is_finite());
}

#[test]
fn test_never_colors_when_piped() {
    let (stdout, _, ok) = run_fzr(&["-e", "as"], "tags\n");
    assert!(ok);
    assert!(!stdout.contains('\x1b'));

    let (stdout, _, ok) = run_fzr(&["--color", "always", "-e", "as"], "tags\n");
    assert!(ok);
    assert!(stdout.contains('\x1b'));
}

#[test]
fn test_read0() {
    let dir = TempDir::new().unwrap();
    let (stdout, _, ok) = run_fzr_with_config(
        &["-0", "-e", "b"],
        b"a\nb\0c\0",
        &dir.path().join("missing.json"),
    );
    assert!(ok);
    assert_eq!(stdout, "a\nb\n");
}

#[test]
fn test_custom_delimiter() {
    let (stdout, _, ok) = run_fzr(&["-d", ":", "-e", "bin"], "/usr/bin:/bin:/usr/local/sbin");
    assert!(ok);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "/bin");
}

#[test]
fn test_worker_count_does_not_change_output() {
    let input: String = (0..5_000).map(|i| format!("src/mod{}/file{}.rs\n", i % 31, i)).collect();

    let (single, _, ok1) = run_fzr(&["-j", "1", "-e", "m3f1"], &input);
    let (many, _, ok2) = run_fzr(&["-j", "8", "-e", "m3f1"], &input);
    assert!(ok1 && ok2);
    assert!(!single.is_empty());
    assert_eq!(single, many);
}

#[test]
fn test_benchmark_prints_nothing_to_stdout() {
    let (stdout, _, ok) = run_fzr(&["-e", "t", "-b", "3"], "tags\ntest\n");
    assert!(ok);
    assert!(stdout.is_empty());
}

#[test]
fn test_benchmark_requires_show_matches() {
    let (_, stderr, ok) = run_fzr(&["-b", "3"], "tags\n");
    assert!(!ok);
    assert!(stderr.contains("--show-matches"));
}

#[test]
fn test_lines_validation() {
    let (_, _, ok) = run_fzr(&["-l", "2", "-e", "t"], "tags\n");
    assert!(!ok);

    let (_, _, ok) = run_fzr(&["-l", "max", "-e", "t"], "tags\n");
    assert!(ok);
}

#[test]
fn test_config_file_is_applied() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");
    std::fs::write(&config, r#"{"show_scores": true, "workers": 2}"#).unwrap();

    let (stdout, _, ok) = run_fzr_with_config(&["-e", "abc"], b"abc\n", &config);
    assert!(ok);
    assert_eq!(stdout, "inf\tabc\n");
}

#[test]
fn test_malformed_config_is_an_error() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");
    std::fs::write(&config, "{ not json").unwrap();

    let (_, stderr, ok) = run_fzr_with_config(&["-e", "abc"], b"abc\n", &config);
    assert!(!ok);
    assert!(stderr.contains("Failed to parse config file"));
}

#[test]
fn test_config_lines_are_validated() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");
    std::fs::write(&config, r#"{"lines": 0}"#).unwrap();

    let (_, stderr, ok) = run_fzr_with_config(&["-e", "abc"], b"abc\n", &config);
    assert!(!ok);
    assert!(stderr.contains("invalid line count 0"));

    // a valid flag overrides the file value
    let (stdout, _, ok) = run_fzr_with_config(&["-l", "5", "-e", "abc"], b"abc\n", &config);
    assert!(ok);
    assert_eq!(stdout, "abc\n");
}
