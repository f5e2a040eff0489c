use assert_cmd::{cargo::cargo_bin_cmd, Command};
use std::process::Output;
use tempfile::TempDir;

/// Get a Command for somnio
pub fn somnio() -> Command {
    cargo_bin_cmd!("somnio")
}

/// Extract the dream ID from add output (first line)
pub fn extract_id(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

/// Setup a test store and return the directory
pub fn setup_test_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    somnio()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();
    dir
}

/// Add a dream with the given extra arguments and return its ID
pub fn add_dream(dir: &TempDir, title: &str, extra: &[&str]) -> String {
    let output = somnio()
        .current_dir(dir.path())
        .arg("add")
        .arg(title)
        .args(extra)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "add failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    extract_id(&output)
}

/// Parse stdout of a `--format json` command
pub fn json_stdout(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

pub const OCEAN: &[&str] = &[
    "-d",
    "swimming in the deep ocean",
    "-t",
    "water",
    "-t",
    "swimming",
    "-e",
    "peaceful",
];

pub const EXAM: &[&str] = &[
    "-d",
    "late for the final exam",
    "-t",
    "school",
    "-e",
    "anxious",
];
