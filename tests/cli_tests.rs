//! Integration tests for the somnio CLI

mod support;

use predicates::prelude::*;
use support::{add_dream, json_stdout, setup_test_dir, somnio, EXAM, OCEAN};
use tempfile::tempdir;

// ============================================================================
// Help, version and exit codes
// ============================================================================

#[test]
fn test_help_flag() {
    somnio()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: somnio"))
        .stdout(predicate::str::contains("recalculate"))
        .stdout(predicate::str::contains("similar"));
}

#[test]
fn test_version_flag() {
    somnio()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("somnio"));
}

#[test]
fn test_unknown_command_exit_code_2() {
    somnio().arg("nonexistent").assert().code(2);
}

#[test]
fn test_unknown_argument_json_usage_error() {
    somnio()
        .args(["--format", "json", "list", "--bogus-flag"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("\"type\":\"usage_error\""));
}

#[test]
fn test_missing_store_exit_code_3() {
    let dir = tempdir().unwrap();
    somnio()
        .current_dir(dir.path())
        .arg("list")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("store not found"));
}

// ============================================================================
// Init
// ============================================================================

#[test]
fn test_init_creates_store() {
    let dir = tempdir().unwrap();
    somnio()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized somnio store"));

    assert!(dir.path().join(".somnio/config.toml").exists());
    assert!(dir.path().join(".somnio/somnio.db").exists());
}

#[test]
fn test_init_idempotent() {
    let dir = setup_test_dir();
    somnio()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();
}

#[test]
fn test_explicit_store_path() {
    let dir = tempdir().unwrap();
    somnio()
        .current_dir(dir.path())
        .args(["--store", "journal", "init"])
        .assert()
        .success();
    assert!(dir.path().join("journal/somnio.db").exists());

    somnio()
        .current_dir(dir.path())
        .args(["--store", "journal", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No dreams found"));
}

// ============================================================================
// Dream records
// ============================================================================

#[test]
fn test_add_list_show() {
    let dir = setup_test_dir();
    let id = add_dream(&dir, "Ocean swim", OCEAN);
    assert!(id.starts_with("dr-"));

    somnio()
        .current_dir(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains(&id))
        .stdout(predicate::str::contains("[water, swimming]"));

    somnio()
        .current_dir(dir.path())
        .args(["show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("emotion: peaceful"))
        .stdout(predicate::str::contains("swimming in the deep ocean"));
}

#[test]
fn test_add_json_returns_dream() {
    let dir = setup_test_dir();
    let output = somnio()
        .current_dir(dir.path())
        .args(["--format", "json", "add", "Ocean swim", "--private", "-u", "ana"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let dream = json_stdout(&output);
    assert_eq!(dream["title"], "Ocean swim");
    assert_eq!(dream["isPublic"], false);
    assert_eq!(dream["userId"], "ana");
}

#[test]
fn test_add_empty_title_is_usage_error() {
    let dir = setup_test_dir();
    somnio()
        .current_dir(dir.path())
        .args(["add", "  "])
        .assert()
        .code(2);
}

#[test]
fn test_list_filters_by_visibility_and_user() {
    let dir = setup_test_dir();
    let public = add_dream(&dir, "Shared", &["-u", "ana"]);
    let private = add_dream(&dir, "Hidden", &["-u", "ana", "--private"]);
    let other = add_dream(&dir, "Other", &["-u", "ben"]);

    somnio()
        .current_dir(dir.path())
        .args(["list", "--public"])
        .assert()
        .success()
        .stdout(predicate::str::contains(&public))
        .stdout(predicate::str::contains(&other))
        .stdout(predicate::str::contains(&private).not());

    somnio()
        .current_dir(dir.path())
        .args(["list", "--user", "ana"])
        .assert()
        .success()
        .stdout(predicate::str::contains(&public))
        .stdout(predicate::str::contains(&private))
        .stdout(predicate::str::contains(&other).not());
}

#[test]
fn test_show_missing_dream_json_envelope() {
    let dir = setup_test_dir();
    somnio()
        .current_dir(dir.path())
        .args(["--format", "json", "show", "dr-missing"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("\"type\":\"not_found\""));
}

#[test]
fn test_update_without_fields_is_usage_error() {
    let dir = setup_test_dir();
    let id = add_dream(&dir, "Ocean swim", OCEAN);
    somnio()
        .current_dir(dir.path())
        .args(["update", &id])
        .assert()
        .code(2);
}

#[test]
fn test_update_missing_dream_exit_code_3() {
    let dir = setup_test_dir();
    somnio()
        .current_dir(dir.path())
        .args(["update", "dr-missing", "--title", "x"])
        .assert()
        .code(3);
}

#[test]
fn test_delete_removes_dream() {
    let dir = setup_test_dir();
    let id = add_dream(&dir, "Ocean swim", OCEAN);

    somnio()
        .current_dir(dir.path())
        .args(["delete", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted"));

    somnio()
        .current_dir(dir.path())
        .args(["show", &id])
        .assert()
        .code(3);

    somnio()
        .current_dir(dir.path())
        .args(["delete", &id])
        .assert()
        .code(3);
}

// ============================================================================
// Relationships
// ============================================================================

#[test]
fn test_add_links_similar_public_dreams() {
    let dir = setup_test_dir();
    let first = add_dream(&dir, "Ocean swim", OCEAN);
    let second = add_dream(&dir, "Ocean swim", OCEAN);
    let exam = add_dream(&dir, "Exam", EXAM);
    let mut private_args = OCEAN.to_vec();
    private_args.push("--private");
    let private = add_dream(&dir, "Ocean swim", &private_args);

    let output = somnio()
        .current_dir(dir.path())
        .args(["--format", "json", "similar", &first])
        .output()
        .unwrap();
    assert!(output.status.success());

    let similar = json_stdout(&output);
    let similar = similar.as_array().unwrap();
    assert_eq!(similar.len(), 1);
    assert_eq!(similar[0]["dream"]["id"], second.as_str());
    assert_eq!(similar[0]["similarity"], 1.0);

    somnio()
        .current_dir(dir.path())
        .args(["similar", &exam])
        .assert()
        .success()
        .stdout(predicate::str::contains("No similar dreams"));

    somnio()
        .current_dir(dir.path())
        .args(["similar", &private, "--min", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No similar dreams"));
}

#[test]
fn test_update_refreshes_links() {
    let dir = setup_test_dir();
    let ocean = add_dream(&dir, "Ocean swim", OCEAN);
    let exam = add_dream(&dir, "Exam", EXAM);

    somnio()
        .current_dir(dir.path())
        .args([
            "update",
            &exam,
            "-t",
            "water",
            "-t",
            "swimming",
            "-e",
            "peaceful",
        ])
        .assert()
        .success();

    somnio()
        .current_dir(dir.path())
        .args(["similar", &exam, "--min", "0.6"])
        .assert()
        .success()
        .stdout(predicate::str::contains(&ocean));
}

#[test]
fn test_delete_removes_links() {
    let dir = setup_test_dir();
    let first = add_dream(&dir, "Ocean swim", OCEAN);
    let second = add_dream(&dir, "Ocean swim", OCEAN);

    somnio()
        .current_dir(dir.path())
        .args(["delete", &second])
        .assert()
        .success();

    somnio()
        .current_dir(dir.path())
        .args(["similar", &first, "--min", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No similar dreams"));
}

#[test]
fn test_recalculate_json_summary() {
    let dir = setup_test_dir();
    add_dream(&dir, "Ocean swim", OCEAN);
    add_dream(&dir, "Ocean swim", OCEAN);
    add_dream(&dir, "Exam", EXAM);

    let output = somnio()
        .current_dir(dir.path())
        .args(["--format", "json", "recalculate"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let summary = json_stdout(&output);
    assert_eq!(summary["processedCount"], 3);
    assert_eq!(summary["relationshipsCreated"], 1);

    somnio()
        .current_dir(dir.path())
        .arg("recalculate")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Processed 3 dreams, created 1 relationships",
        ));
}

#[test]
fn test_recalculate_rejects_out_of_range_threshold() {
    let dir = setup_test_dir();
    somnio()
        .current_dir(dir.path())
        .args(["recalculate", "--min", "1.5"])
        .assert()
        .code(2);
}

#[test]
fn test_explain_reports_components() {
    let dir = setup_test_dir();
    let a = add_dream(&dir, "Ocean swim", OCEAN);
    let b = add_dream(&dir, "Exam", EXAM);

    let output = somnio()
        .current_dir(dir.path())
        .args(["--format", "json", "explain", &a, &b])
        .output()
        .unwrap();
    assert!(output.status.success());

    let explanation = json_stdout(&output);
    assert_eq!(explanation["score"], 0.0);
    assert_eq!(explanation["sameEmotion"], false);
    assert!(explanation["sharedTags"].as_array().unwrap().is_empty());

    somnio()
        .current_dir(dir.path())
        .args(["explain", &a, "dr-missing"])
        .assert()
        .code(3);
}

#[test]
fn test_link_validation_exit_codes() {
    let dir = setup_test_dir();
    let a = add_dream(&dir, "Ocean swim", OCEAN);
    let b = add_dream(&dir, "Exam", EXAM);

    somnio()
        .current_dir(dir.path())
        .args(["link", &a, &a, "-s", "0.5"])
        .assert()
        .code(2);

    somnio()
        .current_dir(dir.path())
        .args(["link", &a, "dr-missing", "-s", "0.5"])
        .assert()
        .code(3);

    somnio()
        .current_dir(dir.path())
        .args(["link", &a, &b, "-s", "1.5"])
        .assert()
        .code(2);

    somnio()
        .current_dir(dir.path())
        .args(["link", &a, &b, "-s", "0.8", "--theme", "water"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0.800"));

    somnio()
        .current_dir(dir.path())
        .args(["similar", &b])
        .assert()
        .success()
        .stdout(predicate::str::contains(&a));
}

#[test]
fn test_network_lists_connections() {
    let dir = setup_test_dir();
    let first = add_dream(&dir, "Ocean swim", OCEAN);
    let second = add_dream(&dir, "Ocean swim", OCEAN);
    add_dream(&dir, "Exam", EXAM);

    let output = somnio()
        .current_dir(dir.path())
        .args(["--format", "json", "network"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let network = json_stdout(&output);
    let nodes = network.as_array().unwrap();
    assert_eq!(nodes.len(), 3);

    let node = nodes
        .iter()
        .find(|n| n["dream"]["id"] == first.as_str())
        .unwrap();
    assert_eq!(node["connections"][0]["targetId"], second.as_str());
}

#[test]
fn test_network_links_show_shared_themes() {
    let dir = setup_test_dir();
    let first = add_dream(&dir, "Ocean swim", OCEAN);
    let second = add_dream(&dir, "Ocean swim", OCEAN);
    add_dream(&dir, "Exam", EXAM);

    let output = somnio()
        .current_dir(dir.path())
        .args(["--format", "json", "network", "--links"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let network = json_stdout(&output);
    let links = network["links"].as_array().unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0]["source"], second.as_str());
    assert_eq!(links[0]["target"], first.as_str());
    assert_eq!(links[0]["sharedThemes"], serde_json::json!(["water", "swimming"]));
    assert_eq!(network["nodes"].as_array().unwrap().len(), 2);

    somnio()
        .current_dir(dir.path())
        .args(["network", "--links"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[water, swimming]"));

    somnio()
        .current_dir(dir.path())
        .args(["network", "--links", "--min", "0.5"])
        .assert()
        .code(2);
}
