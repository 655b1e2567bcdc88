//! Smoke tests for the verify-registry binary: payloads on stdout, failures
//! on stderr with a non-zero exit.

use std::path::Path;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

fn run(db: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_verify-registry"))
        .arg("--db")
        .arg(db)
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("failed to execute verify-registry")
}

fn ledger() -> (TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("ledger.db");
    (dir, db)
}

#[test]
fn test_writes_print_nothing_and_queries_print_json() {
    let (_dir, db) = ledger();

    let out = run(&db, &["addAdmin", "a1", "alice", "pw", "m1"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(out.stdout.is_empty());

    let out = run(&db, &["updateAdmin", "a1", "m2"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let out = run(&db, &["--page-size", "1", "queryAdmin", "alice", "pw"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let parsed: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(parsed[0]["Key"], "a1");
    assert_eq!(parsed[0]["Record"]["message"], serde_json::json!(["m1", "m2"]));
}

#[test]
fn test_documents_persist_across_runs() {
    let (_dir, db) = ledger();

    assert!(run(&db, &["addDocument", "first"]).status.success());
    assert!(run(&db, &["addDocument", "second"]).status.success());

    let out = run(&db, &["queryDocuments"]);
    assert!(out.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let mut bodies: Vec<_> = parsed
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["Record"]["document"].as_str().unwrap().to_string())
        .collect();
    bodies.sort();
    assert_eq!(bodies, vec!["first", "second"]);
}

#[test]
fn test_failures_exit_non_zero() {
    let (_dir, db) = ledger();

    let cases: [&[&str]; 4] = [
        &["dropEverything"],
        &["addDocument"],
        &["addDocument", ""],
        &["updateAdmin", "ghost", "m"],
    ];
    for args in cases {
        let out = run(&db, args);
        assert!(!out.status.success(), "{:?} should fail", args);
        assert!(out.stdout.is_empty(), "{:?} wrote to stdout", args);
        assert!(!out.stderr.is_empty(), "{:?} gave no error message", args);
    }

    let out = run(&db, &["dropEverything"]);
    assert!(String::from_utf8_lossy(&out.stderr).contains("unknown operation"));
}

#[test]
fn test_rejects_invalid_config() {
    let (dir, db) = ledger();
    let config = dir.path().join("registry.json");
    std::fs::write(&config, br#"{"identifier_length":0}"#).unwrap();

    let out = run(&db, &["--config", config.to_str().unwrap(), "queryDocuments"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("identifier_length"));
}
