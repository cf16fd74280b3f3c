use serial_test::serial;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;

const BIN: &str = env!("CARGO_BIN_EXE_bucket-store");

fn run(file: &Path, args: &[&str]) -> Output {
    Command::new(BIN)
        .arg(file)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute process")
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
#[serial]
fn test_create_insert_scan() {
    let dir = tempdir().expect("Failed to create temp dir");
    let primary = dir.path().join("people.db");

    let output = run(&primary, &["create", "--buckets", "12"]);
    assert!(output.status.success(), "Create failed: {:?}", output);

    for id in 1..=17 {
        let id = id.to_string();
        let surname = format!("Surname{id}");
        let output = run(&primary, &["insert", &id, "Name", &surname, "Street"]);
        assert!(output.status.success(), "Insert failed: {:?}", output);
    }

    let output = run(&primary, &["scan", "--id", "5"]);
    assert!(output.status.success(), "Scan failed: {:?}", output);
    let stdout = stdout_of(&output);
    assert!(
        stdout.contains("ID: 5, Name: Name, Surname: Surname5, Address: Street"),
        "Unexpected scan output: {:?}",
        stdout
    );
    assert!(stdout.contains("BLOCKS VISITED:"));
    assert!(stdout.trim_end().ends_with('3'), "Unexpected scan output: {:?}", stdout);

    let output = run(&primary, &["scan"]);
    assert_eq!(stdout_of(&output).matches("ID: ").count(), 17);
}

#[test]
#[serial]
fn test_duplicate_and_missing_keys_fail() {
    let dir = tempdir().expect("Failed to create temp dir");
    let primary = dir.path().join("people.db");

    assert!(run(&primary, &["create", "--buckets", "3"]).status.success());
    assert!(run(&primary, &["insert", "1", "A", "B", "C"]).status.success());

    let output = run(&primary, &["insert", "1", "A", "B", "C"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("already exists"));

    let output = run(&primary, &["delete", "2"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("not found"));

    assert!(run(&primary, &["delete", "1"]).status.success());
    assert_eq!(run(&primary, &["scan", "--id", "1"]).status.code(), Some(1));
}

#[test]
#[serial]
fn test_field_too_long_is_rejected() {
    let dir = tempdir().expect("Failed to create temp dir");
    let primary = dir.path().join("people.db");

    assert!(run(&primary, &["create", "--buckets", "3"]).status.success());

    let long_name = "x".repeat(15);
    let output = run(&primary, &["insert", "1", &long_name, "B", "C"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid record"));
}

#[test]
#[serial]
fn test_index_and_lookup() {
    let dir = tempdir().expect("Failed to create temp dir");
    let primary = dir.path().join("people.db");
    let index = dir.path().join("people.surname.db");
    let primary_arg = primary.to_str().expect("utf-8 path");

    assert!(run(&primary, &["create", "--buckets", "5"]).status.success());
    assert!(run(&primary, &["insert", "1", "Ada", "Lovelace", "London"]).status.success());

    let output = run(&index, &["index", "--buckets", "3", "--primary", primary_arg]);
    assert!(output.status.success(), "Index failed: {:?}", output);

    let output = run(
        &index,
        &["index-insert", "2", "Alan", "Turing", "Wilmslow", "--primary", primary_arg],
    );
    assert!(output.status.success(), "Index-insert failed: {:?}", output);

    let output = run(&index, &["lookup", "Turing", "--primary", primary_arg]);
    assert!(output.status.success(), "Lookup failed: {:?}", output);
    assert!(stdout_of(&output).contains("ID: 2, Name: Alan, Surname: Turing"));

    let output = run(&index, &["lookup", "Lovelace", "--primary", primary_arg]);
    assert!(stdout_of(&output).contains("ID: 1, Name: Ada"));

    let output = run(&index, &["lookup", "Hopper", "--primary", primary_arg]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
#[serial]
fn test_stats_output() {
    let dir = tempdir().expect("Failed to create temp dir");
    let primary = dir.path().join("people.db");

    assert!(run(&primary, &["create", "--buckets", "12"]).status.success());
    for id in 1..=17 {
        let id = id.to_string();
        assert!(run(&primary, &["insert", &id, "N", "S", "A"]).status.success());
    }

    let output = run(&primary, &["stats"]);
    assert!(output.status.success(), "Stats failed: {:?}", output);

    let stdout = stdout_of(&output);
    for expected in [
        "FILE BLOCKS:",
        "BUCKETS WITH DATA:",
        "TOTAL ELEMENTS:",
        "OVERFLOW BLOCKS:",
    ] {
        assert!(stdout.contains(expected), "Missing {expected:?} in {stdout:?}");
    }
    let reports = |label: &str, value: &str| {
        stdout
            .lines()
            .any(|line| line.starts_with(label) && line.ends_with(value))
    };
    assert!(reports("FILE BLOCKS:", " 12"));
    assert!(reports("BUCKETS WITH DATA:", " 10"));
}

#[test]
#[serial]
fn test_missing_file_fails() {
    let dir = tempdir().expect("Failed to create temp dir");
    let output = run(&dir.path().join("absent.db"), &["scan"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(!output.stderr.is_empty());
}
