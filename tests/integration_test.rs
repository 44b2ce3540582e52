//! Integration tests for the pix-ledger CLI.
//!
//! These tests run the actual binary and verify output against expected CSV files.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::io::Write;
use tempfile::NamedTempFile;

/// Get path to test data file
fn test_data_path(filename: &str) -> String {
    format!("tests/data/{}", filename)
}

/// Run the binary with the given arguments and return stdout
fn run_ledger(args: &[&str]) -> String {
    let mut cmd = Command::cargo_bin("pix-ledger").unwrap();
    let assert = cmd.args(args).assert().success();
    String::from_utf8(assert.get_output().stdout.clone()).unwrap()
}

/// Normalize CSV for comparison (trim whitespace, drop blank lines).
/// Row order is significant: accounts print in registration order.
fn normalize_csv(csv: &str) -> Vec<String> {
    csv.lines()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}

fn script_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_sample_a_transfers_and_credit() {
    let output = run_ledger(&[&test_data_path("sample_a_transfers.csv")]);
    let expected = fs::read_to_string(test_data_path("expected_a.csv")).unwrap();

    assert_eq!(normalize_csv(&output), normalize_csv(&expected));
}

#[test]
fn test_sample_a_history() {
    let output = run_ledger(&[&test_data_path("sample_a_transfers.csv"), "--history"]);
    let expected = fs::read_to_string(test_data_path("expected_a_history.csv")).unwrap();

    assert_eq!(normalize_csv(&output), normalize_csv(&expected));
}

#[test]
fn test_sample_b_rejected_rows_are_skipped() {
    let output = run_ledger(&[&test_data_path("sample_b_rejections.csv")]);
    let expected = fs::read_to_string(test_data_path("expected_b.csv")).unwrap();

    assert_eq!(normalize_csv(&output), normalize_csv(&expected));
}

#[test]
fn test_rejected_rows_are_logged() {
    let mut cmd = Command::cargo_bin("pix-ledger").unwrap();
    cmd.env("RUST_LOG", "warn")
        .arg(test_data_path("sample_b_rejections.csv"))
        .assert()
        .success()
        .stderr(predicate::str::contains("Row 3"))
        .stderr(predicate::str::contains("unknown operation 'refund'"));
}

#[test]
fn test_seed_registers_sample_accounts() {
    let file = script_file(
        "op,user,secret,amount,target\n\
         deposit,user1,pass,50,\n\
         transfer,user1,pass,20,user2pix\n",
    );
    let path = file.path().to_str().unwrap();

    let output = run_ledger(&["--seed", path]);
    assert_eq!(
        normalize_csv(&output),
        vec![
            "username,agency,alias,balance,credit_used,credit_limit,transactions",
            "user1,DF,user1pix,30.00,0.00,100.00,2",
            "user2,DF,user2pix,20.00,0.00,100.00,1",
        ]
    );
}

#[test]
fn test_without_seed_sample_accounts_do_not_exist() {
    let file = script_file("op,user,secret,amount,target\ndeposit,user1,pass,50,\n");

    let output = run_ledger(&[file.path().to_str().unwrap()]);
    assert_eq!(normalize_csv(&output).len(), 1);
}

#[test]
fn test_missing_file_error() {
    let mut cmd = Command::cargo_bin("pix-ledger").unwrap();
    cmd.arg("nonexistent.csv")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error").or(predicate::str::contains("Error")));
}

#[test]
fn test_missing_argument_error() {
    let mut cmd = Command::cargo_bin("pix-ledger").unwrap();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Missing input file"));
}

#[test]
fn test_flags_alone_are_not_an_input_file() {
    let mut cmd = Command::cargo_bin("pix-ledger").unwrap();
    cmd.args(["--history", "--seed"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing input file"));
}

#[test]
fn test_output_has_correct_header() {
    let output = run_ledger(&[&test_data_path("sample_a_transfers.csv")]);
    assert!(output.starts_with("username,agency,alias,balance,credit_used,credit_limit,transactions"));
}

#[test]
fn test_amount_precision_two_places() {
    let output = run_ledger(&[&test_data_path("sample_a_transfers.csv")]);

    for line in output.lines().skip(1) {
        let parts: Vec<&str> = line.split(',').collect();
        // balance, credit_used, credit_limit should have exactly 2 decimal places
        for part in &parts[3..6] {
            let dot_pos = part.find('.').unwrap();
            let decimal_places = part.len() - dot_pos - 1;
            assert_eq!(decimal_places, 2, "Expected 2 decimal places in: {}", part);
        }
    }
}
