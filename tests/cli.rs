use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cashbook(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("cashbook").unwrap();
    cmd.env("CASHBOOK_DATA_DIR", dir.path()).env_remove("RUST_LOG");
    cmd
}

/// Wallet with a salary (bank, uncategorized) and a coffee (cash, Food)
fn seeded() -> TempDir {
    let dir = TempDir::new().unwrap();

    cashbook(&dir)
        .args(["account", "add", "Wallet"])
        .assert()
        .success();
    cashbook(&dir)
        .args(["category", "add", "Food", "--account", "Wallet"])
        .assert()
        .success();
    cashbook(&dir)
        .args([
            "txn", "add", "Wallet", "--date", "2024-01-05", "--remark", "Salary", "--mode", "bank",
            "--cash-in", "100",
        ])
        .assert()
        .success();
    cashbook(&dir)
        .args([
            "txn",
            "add",
            "Wallet",
            "--date",
            "2024-01-06",
            "--remark",
            "Coffee",
            "--category",
            "Food",
            "--mode",
            "cash",
            "--cash-out",
            "4.5",
        ])
        .assert()
        .success();

    dir
}

#[test]
fn account_add_and_list() {
    let dir = TempDir::new().unwrap();

    cashbook(&dir)
        .args(["account", "add", "Wallet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created account: Wallet"))
        .stdout(predicate::str::contains("acc-1"));

    cashbook(&dir)
        .args(["account", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wallet"))
        .stdout(predicate::str::contains("0.00"));
}

#[test]
fn duplicate_category_is_rejected() {
    let dir = seeded();

    cashbook(&dir)
        .args(["category", "add", "Food", "--account", "Wallet"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Validation error"));
}

#[test]
fn txn_list_shows_balance() {
    let dir = seeded();

    cashbook(&dir)
        .args(["txn", "list", "Wallet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Salary"))
        .stdout(predicate::str::contains("Coffee"))
        .stdout(predicate::str::contains("2 transactions, balance: 95.50"));
}

#[test]
fn txn_list_applies_filters() {
    let dir = seeded();

    cashbook(&dir)
        .args(["txn", "list", "Wallet", "--category", "Food"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Coffee"))
        .stdout(predicate::str::contains("Salary").not())
        .stdout(predicate::str::contains("1 transactions, balance: -4.50"));

    cashbook(&dir)
        .args(["txn", "list", "Wallet", "--mode", "BANK", "--remark", "sal"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 transactions, balance: 100.00"));

    cashbook(&dir)
        .args(["txn", "list", "Wallet", "--after", "2024-01-06"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No transactions found."));
}

#[test]
fn filtering_by_unknown_category_fails() {
    let dir = seeded();

    cashbook(&dir)
        .args(["txn", "list", "Wallet", "--category", "Travel"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Category not found: Travel"));
}

#[test]
fn export_to_stdout() {
    let dir = seeded();

    cashbook(&dir)
        .args(["export", "-", "--account", "Wallet"])
        .assert()
        .success()
        .stdout(
            "Date,Time,Remark,Category,Mode,Cash In,Cash Out\n\
             2024-01-06,,Coffee,Food,cash,0.0,4.5\n\
             2024-01-05,,Salary,N/A,bank,100.0,0.0\n",
        );
}

#[test]
fn import_creates_categories_and_skips_bad_rows() {
    let dir = seeded();
    let file = dir.path().join("in.csv");
    fs::write(
        &file,
        "Date,Time,Remark,Category,Mode,Cash In,Cash Out\n\
         2024-02-01,08:00,Bus,Travel,card,0,2.5\n\
         not-a-date,,Broken,Food,cash,0,1\n\
         2024-02-02,,Lunch,Food,cash,0,12\n",
    )
    .unwrap();

    cashbook(&dir)
        .args(["import"])
        .arg(&file)
        .args(["--account", "Wallet"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"Imported:\s+2").unwrap())
        .stdout(predicate::str::is_match(r"Skipped:\s+1").unwrap())
        .stdout(predicate::str::is_match(r"Categories created:\s+1").unwrap());

    cashbook(&dir)
        .args(["txn", "list", "Wallet", "--category", "Travel"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bus"))
        .stdout(predicate::str::contains("1 transactions, balance: -2.50"));
}

#[test]
fn import_of_missing_file_fails() {
    let dir = seeded();

    cashbook(&dir)
        .args(["import", "does-not-exist.csv", "--account", "Wallet"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Import error"));
}

#[test]
fn unknown_account_fails() {
    let dir = TempDir::new().unwrap();

    cashbook(&dir)
        .args(["txn", "list", "Nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Account not found: Nope"));
}

#[test]
fn invalid_date_fails() {
    let dir = seeded();

    cashbook(&dir)
        .args(["txn", "add", "Wallet", "--date", "2024/01/01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date"));
}

#[test]
fn deleting_account_cascades() {
    let dir = seeded();

    cashbook(&dir)
        .args(["account", "delete", "Wallet"])
        .assert()
        .success();

    cashbook(&dir)
        .args(["account", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No accounts found."));

    cashbook(&dir)
        .args(["audit", "-n", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("DELETE Account acc-1 (Wallet)"))
        .stdout(predicate::str::contains("cascade: 1 categories, 2 transactions"));
}
