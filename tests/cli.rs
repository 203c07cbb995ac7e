//! End-to-end tests for the cardcycle binary

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cardcycle(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("cardcycle").unwrap();
    cmd.env("CARDCYCLE_DATA_DIR", dir.path());
    cmd
}

fn setup_cards(dir: &TempDir) {
    cardcycle(dir).arg("init").assert().success();
    cardcycle(dir)
        .args(["card", "add", "Visa", "--closing-day", "7", "--due-day", "15"])
        .assert()
        .success();
    cardcycle(dir)
        .args(["card", "add", "Master", "--closing-day", "5", "--due-day", "1"])
        .assert()
        .success();
}

#[test]
fn test_init_creates_data_files() {
    let dir = TempDir::new().unwrap();

    cardcycle(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialization complete!"));

    assert!(dir.path().join("config.json").exists());
    assert!(dir.path().join("data").join("cards.json").exists());

    cardcycle(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Already initialized"));
}

#[test]
fn test_card_best_prefers_longest_float() {
    let dir = TempDir::new().unwrap();
    setup_cards(&dir);

    cardcycle(&dir)
        .args(["card", "best", "--date", "2024-01-10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Best card for 2024-01-10: Master"))
        .stdout(predicate::str::contains("due 2024-03-01 (in 51 days)"));
}

#[test]
fn test_card_best_without_cards() {
    let dir = TempDir::new().unwrap();
    cardcycle(&dir).arg("init").assert().success();

    cardcycle(&dir)
        .args(["card", "best"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No active credit cards."));
}

#[test]
fn test_card_add_rejects_invalid_day() {
    let dir = TempDir::new().unwrap();
    cardcycle(&dir).arg("init").assert().success();

    cardcycle(&dir)
        .args(["card", "add", "Broken", "--closing-day", "32", "--due-day", "10"])
        .assert()
        .failure();
}

#[test]
fn test_installments_land_on_consecutive_invoices() {
    let dir = TempDir::new().unwrap();
    setup_cards(&dir);

    cardcycle(&dir)
        .args([
            "txn",
            "installments",
            "Visa",
            "-300",
            "3",
            "--date",
            "2024-01-10",
            "--description",
            "Laptop",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded 3 installment(s) on Visa"))
        .stdout(predicate::str::contains("invoice 2024-02  due 2024-02-15"))
        .stdout(predicate::str::contains("invoice 2024-04  due 2024-04-15"));

    cardcycle(&dir)
        .args(["card", "invoice", "Visa", "--month", "2024-03"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Visa invoice 2024-03"))
        .stdout(predicate::str::contains("Purchases 2024-02-08 to 2024-03-07"))
        .stdout(predicate::str::contains("Laptop (2/3)"))
        .stdout(predicate::str::contains("-$100.00"));
}

#[test]
fn test_installment_count_out_of_range() {
    let dir = TempDir::new().unwrap();
    setup_cards(&dir);

    cardcycle(&dir)
        .args(["txn", "installments", "Visa", "-300", "73"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("between 1 and 72"));
}

#[test]
fn test_series_upcoming_and_post() {
    let dir = TempDir::new().unwrap();
    setup_cards(&dir);

    cardcycle(&dir)
        .args([
            "series",
            "add",
            "Streaming",
            "-15.99",
            "--card",
            "Visa",
            "--start",
            "2024-01-20",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Schedule: Every month"));

    cardcycle(&dir)
        .args(["series", "upcoming", "--date", "2024-01-15", "--days", "40"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-01-20"))
        .stdout(predicate::str::contains("2024-02-20"))
        .stdout(predicate::str::contains("2024-02 (due 2024-02-15)"));

    cardcycle(&dir)
        .args(["series", "post", "--date", "2024-02-25"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Posted 2 transaction(s)."));

    cardcycle(&dir)
        .args(["series", "post", "--date", "2024-02-25"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to post"));
}

#[test]
fn test_series_requires_one_source() {
    let dir = TempDir::new().unwrap();
    setup_cards(&dir);

    cardcycle(&dir)
        .args(["series", "add", "Gym", "-40"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--card or --account"));
}

#[test]
fn test_statement_lists_accounts_and_invoices() {
    let dir = TempDir::new().unwrap();
    setup_cards(&dir);

    cardcycle(&dir)
        .args(["account", "create", "Checking", "--balance", "1000"])
        .assert()
        .success();
    cardcycle(&dir)
        .args([
            "txn", "add", "2500", "--account", "Checking", "--date", "2024-02-01", "-D", "Salary",
        ])
        .assert()
        .success();
    cardcycle(&dir)
        .args([
            "txn", "add", "-42.50", "--card", "Visa", "--date", "2024-01-20", "-D", "Groceries",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Billed on the 2024-02 invoice of Visa"));

    cardcycle(&dir)
        .args(["report", "statement", "--month", "2024-02"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Statement for 2024-02"))
        .stdout(predicate::str::contains("ACCOUNTS"))
        .stdout(predicate::str::contains("Salary"))
        .stdout(predicate::str::contains("Visa (closes 2024-02-07, due 2024-02-15)"))
        .stdout(predicate::str::contains("Groceries"));
}

#[test]
fn test_export_and_verify() {
    let dir = TempDir::new().unwrap();
    setup_cards(&dir);
    let export_path = dir.path().join("export.yaml");

    cardcycle(&dir)
        .args(["export", "all"])
        .arg(&export_path)
        .args(["--format", "yaml"])
        .assert()
        .success();

    cardcycle(&dir)
        .args(["export", "verify"])
        .arg(&export_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Credit cards:  2"));
}

#[test]
fn test_audit_records_changes() {
    let dir = TempDir::new().unwrap();
    setup_cards(&dir);

    cardcycle(&dir)
        .args(["audit", "-n", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Visa"))
        .stdout(predicate::str::contains("Master"));
}
