use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;

const HEADER: &str = "transaction_id,transaction_date,transaction_time,account_id,account_name,account_type,account_owner,description,category,subcategory,amount,transaction_type,balance_after,is_recurring,recurring_frequency,notes";

struct Workspace {
    dir: tempfile::TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn db(&self) -> PathBuf {
        self.dir.path().join("data").join("homefinance.db")
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("homefinance-import").unwrap();
        cmd.env("HOME", self.dir.path())
            .env("NO_COLOR", "1")
            .env("RUST_LOG", "off")
            .env_remove("HOMEFINANCE_DB")
            .env_remove("HOMEFINANCE_CSV");
        cmd
    }

    fn init(&self) {
        self.cmd()
            .args(["--db", self.db().to_str().unwrap(), "init"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Initialized database"));
    }

    fn write_csv(&self, name: &str, rows: &[(&str, &str, &str)]) -> PathBuf {
        let path = self.dir.path().join(name);
        let mut content = format!("{HEADER}\n");
        for (id, date, amount) in rows {
            content.push_str(&format!(
                "{id},{date},12:00:00,ACC-7,Family Card,credit_card,Pat,Market run,Groceries,Produce,{amount},debit,,False,,\n"
            ));
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    fn import(&self, csv: &Path) -> Command {
        let mut cmd = self.cmd();
        cmd.args([
            "--db",
            self.db().to_str().unwrap(),
            "import",
            "--file",
            csv.to_str().unwrap(),
        ]);
        cmd
    }

    fn count(&self) -> i64 {
        let conn = rusqlite::Connection::open(self.db()).unwrap();
        conn.query_row("SELECT count(*) FROM transactions", [], |r| r.get(0))
            .unwrap()
    }
}

const THREE_ROWS: &[(&str, &str, &str)] = &[
    ("T-001", "2024-03-02", "-25.40"),
    ("T-002", "2024-03-01", "-8.99"),
    ("T-003", "2024-03-05", "1500.00"),
];

#[test]
fn init_creates_database_and_settings() {
    let ws = Workspace::new();
    ws.init();
    assert!(ws.db().exists());
    let settings = std::fs::read_to_string(
        ws.dir.path().join(".config").join("homefinance").join("settings.json"),
    )
    .unwrap();
    assert!(settings.contains("homefinance.db"));
    assert_eq!(ws.count(), 0);
}

#[test]
fn import_into_empty_table() {
    let ws = Workspace::new();
    ws.init();
    let csv = ws.write_csv("export.csv", THREE_ROWS);

    ws.import(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("Successfully imported: 3 records"))
        .stdout(predicate::str::contains("Errors encountered").not())
        .stdout(predicate::str::contains("T-002"))
        .stdout(predicate::str::contains("Database connection closed"));
    assert_eq!(ws.count(), 3);
}

#[test]
fn bad_rows_are_counted_not_fatal() {
    let ws = Workspace::new();
    ws.init();
    let csv = ws.write_csv(
        "export.csv",
        &[
            ("T-001", "2024-03-02", "-25.40"),
            ("T-002", "2024-03-01", "twelve"),
            ("T-003", "2024-03-05", "1500.00"),
        ],
    );

    ws.import(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("Successfully imported: 2 records"))
        .stdout(predicate::str::contains("Errors encountered: 1 records"));
    assert_eq!(ws.count(), 2);
}

#[test]
fn declining_reimport_leaves_table_untouched() {
    let ws = Workspace::new();
    ws.init();
    let first = ws.write_csv("first.csv", THREE_ROWS);
    ws.import(&first).assert().success();

    let second = ws.write_csv("second.csv", &[("N-1", "2024-04-01", "-1.00")]);
    ws.import(&second)
        .write_stdin("no\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Table already contains 3 records"))
        .stdout(predicate::str::contains("Import cancelled"))
        .stdout(predicate::str::contains("Successfully imported").not());
    assert_eq!(ws.count(), 3);
}

#[test]
fn closed_stdin_counts_as_no() {
    let ws = Workspace::new();
    ws.init();
    let csv = ws.write_csv("first.csv", THREE_ROWS);
    ws.import(&csv).assert().success();

    ws.import(&csv)
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Import cancelled"));
    assert_eq!(ws.count(), 3);
}

#[test]
fn confirming_reimport_replaces_rows() {
    let ws = Workspace::new();
    ws.init();
    let first = ws.write_csv("first.csv", THREE_ROWS);
    ws.import(&first).assert().success();

    let second = ws.write_csv(
        "second.csv",
        &[("N-1", "2024-04-01", "-1.00"), ("N-2", "2024-04-02", "-2.00")],
    );
    ws.import(&second)
        .write_stdin("yes\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Table cleared"))
        .stdout(predicate::str::contains("Successfully imported: 2 records"));
    assert_eq!(ws.count(), 2);
}

#[test]
fn yes_flag_skips_prompt() {
    let ws = Workspace::new();
    ws.init();
    let csv = ws.write_csv("first.csv", THREE_ROWS);
    ws.import(&csv).assert().success();

    ws.import(&csv)
        .arg("--yes")
        .assert()
        .success()
        .stdout(predicate::str::contains("(yes/no)").not())
        .stdout(predicate::str::contains("Successfully imported: 3 records"));
    assert_eq!(ws.count(), 3);
}

#[test]
fn missing_csv_is_fatal_and_keeps_existing_rows() {
    let ws = Workspace::new();
    ws.init();
    let csv = ws.write_csv("first.csv", THREE_ROWS);
    ws.import(&csv).assert().success();

    ws.import(&ws.dir.path().join("nowhere.csv"))
        .arg("--yes")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("CSV file not found"));
    assert_eq!(ws.count(), 3);
}

#[test]
fn missing_database_is_fatal() {
    let ws = Workspace::new();
    let csv = ws.write_csv("export.csv", THREE_ROWS);
    ws.import(&csv)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error connecting to database"));
    assert!(!ws.db().exists());
}

#[test]
fn missing_columns_are_fatal() {
    let ws = Workspace::new();
    ws.init();
    let csv = ws.dir.path().join("partial.csv");
    std::fs::write(&csv, "transaction_id,amount\nT-1,4.00\n").unwrap();
    ws.import(&csv)
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing columns"));
    assert_eq!(ws.count(), 0);
}

#[test]
fn zero_batch_size_is_rejected() {
    let ws = Workspace::new();
    ws.init();
    let csv = ws.write_csv("export.csv", THREE_ROWS);
    ws.import(&csv)
        .args(["--batch-size", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("batch size"));
}

#[test]
fn remembered_database_and_env_csv() {
    let ws = Workspace::new();
    ws.init();
    let csv = ws.write_csv("export.csv", THREE_ROWS);
    ws.cmd()
        .env("HOMEFINANCE_CSV", &csv)
        .arg("import")
        .assert()
        .success()
        .stdout(predicate::str::contains("Successfully imported: 3 records"));
    assert_eq!(ws.count(), 3);
}

#[test]
fn status_reports_rows_and_sample() {
    let ws = Workspace::new();
    ws.init();
    let csv = ws.write_csv("export.csv", THREE_ROWS);
    ws.import(&csv).assert().success();

    ws.cmd()
        .args(["status", "--limit", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rows:       3"))
        .stdout(predicate::str::contains("T-002"))
        .stdout(predicate::str::contains("T-003").not());
}

#[test]
fn status_without_database() {
    let ws = Workspace::new();
    ws.cmd()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Database not found"));
}
