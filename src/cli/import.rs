use std::io::{BufRead, Write};

use colored::Colorize;
use rusqlite::Connection;

use crate::db::{self, open_database};
use crate::error::{ImportError, Result};
use crate::fmt::rule;
use crate::importer::{import_file, is_affirmative, preflight, ImportResult, Preflight};
use crate::settings::{load_settings, Settings};

use super::print_sample;

const CHECK: &str = "\u{2713}";

pub fn run(
    db: Option<String>,
    file: Option<String>,
    yes: bool,
    batch_size: Option<usize>,
) -> Result<()> {
    let settings = load_settings().with_overrides(db, file);
    let batch_size = batch_size.unwrap_or(settings.batch_size);
    if batch_size == 0 {
        return Err(ImportError::Settings("batch size must be at least 1".to_string()));
    }

    println!("\n{}", rule(50));
    println!("HomeFinance CSV Import");
    println!("{}\n", rule(50));

    let db_path = settings.database_path();
    let conn = open_database(&db_path)?;
    println!("{} Connected to database: {}", CHECK.green(), db_path.display());

    let result = import_into(&conn, &settings, yes, batch_size);

    let result = db::close_after(conn, result);
    println!("\n{} Database connection closed", CHECK.green());
    result
}

fn import_into(conn: &Connection, settings: &Settings, yes: bool, batch_size: usize) -> Result<()> {
    let csv_path = settings.csv_path();
    // Must hold before preflight is allowed to clear the table.
    if !csv_path.is_file() {
        return Err(ImportError::CsvNotFound(csv_path.display().to_string()));
    }

    let outcome = preflight(conn, |existing| {
        println!("{} Table already contains {existing} records", "\u{26a0}".yellow());
        if yes {
            return Ok(true);
        }
        let stdin = std::io::stdin();
        confirm_reimport(&mut stdin.lock(), &mut std::io::stdout())
    })?;
    match outcome {
        Preflight::Declined { existing } => {
            println!("{}", format!("Import cancelled ({existing} records kept)").yellow());
            return Ok(());
        }
        Preflight::Cleared { removed } => {
            println!("{} Table cleared ({removed} records removed)", CHECK.green())
        }
        Preflight::Empty => {}
    }

    println!("\nReading from: {}", csv_path.display());
    println!("Importing records...");
    let result = import_file(conn, &csv_path, batch_size)?;

    print_summary(&result);
    print_sample(conn, settings.sample_size)
}

/// Ask whether to clear the table. Only `yes` counts; end of input counts as no.
pub fn confirm_reimport<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<bool> {
    write!(output, "Do you want to clear the table and reimport? (yes/no): ")?;
    output.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(is_affirmative(&answer))
}

fn print_summary(result: &ImportResult) {
    println!("\n{}", rule(50));
    println!("{} Import completed!", CHECK.green());
    println!("  Successfully imported: {} records", result.imported);
    if result.errors() > 0 {
        let line = format!(
            "  Errors encountered: {} records ({} invalid, {} rejected)",
            result.errors(),
            result.invalid,
            result.rejected
        );
        println!("{}", line.red());
    }
    println!("{}\n", rule(50));
}
