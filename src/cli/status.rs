use crate::db::{self, count_transactions, ensure_table, open_database};
use crate::error::Result;
use crate::settings::{load_settings, settings_path};

use super::print_sample;

pub fn run(db: Option<String>, limit: Option<usize>) -> Result<()> {
    let settings = load_settings().with_overrides(db, None);
    let db_path = settings.database_path();
    let csv_path = settings.csv_path();

    println!("Settings:   {}", settings_path().display());
    println!("Database:   {}", db_path.display());
    println!(
        "CSV file:   {}{}",
        csv_path.display(),
        if csv_path.is_file() { "" } else { " (missing)" }
    );
    println!("Batch size: {}", settings.batch_size);

    if !db_path.exists() {
        println!();
        println!("Database not found. Run `homefinance-import init` to set up.");
        return Ok(());
    }

    let conn = open_database(&db_path)?;
    let result = ensure_table(&conn).and_then(|_| {
        let rows = count_transactions(&conn)?;
        println!("Rows:       {rows}");
        println!();
        print_sample(&conn, limit.unwrap_or(settings.sample_size))
    });
    db::close_after(conn, result)
}
