pub mod import;
pub mod init;
pub mod status;

use clap::{Parser, Subcommand};
use colored::Colorize;
use comfy_table::{Cell, CellAlignment, Table};
use rusqlite::Connection;

use crate::db::sample_transactions;
use crate::error::Result;
use crate::fmt::money;

#[derive(Parser)]
#[command(
    name = "homefinance-import",
    version,
    about = "Load HomeFinance transaction exports from CSV into a SQLite database."
)]
pub struct Cli {
    /// Path to the SQLite database (default: from settings)
    #[arg(long, global = true, env = "HOMEFINANCE_DB")]
    pub db: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the database and transactions table, and remember the database path.
    Init,
    /// Import a CSV export into the transactions table.
    Import {
        /// CSV file to import (default: from settings)
        #[arg(long, env = "HOMEFINANCE_CSV")]
        file: Option<String>,
        /// Clear a non-empty table without asking
        #[arg(short = 'y', long)]
        yes: bool,
        /// Commit after this many imported rows (default: 100)
        #[arg(long = "batch-size")]
        batch_size: Option<usize>,
    },
    /// Show configured paths, row count and the earliest transactions.
    Status {
        /// Number of sample rows to show
        #[arg(long)]
        limit: Option<usize>,
    },
}

/// Print the earliest `limit` transactions by date.
pub(crate) fn print_sample(conn: &Connection, limit: usize) -> Result<()> {
    let rows = sample_transactions(conn, limit)?;
    if rows.is_empty() {
        println!("{}", "No transactions yet.".yellow());
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Date", "Description", "Amount"]);
    for row in rows {
        let amount = if row.amount < 0.0 {
            money(row.amount).red().to_string()
        } else {
            money(row.amount).green().to_string()
        };
        table.add_row(vec![
            Cell::new(row.transaction_id),
            Cell::new(row.transaction_date),
            Cell::new(row.description),
            Cell::new(amount).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("Sample records\n{table}");
    Ok(())
}
