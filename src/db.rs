use std::path::Path;

use rusqlite::{Connection, OpenFlags};

use crate::error::{ImportError, Result};
use crate::models::{SampleRow, Transaction};

pub const TABLE: &str = "transactions";

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS transactions (
    transaction_id TEXT PRIMARY KEY,
    transaction_date TEXT NOT NULL,
    transaction_time TEXT,
    account_id TEXT NOT NULL,
    account_name TEXT,
    account_type TEXT,
    account_owner TEXT,
    description TEXT,
    category TEXT,
    subcategory TEXT,
    amount REAL NOT NULL,
    transaction_type TEXT,
    balance_after REAL,
    is_recurring INTEGER,
    recurring_frequency TEXT,
    notes TEXT
);

CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions (transaction_date);
";

const INSERT_TRANSACTION: &str = "
INSERT INTO transactions (
    transaction_id, transaction_date, transaction_time, account_id, account_name,
    account_type, account_owner, description, category, subcategory,
    amount, transaction_type, balance_after, is_recurring, recurring_frequency, notes
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)";

fn configure(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA journal_mode=WAL;")
}

/// Open an existing database. A missing or unreadable file is a connection failure.
pub fn open_database(db_path: &Path) -> Result<Connection> {
    let connect_err = |source: rusqlite::Error| ImportError::Connect {
        path: db_path.display().to_string(),
        source,
    };
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_URI
        | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    let conn = Connection::open_with_flags(db_path, flags).map_err(connect_err)?;
    configure(&conn).map_err(connect_err)?;
    tracing::debug!(path = %db_path.display(), "opened database");
    Ok(conn)
}

/// Open the database, creating the file (and parent directories) and the table if needed.
pub fn create_database(db_path: &Path) -> Result<Connection> {
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let conn = Connection::open(db_path).map_err(|source| ImportError::Connect {
        path: db_path.display().to_string(),
        source,
    })?;
    configure(&conn)?;
    init_db(&conn)?;
    Ok(conn)
}

pub fn close(conn: Connection) -> Result<()> {
    conn.close().map_err(|(_, e)| ImportError::Db(e))?;
    tracing::debug!("closed database connection");
    Ok(())
}

/// Close `conn` after work that produced `result`. The work's own error wins over a close failure.
pub fn close_after<T>(conn: Connection, result: Result<T>) -> Result<T> {
    let closed = close(conn);
    match (result, closed) {
        (Err(e), Err(close_err)) => {
            tracing::warn!(error = %close_err, "failed to close database");
            Err(e)
        }
        (result, closed) => closed.and(result),
    }
}

pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

pub fn ensure_table(conn: &Connection) -> Result<()> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
        [TABLE],
        |row| row.get(0),
    )?;
    if exists {
        Ok(())
    } else {
        Err(ImportError::MissingTable(TABLE.to_string()))
    }
}

pub fn count_transactions(conn: &Connection) -> Result<i64> {
    let count = conn.query_row("SELECT count(*) FROM transactions", [], |row| row.get(0))?;
    Ok(count)
}

/// Remove every row. An unqualified DELETE is SQLite's truncate.
pub fn clear_transactions(conn: &Connection) -> Result<usize> {
    let removed = conn.execute("DELETE FROM transactions", [])?;
    Ok(removed)
}

pub fn insert_transaction(conn: &Connection, txn: &Transaction) -> rusqlite::Result<usize> {
    let mut stmt = conn.prepare_cached(INSERT_TRANSACTION)?;
    stmt.execute(rusqlite::params![
        txn.transaction_id,
        txn.transaction_date,
        txn.transaction_time,
        txn.account_id,
        txn.account_name,
        txn.account_type,
        txn.account_owner,
        txn.description,
        txn.category,
        txn.subcategory,
        txn.amount,
        txn.transaction_type,
        txn.balance_after,
        txn.is_recurring,
        txn.recurring_frequency,
        txn.notes,
    ])
}

pub fn sample_transactions(conn: &Connection, limit: usize) -> Result<Vec<SampleRow>> {
    let mut stmt = conn.prepare(
        "SELECT transaction_id, transaction_date, description, amount \
         FROM transactions ORDER BY transaction_date LIMIT ?1",
    )?;
    let rows = stmt
        .query_map([limit as i64], |row| {
            Ok(SampleRow {
                transaction_id: row.get(0)?,
                transaction_date: row.get(1)?,
                description: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                amount: row.get(3)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}
