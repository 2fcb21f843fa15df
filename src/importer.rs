use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use rusqlite::Connection;

use crate::db::{clear_transactions, count_transactions, ensure_table, insert_transaction};
use crate::error::{ImportError, Result, RowError};
use crate::models::{Transaction, COLUMNS};

pub const DEFAULT_BATCH_SIZE: usize = 100;

// ---------------------------------------------------------------------------
// Field conversion
// ---------------------------------------------------------------------------

/// Empty string becomes NULL; anything else is kept verbatim.
pub fn nullable(raw: &str) -> Option<String> {
    if raw.is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}

/// Parse a finite decimal. `nan` and `inf` are rejected like any other non-number.
pub fn parse_decimal(field: &'static str, raw: &str) -> std::result::Result<f64, RowError> {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(RowError::InvalidNumber {
            field,
            value: raw.to_string(),
        }),
    }
}

pub fn parse_nullable_decimal(
    field: &'static str,
    raw: &str,
) -> std::result::Result<Option<f64>, RowError> {
    if raw.is_empty() {
        return Ok(None);
    }
    parse_decimal(field, raw).map(Some)
}

/// `True` is 1, any other non-empty value is 0, empty is NULL.
pub fn parse_recurring(raw: &str) -> Option<i64> {
    match raw {
        "" => None,
        "True" => Some(1),
        _ => Some(0),
    }
}

pub fn is_affirmative(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("yes")
}

// ---------------------------------------------------------------------------
// Header → column positions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ColumnMap {
    indices: [usize; COLUMNS.len()],
}

impl ColumnMap {
    pub fn from_headers(headers: &StringRecord) -> Result<Self> {
        let names: Vec<&str> = headers
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim())
            .collect();
        let mut indices = [0usize; COLUMNS.len()];
        let mut missing = Vec::new();
        for (slot, column) in indices.iter_mut().zip(COLUMNS) {
            match names.iter().position(|n| *n == column) {
                Some(i) => *slot = i,
                None => missing.push(column),
            }
        }
        if !missing.is_empty() {
            return Err(ImportError::MissingColumns(missing.join(", ")));
        }
        Ok(Self { indices })
    }

    pub fn convert(&self, record: &StringRecord) -> std::result::Result<Transaction, RowError> {
        let values: [&str; COLUMNS.len()] =
            std::array::from_fn(|i| record.get(self.indices[i]).unwrap_or(""));
        let [
            transaction_id,
            transaction_date,
            transaction_time,
            account_id,
            account_name,
            account_type,
            account_owner,
            description,
            category,
            subcategory,
            amount,
            transaction_type,
            balance_after,
            is_recurring,
            recurring_frequency,
            notes,
        ] = values;

        Ok(Transaction {
            transaction_id: transaction_id.to_string(),
            transaction_date: transaction_date.to_string(),
            transaction_time: transaction_time.to_string(),
            account_id: account_id.to_string(),
            account_name: account_name.to_string(),
            account_type: account_type.to_string(),
            account_owner: account_owner.to_string(),
            description: description.to_string(),
            category: category.to_string(),
            subcategory: subcategory.to_string(),
            amount: parse_decimal("amount", amount)?,
            transaction_type: transaction_type.to_string(),
            balance_after: parse_nullable_decimal("balance_after", balance_after)?,
            is_recurring: parse_recurring(is_recurring),
            recurring_frequency: nullable(recurring_frequency),
            notes: nullable(notes),
        })
    }
}

// ---------------------------------------------------------------------------
// Preflight
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preflight {
    Empty,
    Cleared { removed: usize },
    Declined { existing: i64 },
}

/// Check the table before importing. `confirm` is only asked when rows already exist,
/// and receives the current row count.
pub fn preflight<F>(conn: &Connection, confirm: F) -> Result<Preflight>
where
    F: FnOnce(i64) -> Result<bool>,
{
    ensure_table(conn)?;
    let existing = count_transactions(conn)?;
    if existing == 0 {
        return Ok(Preflight::Empty);
    }
    if !confirm(existing)? {
        tracing::info!(existing, "reimport declined");
        return Ok(Preflight::Declined { existing });
    }
    let removed = clear_transactions(conn)?;
    tracing::info!(removed, "cleared transactions table");
    Ok(Preflight::Cleared { removed })
}

// ---------------------------------------------------------------------------
// Import
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportResult {
    pub imported: usize,
    /// Rows that could not be read or converted.
    pub invalid: usize,
    /// Rows the database refused.
    pub rejected: usize,
    pub commits: usize,
}

impl ImportResult {
    pub fn errors(&self) -> usize {
        self.invalid + self.rejected
    }

    fn record_failure(&mut self, row: u64, err: RowError) {
        tracing::warn!(row, error = %err, "skipping row");
        if err.is_rejection() {
            self.rejected += 1;
        } else {
            self.invalid += 1;
        }
    }
}

pub fn import_file(conn: &Connection, file_path: &Path, batch_size: usize) -> Result<ImportResult> {
    let file = match std::fs::File::open(file_path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ImportError::CsvNotFound(file_path.display().to_string()));
        }
        Err(e) => return Err(e.into()),
    };
    tracing::info!(file = %file_path.display(), "reading CSV");
    import_reader(conn, std::io::BufReader::new(file), batch_size)
}

/// Insert every record from `reader`, committing after each `batch_size` imported rows
/// and once at end of stream. Rows after the last commit roll back if this returns early.
pub fn import_reader<R: Read>(conn: &Connection, reader: R, batch_size: usize) -> Result<ImportResult> {
    let batch_size = batch_size.max(1);
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);
    let columns = ColumnMap::from_headers(rdr.headers()?)?;

    let mut result = ImportResult::default();
    let mut tx = conn.unchecked_transaction()?;
    let mut record = StringRecord::new();
    let mut row = 0u64;

    loop {
        match rdr.read_record(&mut record) {
            Ok(true) => row += 1,
            Ok(false) => break,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                row += 1;
                result.record_failure(row, RowError::Malformed(e));
                continue;
            }
        }

        let outcome = columns
            .convert(&record)
            .and_then(|txn| insert_transaction(&tx, &txn).map_err(RowError::Insert));
        match outcome {
            Ok(_) => {
                result.imported += 1;
                if result.imported % batch_size == 0 {
                    tx.commit()?;
                    result.commits += 1;
                    tracing::info!(imported = result.imported, "committed batch");
                    tx = conn.unchecked_transaction()?;
                }
            }
            Err(e) => result.record_failure(row, e),
        }
    }

    tx.commit()?;
    result.commits += 1;
    tracing::info!(
        imported = result.imported,
        errors = result.errors(),
        commits = result.commits,
        "import finished"
    );
    Ok(result)
}
