use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Error reading CSV file: {0}")]
    Csv(#[from] csv::Error),

    #[error("Error connecting to database {path}: {source}")]
    Connect {
        path: String,
        source: rusqlite::Error,
    },

    #[error("CSV file not found: {0}")]
    CsvNotFound(String),

    #[error("CSV header is missing columns: {0}")]
    MissingColumns(String),

    #[error("Table `{0}` does not exist. Run `homefinance-import init` to create it.")]
    MissingTable(String),

    #[error("Settings error: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, ImportError>;

/// Why a single CSV row was skipped. These never abort a run.
#[derive(Error, Debug)]
pub enum RowError {
    #[error("invalid {field} value {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("malformed record: {0}")]
    Malformed(csv::Error),

    #[error("insert rejected: {0}")]
    Insert(rusqlite::Error),
}

impl RowError {
    /// True when the database refused the row, as opposed to the row being unreadable.
    pub fn is_rejection(&self) -> bool {
        matches!(self, RowError::Insert(_))
    }
}
