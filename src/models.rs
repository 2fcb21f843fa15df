/// CSV header names, in destination column order.
pub const COLUMNS: [&str; 16] = [
    "transaction_id",
    "transaction_date",
    "transaction_time",
    "account_id",
    "account_name",
    "account_type",
    "account_owner",
    "description",
    "category",
    "subcategory",
    "amount",
    "transaction_type",
    "balance_after",
    "is_recurring",
    "recurring_frequency",
    "notes",
];

/// One converted CSV row, ready for insert.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub transaction_id: String,
    pub transaction_date: String,
    pub transaction_time: String,
    pub account_id: String,
    pub account_name: String,
    pub account_type: String,
    pub account_owner: String,
    pub description: String,
    pub category: String,
    pub subcategory: String,
    pub amount: f64,
    pub transaction_type: String,
    pub balance_after: Option<f64>,
    pub is_recurring: Option<i64>,
    pub recurring_frequency: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SampleRow {
    pub transaction_id: String,
    pub transaction_date: String,
    pub description: String,
    pub amount: f64,
}
