//! Wire types for the explorer API.
//!
//! Defines the database summary, the query response envelope, and how
//! individual result cells are turned into display text.

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;
use unicode_width::UnicodeWidthStr;

/// Summary statistics about the underlying dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbInfo {
    /// Number of blocks stored.
    pub total_blocks: i64,
    /// Lowest block height stored.
    pub min_height: i64,
    /// Highest block height stored.
    pub max_height: i64,
    /// Number of tables in the database.
    pub total_tables: i64,
}

impl DbInfo {
    /// Returns the height range as displayed in the summary card.
    pub fn height_range(&self) -> String {
        format!("{} - {}", self.min_height, self.max_height)
    }
}

/// A result row: column name to JSON value, in the order the server sent.
pub type Row = Map<String, Value>;

/// Ordered rows returned for a question.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    rows: Vec<Row>,
    widths: Vec<usize>,
}

impl QueryResult {
    /// Creates a result from the given rows.
    pub fn new(rows: Vec<Row>) -> Self {
        let widths = Self::measure(&rows);
        Self { rows, widths }
    }

    fn measure(rows: &[Row]) -> Vec<usize> {
        let mut widths: Vec<usize> = rows
            .first()
            .map(|row| row.keys().map(|name| name.width()).collect())
            .unwrap_or_default();

        for row in rows {
            for (i, value) in row.values().enumerate() {
                let len = cell_text(value).width();
                match widths.get_mut(i) {
                    Some(width) => *width = (*width).max(len),
                    None => widths.push(len),
                }
            }
        }
        widths
    }

    /// Display width of each column: the widest of its header name and
    /// every cell at that position. There are as many columns as the
    /// widest row has cells.
    pub fn column_widths(&self) -> &[usize] {
        &self.widths
    }

    /// Column names, taken from the keys of the first row.
    ///
    /// Later rows are not consulted, so a result with no rows has no columns.
    pub fn columns(&self) -> Vec<&str> {
        self.rows
            .first()
            .map(|row| row.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Returns the rows.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Returns the display text of every cell in a row, in the row's own
    /// key order.
    pub fn row_cells(row: &Row) -> Vec<String> {
        row.values().map(cell_text).collect()
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Renders a single cell value as text.
///
/// Strings are shown without quotes; numbers, booleans and null use their
/// literal form; objects and arrays are serialized as compact JSON.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Object(_) | Value::Array(_) => value.to_string(),
    }
}

/// Request body for `POST /api/query`.
#[derive(Debug, Clone, Serialize)]
pub struct QueryRequest<'a> {
    pub question: &'a str,
}

/// Decoded body of `POST /api/query`.
///
/// Both fields are optional: whatever the server sends replaces the
/// previously displayed values, including an absent field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResponse {
    /// Generated SQL text.
    pub sql: Option<String>,
    /// Result rows.
    pub results: Option<QueryResult>,
}

impl QueryResponse {
    /// Creates a response carrying both SQL and rows.
    pub fn new(sql: impl Into<String>, rows: Vec<Row>) -> Self {
        Self {
            sql: Some(sql.into()),
            results: Some(QueryResult::new(rows)),
        }
    }

    /// Decodes a response body.
    ///
    /// Only a body that is not JSON at all (or is JSON `null`) is an error.
    /// Any other JSON is accepted and its `sql`/`results` fields are taken
    /// as far as they have a usable shape.
    pub fn from_json(body: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| AppError::decode(format!("Query response is not JSON: {e}")))?;

        let object = match value {
            Value::Object(object) => object,
            Value::Null => return Err(AppError::decode("Query response is null")),
            other => {
                warn!("Query response is not an object: {}", other);
                return Ok(Self::default());
            }
        };

        let sql = match object.get("sql") {
            Some(Value::String(sql)) => Some(sql.clone()),
            Some(Value::Null) | None => None,
            Some(other) => {
                warn!("Ignoring non-string sql field: {}", other);
                None
            }
        };

        let results = match object.get("results") {
            Some(Value::Array(items)) => Some(QueryResult::new(
                items.iter().map(Self::row_from_value).collect(),
            )),
            Some(Value::Null) | None => None,
            Some(other) => {
                warn!("Ignoring non-array results field: {}", other);
                None
            }
        };

        Ok(Self { sql, results })
    }

    fn row_from_value(value: &Value) -> Row {
        match value {
            Value::Object(row) => row.clone(),
            other => {
                warn!("Result row is not an object: {}", other);
                Row::new()
            }
        }
    }
}
