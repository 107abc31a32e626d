//! List-field normalization.
//!
//! Columns declared `"list"` reach the client in whatever shape the sheet
//! happened to store: a JSON-encoded array, a comma-separated string, a bare
//! scalar, or an actual array. These functions coerce all of them into a
//! JSON array so callers can iterate without type checks.
//!
//! Rules for a present list column:
//!
//! | Stored value | Result |
//! |---|---|
//! | blank string | `[]` |
//! | string holding JSON | parsed array, or `[parsed]` |
//! | other string | comma split, trimmed, empties dropped |
//! | array | unchanged |
//! | object | `[object]` |
//! | `null`, `false`, `0` | `[]` |
//! | any other scalar | `[scalar]` |
//!
//! Absent columns are left absent; columns with any other declared type are
//! never touched.

use serde_json::Value;
use sheet_types::{ColumnTypes, Row};

/// Normalize every row. The typed entry point.
pub fn normalize_rows(rows: Vec<Row>, types: &ColumnTypes) -> Vec<Row> {
    rows.into_iter().map(|row| normalize_row(row, types)).collect()
}

/// Normalize the list columns of a single row.
pub fn normalize_row(mut row: Row, types: &ColumnTypes) -> Row {
    for column in types.list_columns() {
        if let Some(value) = row.get_mut(column) {
            let stored = value.take();
            *value = Value::Array(coerce_list(column, stored));
        }
    }
    row
}

/// Normalize an untyped value that should hold an array of rows.
///
/// This is the soft-fail entry point: when `rows` is not an array the result
/// is an empty list (logged at `warn`), never an error. Array elements that
/// are not objects are passed through unchanged.
pub fn normalize_value(rows: &Value, types: &ColumnTypes) -> Vec<Value> {
    let Value::Array(items) = rows else {
        tracing::warn!(got = %type_name(rows), "expected an array of rows, returning none");
        return Vec::new();
    };

    items
        .iter()
        .map(|item| match item {
            Value::Object(row) => Value::Object(normalize_row(row.clone(), types)),
            other => other.clone(),
        })
        .collect()
}

/// Coerce one stored value into list items.
pub fn coerce_list(column: &str, value: Value) -> Vec<Value> {
    match value {
        Value::String(text) => split_text(column, &text),
        Value::Array(items) => items,
        object @ Value::Object(_) => vec![object],
        Value::Null | Value::Bool(false) => Vec::new(),
        Value::Number(n) if n.as_f64() == Some(0.0) => Vec::new(),
        scalar => vec![scalar],
    }
}

fn split_text(column: &str, text: &str) -> Vec<Value> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(items)) => items,
        Ok(parsed) => vec![parsed],
        Err(e) => {
            tracing::debug!(column, error = %e, "list value is not JSON, splitting on commas");
            text.split(',')
                .map(str::trim)
                .filter(|piece| !piece.is_empty())
                .map(|piece| Value::String(piece.to_string()))
                .collect()
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
