//! CLI command implementations.
//!
//! Each networked command has a generic core taking any
//! [`HttpTransport`](sheet_client::HttpTransport) so tests can drive it with
//! `MockHttp`; the `run` entry points wire in the real transport and the
//! stored session.

pub mod auth;
pub mod init;
pub mod listen;
pub mod normalize;
pub mod public;
pub mod rows;
pub mod status;

use anyhow::{bail, Context, Result};
use serde_json::Value;
use sheet_client::{ClientConfig, ReqwestTransport, SheetClient};
use sheet_core::normalize_value;
use sheet_types::{ColumnType, ColumnTypes, Row};
use std::path::Path;

use crate::config::{Profile, Session};

/// Parse a JSON object argument.
pub fn parse_row(json: &str, what: &str) -> Result<Row> {
    let value: Value =
        serde_json::from_str(json).with_context(|| format!("{} is not valid JSON", what))?;
    match value {
        Value::Object(map) => Ok(map),
        _ => bail!("{} must be a JSON object", what),
    }
}

/// Parse a loose value: JSON when it parses, a plain string otherwise.
pub fn parse_value(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// Column types declaring each of `columns` a list.
pub fn list_types(columns: &[String]) -> ColumnTypes {
    columns
        .iter()
        .map(|column| (column.clone(), ColumnType::List))
        .collect()
}

/// Normalize list columns of a fetched result.
///
/// Arrays are normalized row by row; a single object is treated as one row.
pub fn with_lists(value: Value, columns: &[String]) -> Value {
    if columns.is_empty() {
        return value;
    }
    let types = list_types(columns);
    match value {
        Value::Array(_) => Value::Array(normalize_value(&value, &types)),
        Value::Object(_) => normalize_value(&Value::Array(vec![value]), &types)
            .pop()
            .unwrap_or(Value::Null),
        other => other,
    }
}

/// Print a value as pretty JSON.
pub fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Load the profile and build a client carrying the stored session.
pub async fn connect(
    data_dir: &Path,
    base_url: Option<&str>,
) -> Result<(Profile, SheetClient<ReqwestTransport>)> {
    let profile = Profile::load(data_dir).await?;
    let base_url = base_url.unwrap_or(&profile.base_url).to_string();

    let transport = ReqwestTransport::new().context("Failed to create HTTP client")?;
    if let Some(session) = Session::load(data_dir).await? {
        if session.base_url == base_url {
            transport
                .restore_session(&base_url, &session.cookies)
                .context("Failed to restore session")?;
        } else {
            tracing::debug!(stored = %session.base_url, "ignoring session for another host");
        }
    }

    let client = SheetClient::new(ClientConfig::default().with_base_url(base_url), transport);
    Ok((profile, client))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_row_accepts_objects_only() {
        let row = parse_row(r#"{"name":"ada"}"#, "row").unwrap();
        assert_eq!(row["name"], "ada");

        let err = parse_row("[1]", "row").unwrap_err();
        assert_eq!(err.to_string(), "row must be a JSON object");

        let err = parse_row("{", "updates").unwrap_err();
        assert_eq!(err.to_string(), "updates is not valid JSON");
    }

    #[test]
    fn parse_value_falls_back_to_string() {
        assert_eq!(parse_value("42"), json!(42));
        assert_eq!(parse_value(r#"{"a":1}"#), json!({"a": 1}));
        assert_eq!(parse_value("u-123"), json!("u-123"));
    }

    #[test]
    fn with_lists_normalizes_arrays_and_single_rows() {
        let columns = vec!["tags".to_string()];

        assert_eq!(
            with_lists(json!([{"tags": "a, b"}, {"tags": ""}]), &columns),
            json!([{"tags": ["a", "b"]}, {"tags": []}])
        );
        assert_eq!(
            with_lists(json!({"tags": "[\"x\"]", "n": 1}), &columns),
            json!({"tags": ["x"], "n": 1})
        );
        assert_eq!(with_lists(json!(null), &columns), json!(null));
    }

    #[test]
    fn with_lists_without_columns_is_identity() {
        let value = json!([{"tags": "a, b"}]);
        assert_eq!(with_lists(value.clone(), &[]), value);
    }
}
