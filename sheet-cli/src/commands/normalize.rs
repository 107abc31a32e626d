//! Offline list-field normalization of a JSON file.

use anyhow::{Context, Result};
use serde_json::Value;
use sheet_core::normalize_value;
use sheet_types::ColumnTypes;
use std::path::Path;
use tokio::io::AsyncReadExt;

use super::{list_types, print_json};

/// Build column types from `--list` columns plus an optional JSON map.
pub fn column_types(lists: &[String], types_json: Option<&str>) -> Result<ColumnTypes> {
    let mut types = list_types(lists);
    if let Some(json) = types_json {
        let extra: ColumnTypes =
            serde_json::from_str(json).context("--types must be a JSON object of column: type")?;
        types.merge(extra);
    }
    Ok(types)
}

/// Normalize rows given as JSON text.
///
/// Anything other than an array of rows yields `[]`.
pub fn normalize_text(text: &str, types: &ColumnTypes) -> Result<Value> {
    let rows: Value = serde_json::from_str(text).context("Input is not valid JSON")?;
    Ok(Value::Array(normalize_value(&rows, types)))
}

/// Run the normalize command. `-` reads standard input.
pub async fn run(file: &Path, lists: &[String], types_json: Option<&str>) -> Result<()> {
    let types = column_types(lists, types_json)?;

    let text = if file == Path::new("-") {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .context("Failed to read standard input")?;
        text
    } else {
        tokio::fs::read_to_string(file)
            .await
            .with_context(|| format!("Failed to read {}", file.display()))?
    };

    print_json(&normalize_text(&text, &types)?)
}
