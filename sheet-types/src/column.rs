//! Declared column types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The declared type of a column.
///
/// Only [`ColumnType::List`] changes how values are treated; every other
/// declaration is carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ColumnType {
    /// `"list"` - values are coerced into arrays.
    List,
    /// Any other declaration (`"text"`, `"image"`, …).
    Other(String),
}

impl ColumnType {
    /// Check for the `"list"` declaration.
    pub fn is_list(&self) -> bool {
        matches!(self, Self::List)
    }

    /// The declaration as written on the wire.
    pub fn as_str(&self) -> &str {
        match self {
            Self::List => "list",
            Self::Other(s) => s,
        }
    }
}

impl From<&str> for ColumnType {
    fn from(s: &str) -> Self {
        match s {
            "list" => Self::List,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for ColumnType {
    fn from(s: String) -> Self {
        if s == "list" {
            Self::List
        } else {
            Self::Other(s)
        }
    }
}

impl From<ColumnType> for String {
    fn from(t: ColumnType) -> Self {
        match t {
            ColumnType::List => "list".to_string(),
            ColumnType::Other(s) => s,
        }
    }
}

/// Column name → declared type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnTypes(BTreeMap<String, ColumnType>);

impl ColumnTypes {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a column's type, replacing any earlier declaration.
    pub fn insert(&mut self, column: impl Into<String>, ty: impl Into<ColumnType>) {
        self.0.insert(column.into(), ty.into());
    }

    /// Builder form of [`ColumnTypes::insert`].
    pub fn with(mut self, column: impl Into<String>, ty: impl Into<ColumnType>) -> Self {
        self.insert(column, ty);
        self
    }

    /// Take every declaration from `other`, overriding clashes.
    pub fn merge(&mut self, other: ColumnTypes) {
        self.0.extend(other.0);
    }

    /// Look up a column's declared type.
    pub fn get(&self, column: &str) -> Option<&ColumnType> {
        self.0.get(column)
    }

    /// Names of the columns declared as `"list"`.
    pub fn list_columns(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .filter(|(_, ty)| ty.is_list())
            .map(|(name, _)| name.as_str())
    }

    /// Number of declared columns.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check for no declarations.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for ColumnTypes
where
    K: Into<String>,
    V: Into<ColumnType>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut types = Self::new();
        for (k, v) in iter {
            types.insert(k, v);
        }
        types
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_overrides_clashes() {
        let mut types = ColumnTypes::new().with("tags", "list").with("name", "text");
        types.merge(ColumnTypes::new().with("name", "list"));
        assert_eq!(types.len(), 2);
        assert_eq!(types.list_columns().collect::<Vec<_>>(), vec!["name", "tags"]);
    }

    #[test]
    fn parses_list_declaration() {
        assert_eq!(ColumnType::from("list"), ColumnType::List);
        assert_eq!(
            ColumnType::from("image"),
            ColumnType::Other("image".into())
        );
        // Case matters: only the exact literal is special.
        assert!(!ColumnType::from("List").is_list());
    }

    #[test]
    fn list_columns_filters_other_types() {
        let types: ColumnTypes = [("tags", "list"), ("name", "text"), ("friends", "list")]
            .into_iter()
            .collect();
        let lists: Vec<&str> = types.list_columns().collect();
        assert_eq!(lists, vec!["friends", "tags"]);
    }

    #[test]
    fn deserializes_from_plain_object() {
        let types: ColumnTypes =
            serde_json::from_str(r#"{"tags":"list","photo":"image"}"#).unwrap();
        assert_eq!(types.get("tags"), Some(&ColumnType::List));
        assert_eq!(types.get("photo").map(ColumnType::as_str), Some("image"));
        assert_eq!(types.len(), 2);
    }
}
