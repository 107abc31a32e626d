//! Identity and record types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A row: column name → value.
///
/// Rows are owned by the server; the client only ever holds transient copies.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// An opaque tenant/application credential.
///
/// Sent as a path segment on nearly every call. `Debug` output only shows a
/// short prefix so keys do not leak into logs.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessKey(String);

impl AccessKey {
    /// Wrap a key string.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Borrow the raw key.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check for an empty (missing) key.
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<&str> for AccessKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for AccessKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl fmt::Display for AccessKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for AccessKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix: String = self.0.chars().take(4).collect();
        write!(f, "AccessKey({}…)", prefix)
    }
}
