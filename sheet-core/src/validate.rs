//! Required-field validation.
//!
//! Every operation checks its inputs before a request is built, and reports
//! all missing fields at once using their wire names.

use sheet_types::AccessKey;
use thiserror::Error;

/// Client-side validation failure. Raised before any network activity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// One or more required fields are absent or blank.
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
}

impl ValidationError {
    /// Wire names of the missing fields.
    pub fn fields(&self) -> &[&'static str] {
        match self {
            Self::MissingFields(fields) => fields,
        }
    }
}

/// Collects missing required fields.
#[derive(Debug, Default)]
pub(crate) struct Required {
    missing: Vec<&'static str>,
}

impl Required {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Blank strings count as missing.
    pub(crate) fn text(mut self, name: &'static str, value: &str) -> Self {
        if value.trim().is_empty() {
            self.missing.push(name);
        }
        self
    }

    pub(crate) fn key(self, name: &'static str, key: &AccessKey) -> Self {
        self.text(name, key.as_str())
    }

    pub(crate) fn present(mut self, name: &'static str, present: bool) -> Self {
        if !present {
            self.missing.push(name);
        }
        self
    }

    pub(crate) fn finish(self) -> Result<(), ValidationError> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::MissingFields(self.missing))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_all_missing_fields_in_order() {
        let err = Required::new()
            .key("accessKey", &AccessKey::default())
            .text("sheetName", "orders")
            .present("row", false)
            .finish()
            .unwrap_err();

        assert_eq!(err.fields(), &["accessKey", "row"]);
        assert_eq!(err.to_string(), "missing required fields: accessKey, row");
    }

    #[test]
    fn whitespace_counts_as_missing() {
        let err = Required::new().text("sheetName", "  ").finish().unwrap_err();
        assert_eq!(err.fields(), &["sheetName"]);
    }

    #[test]
    fn all_present_passes() {
        assert!(Required::new()
            .key("accessKey", &AccessKey::new("k"))
            .text("sheetName", "s")
            .present("row", true)
            .finish()
            .is_ok());
    }
}
