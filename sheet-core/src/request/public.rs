//! Endpoints over rows owned by other users.

use serde_json::{json, Value};
use sheet_types::{AccessKey, Row};

use super::my_rows::require_scope;
use super::{match_pair, ApiCall, ApiRequest, Method, Operation, DEFAULT_ROLE};
use crate::validate::ValidationError;

/// `GET /user-access/user-row/{accessKey}/{sheetName}/public`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetPublicUserRows {
    /// Access key scope.
    pub access_key: AccessKey,
    /// Sheet to read.
    pub sheet_name: String,
    /// Column to match on. Sent only together with `match_value`.
    pub match_with: Option<String>,
    /// Value to match. Sent only together with `match_with`.
    pub match_value: Option<String>,
    /// Fetch mode (default `all`; blank omits it).
    pub mode: String,
}

impl GetPublicUserRows {
    /// Fetch every public row in a sheet.
    pub fn new(access_key: impl Into<AccessKey>, sheet_name: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            sheet_name: sheet_name.into(),
            ..Self::default()
        }
    }

    /// Only rows where `column == value`.
    pub fn matching(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.match_with = Some(column.into());
        self.match_value = Some(value.into());
        self
    }

    /// Override the fetch mode.
    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = mode.into();
        self
    }
}

impl Default for GetPublicUserRows {
    fn default() -> Self {
        Self {
            access_key: AccessKey::default(),
            sheet_name: String::new(),
            match_with: None,
            match_value: None,
            mode: "all".to_string(),
        }
    }
}

impl ApiRequest for GetPublicUserRows {
    fn operation(&self) -> Operation {
        Operation::GetPublicUserRows
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_scope(&self.access_key, &self.sheet_name).finish()
    }

    fn build(&self) -> ApiCall {
        let mut call = ApiCall::new(
            Operation::GetPublicUserRows,
            Method::Get,
            &[
                "user-row",
                self.access_key.as_str(),
                self.sheet_name.as_str(),
                "public",
            ],
        );
        if let Some((with, value)) =
            match_pair(self.match_with.as_deref(), self.match_value.as_deref())
        {
            call = call.query("matchWith", with).query("matchValue", value);
        }
        if !self.mode.is_empty() {
            call = call.query("mode", self.mode.as_str());
        }
        call
    }
}

/// `GET /user-access/public-row/{accessKey}/{sheetName}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetPublicRow {
    /// Access key scope.
    pub access_key: AccessKey,
    /// Sheet to read.
    pub sheet_name: String,
    /// Column to match on.
    pub match_with: Option<String>,
    /// Value to match.
    pub match_value: Option<String>,
}

impl GetPublicRow {
    /// Fetch a public row.
    pub fn new(access_key: impl Into<AccessKey>, sheet_name: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            sheet_name: sheet_name.into(),
            ..Self::default()
        }
    }

    /// The row where `column == value`.
    pub fn matching(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.match_with = Some(column.into());
        self.match_value = Some(value.into());
        self
    }
}

impl ApiRequest for GetPublicRow {
    fn operation(&self) -> Operation {
        Operation::GetPublicRow
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_scope(&self.access_key, &self.sheet_name).finish()
    }

    fn build(&self) -> ApiCall {
        let mut call = ApiCall::new(
            Operation::GetPublicRow,
            Method::Get,
            &["public-row", self.access_key.as_str(), self.sheet_name.as_str()],
        );
        if let Some((with, value)) =
            match_pair(self.match_with.as_deref(), self.match_value.as_deref())
        {
            call = call.query("matchWith", with).query("matchValue", value);
        }
        call
    }
}

/// `PATCH /user-access/public-row/{accessKey}/{sheetName}/{rowId}`.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdatePublicRow {
    /// Access key scope.
    pub access_key: AccessKey,
    /// Sheet holding the row.
    pub sheet_name: String,
    /// Target row.
    pub row_id: String,
    /// Columns to change.
    pub updates: Option<Row>,
    /// Role the caller acts as (default `customer`).
    pub role: String,
}

impl UpdatePublicRow {
    /// Patch a public row as a customer.
    pub fn new(
        access_key: impl Into<AccessKey>,
        sheet_name: impl Into<String>,
        row_id: impl Into<String>,
        updates: Row,
    ) -> Self {
        Self {
            access_key: access_key.into(),
            sheet_name: sheet_name.into(),
            row_id: row_id.into(),
            updates: Some(updates),
            role: DEFAULT_ROLE.to_string(),
        }
    }

    /// Act as a different role.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }
}

impl Default for UpdatePublicRow {
    fn default() -> Self {
        Self {
            access_key: AccessKey::default(),
            sheet_name: String::new(),
            row_id: String::new(),
            updates: None,
            role: DEFAULT_ROLE.to_string(),
        }
    }
}

impl ApiRequest for UpdatePublicRow {
    fn operation(&self) -> Operation {
        Operation::UpdatePublicRow
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_scope(&self.access_key, &self.sheet_name)
            .text("rowId", &self.row_id)
            .present("updates", self.updates.is_some())
            .finish()
    }

    fn build(&self) -> ApiCall {
        let updates = self.updates.clone().map_or(Value::Null, Value::Object);
        ApiCall::new(
            Operation::UpdatePublicRow,
            Method::Patch,
            &[
                "public-row",
                self.access_key.as_str(),
                self.sheet_name.as_str(),
                self.row_id.as_str(),
            ],
        )
        .json(json!({ "updates": updates, "role": self.role }))
    }
}

/// `PATCH /user-access/public-row/{accessKey}/{sheetName}/{rowId}/remove-from-array`.
///
/// Removes `value` from the array column `field` of another user's row,
/// e.g. dropping yourself from their `friends` list.
#[derive(Debug, Clone, PartialEq)]
pub struct DeletePublicRow {
    /// Access key scope.
    pub access_key: AccessKey,
    /// Sheet holding the row.
    pub sheet_name: String,
    /// Owner's uuid, used when `row_id` is not known.
    pub uuid: Option<String>,
    /// Target row; preferred over `uuid`.
    pub row_id: Option<String>,
    /// Array column to remove from.
    pub field: String,
    /// Value to remove. `Some(Value::Null)` is a legal value.
    pub value: Option<Value>,
    /// Role the caller acts as (default `customer`).
    pub role: String,
}

impl DeletePublicRow {
    /// Remove `value` from `field` of the row identified by `row_id`.
    pub fn new(
        access_key: impl Into<AccessKey>,
        sheet_name: impl Into<String>,
        row_id: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            access_key: access_key.into(),
            sheet_name: sheet_name.into(),
            row_id: Some(row_id.into()),
            field: field.into(),
            value: Some(value.into()),
            ..Self::default()
        }
    }

    /// Identify the row by its owner's uuid instead.
    pub fn by_uuid(
        access_key: impl Into<AccessKey>,
        sheet_name: impl Into<String>,
        uuid: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            access_key: access_key.into(),
            sheet_name: sheet_name.into(),
            uuid: Some(uuid.into()),
            field: field.into(),
            value: Some(value.into()),
            ..Self::default()
        }
    }

    /// The path identifier: `row_id` when set, else `uuid`.
    pub fn target(&self) -> Option<&str> {
        self.row_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .or_else(|| self.uuid.as_deref().filter(|id| !id.is_empty()))
    }
}

impl Default for DeletePublicRow {
    fn default() -> Self {
        Self {
            access_key: AccessKey::default(),
            sheet_name: String::new(),
            uuid: None,
            row_id: None,
            field: String::new(),
            value: None,
            role: DEFAULT_ROLE.to_string(),
        }
    }
}

impl ApiRequest for DeletePublicRow {
    fn operation(&self) -> Operation {
        Operation::DeletePublicRow
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_scope(&self.access_key, &self.sheet_name)
            .text("field", &self.field)
            .present("value", self.value.is_some())
            .present("rowId", self.target().is_some())
            .finish()
    }

    fn build(&self) -> ApiCall {
        ApiCall::new(
            Operation::DeletePublicRow,
            Method::Patch,
            &[
                "public-row",
                self.access_key.as_str(),
                self.sheet_name.as_str(),
                self.target().unwrap_or_default(),
                "remove-from-array",
            ],
        )
        .json(json!({
            "field": self.field,
            "value": self.value.clone().unwrap_or(Value::Null),
            "role": self.role,
        }))
    }
}
