//! Endpoints scoped to the logged-in user's own rows.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use sheet_types::{AccessKey, Row};
use std::str::FromStr;

use super::{ApiCall, ApiRequest, FileUpload, Method, MultipartForm, Operation};
use crate::validate::{Required, ValidationError};

/// `GET /user-access/user-row/{accessKey}/{sheetName}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetMyRow {
    /// Access key scope.
    pub access_key: AccessKey,
    /// Sheet to read.
    pub sheet_name: String,
    /// Column the server matches the session user against.
    pub match_with: Option<String>,
}

impl GetMyRow {
    /// Fetch the caller's row in a sheet.
    pub fn new(access_key: impl Into<AccessKey>, sheet_name: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            sheet_name: sheet_name.into(),
            match_with: None,
        }
    }

    /// Match the session user on a specific column.
    pub fn match_with(mut self, column: impl Into<String>) -> Self {
        self.match_with = Some(column.into());
        self
    }
}

impl ApiRequest for GetMyRow {
    fn operation(&self) -> Operation {
        Operation::GetMyRow
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_scope(&self.access_key, &self.sheet_name).finish()
    }

    fn build(&self) -> ApiCall {
        let mut call = user_row(Operation::GetMyRow, Method::Get, self);
        if let Some(column) = self.match_with.as_deref().filter(|c| !c.is_empty()) {
            call = call.query("matchWith", column);
        }
        call
    }
}

/// `GET /user-access/user-row/{accessKey}/{sheetName}?mode=all&…`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetAllMyRows {
    /// Access key scope.
    pub access_key: AccessKey,
    /// Sheet to read.
    pub sheet_name: String,
    /// Extra query filters, in order. `null` values are skipped.
    pub filters: Vec<(String, Value)>,
}

impl GetAllMyRows {
    /// Fetch all of the caller's rows in a sheet.
    pub fn new(access_key: impl Into<AccessKey>, sheet_name: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            sheet_name: sheet_name.into(),
            filters: Vec::new(),
        }
    }

    /// Append a filter.
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push((key.into(), value.into()));
        self
    }
}

impl ApiRequest for GetAllMyRows {
    fn operation(&self) -> Operation {
        Operation::GetAllMyRows
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_scope(&self.access_key, &self.sheet_name).finish()
    }

    fn build(&self) -> ApiCall {
        let mut call = user_row(Operation::GetAllMyRows, Method::Get, self).query("mode", "all");
        for (key, value) in &self.filters {
            let rendered = match value {
                Value::Null => continue,
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            call = call.query(key, rendered);
        }
        call
    }
}

/// How the server merges a new row into an existing one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeAction {
    /// Overwrite the existing row.
    #[default]
    Replace,
    /// Add to the increment field.
    Increment,
    /// Append to the append field.
    Append,
}

impl MergeAction {
    /// Wire spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Replace => "replace",
            Self::Increment => "increment",
            Self::Append => "append",
        }
    }
}

impl FromStr for MergeAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "replace" => Ok(Self::Replace),
            "increment" => Ok(Self::Increment),
            "append" => Ok(Self::Append),
            other => Err(format!(
                "unknown merge action '{}' (expected replace, increment or append)",
                other
            )),
        }
    }
}

/// Server-side merge behaviour for [`AddMyRow`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOptions {
    /// Column holding the owner's username. Omitted when unset.
    pub username_field: Option<String>,
    /// Merge into the user's existing row instead of inserting.
    pub merge_user_rows: bool,
    /// Column identifying which row to merge into.
    pub merge_key: Option<String>,
    /// Merge strategy.
    pub merge_action: MergeAction,
    /// Column used by [`MergeAction::Increment`].
    pub increment_field: String,
    /// Column used by [`MergeAction::Append`].
    pub append_field: String,
    /// Always insert, ignoring every other merge option.
    pub skip_merge: bool,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            username_field: None,
            merge_user_rows: false,
            merge_key: None,
            merge_action: MergeAction::Replace,
            increment_field: "quantity".to_string(),
            append_field: "items".to_string(),
            skip_merge: false,
        }
    }
}

/// `POST /user-access/user-row/{accessKey}/add/{sheetName}`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddMyRow {
    /// Access key scope.
    pub access_key: AccessKey,
    /// Sheet to write.
    pub sheet_name: String,
    /// Row to insert.
    pub row: Option<Row>,
    /// Merge behaviour.
    pub options: MergeOptions,
}

impl AddMyRow {
    /// Insert a row with default merge options.
    pub fn new(access_key: impl Into<AccessKey>, sheet_name: impl Into<String>, row: Row) -> Self {
        Self {
            access_key: access_key.into(),
            sheet_name: sheet_name.into(),
            row: Some(row),
            options: MergeOptions::default(),
        }
    }

    /// Replace the merge options.
    pub fn with_options(mut self, options: MergeOptions) -> Self {
        self.options = options;
        self
    }
}

impl ApiRequest for AddMyRow {
    fn operation(&self) -> Operation {
        Operation::AddMyRow
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_scope(&self.access_key, &self.sheet_name)
            .present("row", self.row.is_some())
            .finish()
    }

    fn build(&self) -> ApiCall {
        let o = &self.options;
        let mut body = Map::new();
        body.insert(
            "row".into(),
            self.row.clone().map_or(Value::Null, Value::Object),
        );
        if let Some(field) = &o.username_field {
            body.insert("usernameField".into(), Value::String(field.clone()));
        }
        body.insert("mergeUserRows".into(), Value::Bool(o.merge_user_rows));
        body.insert(
            "mergeKey".into(),
            o.merge_key.clone().map_or(Value::Null, Value::String),
        );
        body.insert("mergeAction".into(), o.merge_action.as_str().into());
        body.insert("incrementField".into(), o.increment_field.clone().into());
        body.insert("appendField".into(), o.append_field.clone().into());
        body.insert("skipMerge".into(), Value::Bool(o.skip_merge));

        ApiCall::new(
            Operation::AddMyRow,
            Method::Post,
            &["user-row", self.access_key.as_str(), "add", self.sheet_name.as_str()],
        )
        .json(Value::Object(body))
    }
}

/// `PATCH /user-access/user-row/{accessKey}/{sheetName}`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateMyRow {
    /// Access key scope.
    pub access_key: AccessKey,
    /// Sheet to write.
    pub sheet_name: String,
    /// Columns to change.
    pub updates: Option<Row>,
}

impl UpdateMyRow {
    /// Patch the caller's row.
    pub fn new(
        access_key: impl Into<AccessKey>,
        sheet_name: impl Into<String>,
        updates: Row,
    ) -> Self {
        Self {
            access_key: access_key.into(),
            sheet_name: sheet_name.into(),
            updates: Some(updates),
        }
    }
}

impl ApiRequest for UpdateMyRow {
    fn operation(&self) -> Operation {
        Operation::UpdateMyRow
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_scope(&self.access_key, &self.sheet_name)
            .present("updates", self.updates.is_some())
            .finish()
    }

    fn build(&self) -> ApiCall {
        let updates = self.updates.clone().map_or(Value::Null, Value::Object);
        user_row(Operation::UpdateMyRow, Method::Patch, self).json(json!({ "updates": updates }))
    }
}

/// `DELETE /user-access/user-row/{accessKey}/{sheetName}`.
///
/// `mode`, `field` and `value` are interpreted by the server; unset ones are
/// left out of the body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeleteMyRow {
    /// Access key scope.
    pub access_key: AccessKey,
    /// Sheet to delete from.
    pub sheet_name: String,
    /// Deletion mode.
    pub mode: Option<String>,
    /// Field the deletion targets.
    pub field: Option<String>,
    /// Value the deletion targets.
    pub value: Option<Value>,
}

impl DeleteMyRow {
    /// Delete using the server's default mode.
    pub fn new(access_key: impl Into<AccessKey>, sheet_name: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            sheet_name: sheet_name.into(),
            ..Self::default()
        }
    }
}

impl ApiRequest for DeleteMyRow {
    fn operation(&self) -> Operation {
        Operation::DeleteMyRow
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_scope(&self.access_key, &self.sheet_name).finish()
    }

    fn build(&self) -> ApiCall {
        let mut body = Map::new();
        if let Some(mode) = &self.mode {
            body.insert("mode".into(), Value::String(mode.clone()));
        }
        if let Some(field) = &self.field {
            body.insert("field".into(), Value::String(field.clone()));
        }
        if let Some(value) = &self.value {
            body.insert("value".into(), value.clone());
        }
        user_row(Operation::DeleteMyRow, Method::Delete, self).json(Value::Object(body))
    }
}

/// `POST /user-access/user-row/{accessKey}/{sheetName}/upload` (multipart).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadMyRow {
    /// Access key scope.
    pub access_key: AccessKey,
    /// Sheet holding the row.
    pub sheet_name: String,
    /// The file.
    pub file: Option<FileUpload>,
    /// Column that stores the resulting URL.
    pub column: String,
}

impl UploadMyRow {
    /// Upload a file into a column of the caller's row.
    pub fn new(
        access_key: impl Into<AccessKey>,
        sheet_name: impl Into<String>,
        file: FileUpload,
        column: impl Into<String>,
    ) -> Self {
        Self {
            access_key: access_key.into(),
            sheet_name: sheet_name.into(),
            file: Some(file),
            column: column.into(),
        }
    }
}

impl ApiRequest for UploadMyRow {
    fn operation(&self) -> Operation {
        Operation::UploadMyRow
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_scope(&self.access_key, &self.sheet_name)
            .present("file", self.file.is_some())
            .text("column", &self.column)
            .finish()
    }

    fn build(&self) -> ApiCall {
        let file = self
            .file
            .clone()
            .unwrap_or_else(|| FileUpload::new("", Vec::new()));
        ApiCall::new(
            Operation::UploadMyRow,
            Method::Post,
            &[
                "user-row",
                self.access_key.as_str(),
                self.sheet_name.as_str(),
                "upload",
            ],
        )
        .multipart(MultipartForm {
            file_field: "file".to_string(),
            file,
            fields: vec![("column".to_string(), self.column.clone())],
        })
    }
}

/// `GET /user-access/user-row/{accessKey}/{sheetName}`, with no filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshMyRow {
    /// Access key scope.
    pub access_key: AccessKey,
    /// Sheet to read.
    pub sheet_name: String,
}

impl RefreshMyRow {
    /// Re-fetch the caller's row.
    pub fn new(access_key: impl Into<AccessKey>, sheet_name: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            sheet_name: sheet_name.into(),
        }
    }
}

impl ApiRequest for RefreshMyRow {
    fn operation(&self) -> Operation {
        Operation::RefreshMyRow
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_scope(&self.access_key, &self.sheet_name).finish()
    }

    fn build(&self) -> ApiCall {
        user_row(Operation::RefreshMyRow, Method::Get, self)
    }
}

/// Requests addressed by access key and sheet.
trait Scoped {
    fn access_key(&self) -> &AccessKey;
    fn sheet_name(&self) -> &str;
}

macro_rules! scoped {
    ($($ty:ty),*) => {
        $(impl Scoped for $ty {
            fn access_key(&self) -> &AccessKey {
                &self.access_key
            }
            fn sheet_name(&self) -> &str {
                &self.sheet_name
            }
        })*
    };
}

scoped!(GetMyRow, GetAllMyRows, UpdateMyRow, DeleteMyRow, RefreshMyRow);

fn user_row(operation: Operation, method: Method, req: &impl Scoped) -> ApiCall {
    ApiCall::new(
        operation,
        method,
        &["user-row", req.access_key().as_str(), req.sheet_name()],
    )
}

pub(super) fn require_scope(access_key: &AccessKey, sheet_name: &str) -> Required {
    Required::new()
        .key("accessKey", access_key)
        .text("sheetName", sheet_name)
}
