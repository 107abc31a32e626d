//! Request building for the REST endpoints.
//!
//! Each endpoint has a request struct that knows its required fields and
//! compiles to an [`ApiCall`]: method, path segments, query pairs and body.
//! Nothing here touches the network; `sheet-client` joins the call onto a
//! base URL and executes it.
//!
//! # Example
//!
//! ```
//! use sheetkit_core::{ApiRequest, GetMyRow, Method};
//!
//! let call = GetMyRow::new("key", "profiles").match_with("email").to_call().unwrap();
//! assert_eq!(call.method, Method::Get);
//! assert_eq!(call.path(), "/user-access/user-row/key/profiles");
//! assert_eq!(call.query, vec![("matchWith".to_string(), "email".to_string())]);
//! ```

mod auth;
mod my_rows;
mod public;

pub use auth::{LoginUser, LogoutUser, RegisterUser};
pub use my_rows::{
    AddMyRow, DeleteMyRow, GetAllMyRows, GetMyRow, MergeAction, MergeOptions, RefreshMyRow,
    UpdateMyRow, UploadMyRow,
};
pub use public::{DeletePublicRow, GetPublicRow, GetPublicUserRows, UpdatePublicRow};

use serde_json::Value;
use std::fmt;

use crate::ValidationError;

/// Role sent when the caller does not choose one.
pub const DEFAULT_ROLE: &str = "customer";

/// Root path segment shared by every endpoint.
const ROOT: &str = "user-access";

/// A request that can be validated and compiled to an [`ApiCall`].
pub trait ApiRequest {
    /// Which endpoint this request targets.
    fn operation(&self) -> Operation;

    /// Check required fields. Never touches the network.
    fn validate(&self) -> Result<(), ValidationError>;

    /// Build the call without validating.
    fn build(&self) -> ApiCall;

    /// Validate, then build.
    fn to_call(&self) -> Result<ApiCall, ValidationError> {
        self.validate()?;
        Ok(self.build())
    }
}

/// The endpoints exposed by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Create a user within an access key scope.
    RegisterUser,
    /// Start a cookie session.
    LoginUser,
    /// End the cookie session.
    LogoutUser,
    /// Fetch the caller's row.
    GetMyRow,
    /// Fetch all of the caller's rows.
    GetAllMyRows,
    /// Insert (or merge) a row owned by the caller.
    AddMyRow,
    /// Patch the caller's row.
    UpdateMyRow,
    /// Delete from the caller's rows.
    DeleteMyRow,
    /// Upload a file into a column of the caller's row.
    UploadMyRow,
    /// Re-fetch the caller's row.
    RefreshMyRow,
    /// Fetch rows owned by other users.
    GetPublicUserRows,
    /// Fetch one public row.
    GetPublicRow,
    /// Patch a public row.
    UpdatePublicRow,
    /// Remove a value from an array field of a public row.
    DeletePublicRow,
}

impl Operation {
    /// The SDK-level name of the operation.
    pub fn name(&self) -> &'static str {
        match self {
            Self::RegisterUser => "registerUser",
            Self::LoginUser => "loginUser",
            Self::LogoutUser => "logoutUser",
            Self::GetMyRow => "getMyRow",
            Self::GetAllMyRows => "getAllMyRows",
            Self::AddMyRow => "addMyRow",
            Self::UpdateMyRow => "updateMyRow",
            Self::DeleteMyRow => "deleteMyRow",
            Self::UploadMyRow => "uploadMyRow",
            Self::RefreshMyRow => "refreshMyRow",
            Self::GetPublicUserRows => "getPublicUserRows",
            Self::GetPublicRow => "getPublicRow",
            Self::UpdatePublicRow => "updatePublicRow",
            Self::DeletePublicRow => "deletePublicRow",
        }
    }

    /// Whether the request body may hold a password.
    pub fn carries_credentials(&self) -> bool {
        matches!(self, Self::RegisterUser | Self::LoginUser)
    }

    /// Message used when the server rejects a call without saying why.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::RegisterUser => "Registration failed",
            Self::LoginUser => "Login failed",
            Self::LogoutUser => "Logout failed",
            Self::GetMyRow => "Failed to fetch user row",
            Self::GetAllMyRows => "Failed to fetch user rows",
            Self::AddMyRow => "Failed to add row",
            Self::UpdateMyRow => "Failed to update user row",
            Self::DeleteMyRow => "Failed to delete user row",
            Self::UploadMyRow => "Failed to upload image",
            Self::RefreshMyRow => "Failed to refresh user row",
            Self::GetPublicUserRows => "Failed to fetch public user rows",
            Self::GetPublicRow => "Failed to fetch public row",
            Self::UpdatePublicRow => "Failed to update public row",
            Self::DeletePublicRow => "Failed to remove value from public row",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
    /// PATCH
    Patch,
    /// DELETE
    Delete,
}

impl Method {
    /// Upper-case method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file to upload.
#[derive(Clone, PartialEq, Eq)]
pub struct FileUpload {
    /// File name reported in the multipart part.
    pub file_name: String,
    /// MIME type, if known.
    pub content_type: Option<String>,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl FileUpload {
    /// Create an upload from a name and contents.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes,
        }
    }

    /// Set the MIME type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

impl fmt::Debug for FileUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("bytes", &format!("[{} bytes]", self.bytes.len()))
            .finish()
    }
}

/// A multipart form: one file part plus text fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartForm {
    /// Name of the file part.
    pub file_field: String,
    /// The file.
    pub file: FileUpload,
    /// Additional text parts, in order.
    pub fields: Vec<(String, String)>,
}

/// Request body.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CallBody {
    /// No body.
    #[default]
    Empty,
    /// `application/json` body.
    Json(Value),
    /// `multipart/form-data` body.
    Multipart(MultipartForm),
}

/// A fully described HTTP call, relative to the base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiCall {
    /// The endpoint this call targets.
    pub operation: Operation,
    /// HTTP method.
    pub method: Method,
    /// Unencoded path segments.
    pub segments: Vec<String>,
    /// Query pairs, in order.
    pub query: Vec<(String, String)>,
    /// Body.
    pub body: CallBody,
}

impl ApiCall {
    pub(crate) fn new(operation: Operation, method: Method, segments: &[&str]) -> Self {
        let mut all = Vec::with_capacity(segments.len() + 1);
        all.push(ROOT.to_string());
        all.extend(segments.iter().map(|s| s.to_string()));
        Self {
            operation,
            method,
            segments: all,
            query: Vec::new(),
            body: CallBody::Empty,
        }
    }

    pub(crate) fn query(mut self, key: &str, value: impl Into<String>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    pub(crate) fn json(mut self, body: Value) -> Self {
        self.body = CallBody::Json(body);
        self
    }

    pub(crate) fn multipart(mut self, form: MultipartForm) -> Self {
        self.body = CallBody::Multipart(form);
        self
    }

    /// The path as plain text (unencoded), for logs and tests.
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }
}

/// Both halves of a match filter must be non-blank for either to be sent.
pub(crate) fn match_pair<'a>(
    with: Option<&'a str>,
    value: Option<&'a str>,
) -> Option<(&'a str, &'a str)> {
    match (with, value) {
        (Some(w), Some(v)) if !w.is_empty() && !v.is_empty() => Some((w, v)),
        _ => None,
    }
}
