//! SheetClient - the REST half of the SDK.
//!
//! This module provides [`SheetClient`], one async method per backend
//! endpoint. Each call follows the same contract:
//!
//! 1. validate required fields (no network on failure),
//! 2. issue exactly one HTTP request through the [`HttpTransport`],
//! 3. decode the `{success, data, message, url}` envelope and return the
//!    payload or the server's message.
//!
//! ```text
//! Application → SheetClient → HttpTransport → Network
//!                   ↓
//!              sheet-core (request building)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use sheet_core::{GetMyRow, LoginUser};
//! use sheetkit_client::{ClientConfig, ReqwestTransport, SheetClient};
//!
//! let client = SheetClient::new(ClientConfig::default(), ReqwestTransport::new()?);
//! client.login_user(&LoginUser::new("key", "ada", "secret")).await?;
//! let row = client.get_my_row(&GetMyRow::new("key", "profiles")).await?;
//! ```

use serde_json::Value;
use sheet_core::{
    AddMyRow, ApiRequest, DeleteMyRow, DeletePublicRow, GetAllMyRows, GetMyRow, GetPublicRow,
    GetPublicUserRows, LoginUser, LogoutUser, RefreshMyRow, RegisterUser, UpdateMyRow,
    UpdatePublicRow, UploadMyRow, ValidationError,
};
use sheet_types::{EnvelopeError, Rejected, Reply};
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::http::{build_url, HttpRequest, HttpTransport, TransportError};

/// Production API host.
pub const DEFAULT_BASE_URL: &str = "https://api.gshell.cloud";

/// Client errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Required inputs were missing. Nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Transport error.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The server answered with an empty body.
    #[error("empty response from server")]
    EmptyResponse,

    /// The server answered with something other than JSON.
    #[error("invalid JSON response from server: {excerpt}")]
    InvalidResponse {
        /// Leading slice of the raw body.
        excerpt: String,
    },

    /// JSON came back but not in envelope shape.
    #[error("malformed response envelope: {0}")]
    MalformedEnvelope(String),

    /// The server answered `success: false`.
    #[error("{message}")]
    Server {
        /// Server message, or the operation's fallback.
        message: String,
    },
}

impl ClientError {
    /// Check whether the error was raised before anything was sent.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<EnvelopeError> for ClientError {
    fn from(err: EnvelopeError) -> Self {
        match err {
            EnvelopeError::Empty => Self::EmptyResponse,
            EnvelopeError::InvalidJson { excerpt } => Self::InvalidResponse { excerpt },
            other => Self::MalformedEnvelope(other.to_string()),
        }
    }
}

impl From<Rejected> for ClientError {
    fn from(err: Rejected) -> Self {
        Self::Server {
            message: err.message,
        }
    }
}

/// Configuration for SheetClient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Scheme, host and optional path prefix every request is joined onto.
    pub base_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl ClientConfig {
    /// Point the client at a different host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// The REST client.
///
/// Holds no mutable state of its own; concurrent calls are independent.
/// Session cookies live in the transport.
pub struct SheetClient<H: HttpTransport> {
    config: ClientConfig,
    http: H,
}

impl<H: HttpTransport> SheetClient<H> {
    /// Create a new SheetClient.
    pub fn new(config: ClientConfig, http: H) -> Self {
        Self { config, http }
    }

    /// The active configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get a reference to the underlying transport.
    pub fn transport(&self) -> &H {
        &self.http
    }

    /// Validate, send and decode. Server-side failures come back as
    /// `Reply::Failure`, not as errors.
    async fn send<R: ApiRequest + Sync>(&self, request: &R) -> Result<Reply, ClientError> {
        let call = request.to_call()?;
        let operation = call.operation;
        let url = build_url(&self.config.base_url, &call)?;

        debug!(%operation, method = %call.method, "sending request");
        if operation.carries_credentials() {
            trace!(%url, "request detail (credentials withheld)");
        } else {
            trace!(%url, body = ?call.body, "request detail");
        }

        let response = self
            .http
            .execute(HttpRequest {
                method: call.method,
                url,
                body: call.body,
            })
            .await?;

        trace!(%operation, status = response.status, body = %response.body, "raw response");

        let reply = Reply::decode(&response.body).map_err(|err| {
            warn!(%operation, status = response.status, error = %err, "undecodable response");
            ClientError::from(err)
        })?;

        if let Reply::Failure { message } = &reply {
            warn!(%operation, status = response.status, ?message, "server rejected request");
        }
        Ok(reply)
    }

    async fn data<R: ApiRequest + Sync>(&self, request: &R) -> Result<Value, ClientError> {
        let fallback = request.operation().fallback_message();
        Ok(self.send(request).await?.into_data(fallback)?)
    }

    // ===== Session =====

    /// Create a user. Returns the server's `data` (usually the created row).
    pub async fn register_user(&self, request: &RegisterUser) -> Result<Value, ClientError> {
        self.data(request).await
    }

    /// Log in. The session cookie is stored by the transport.
    pub async fn login_user(&self, request: &LoginUser) -> Result<Value, ClientError> {
        self.data(request).await
    }

    /// Log out. Never fails: any error, including `success: false`, is
    /// logged and reported as `false`.
    pub async fn logout_user(&self) -> bool {
        match self.send(&LogoutUser).await {
            Ok(reply) => reply.is_success(),
            Err(err) => {
                warn!(error = %err, "logout failed");
                false
            }
        }
    }

    // ===== Own rows =====

    /// Fetch the caller's row.
    pub async fn get_my_row(&self, request: &GetMyRow) -> Result<Value, ClientError> {
        self.data(request).await
    }

    /// Fetch all of the caller's rows matching the filters.
    pub async fn get_all_my_rows(&self, request: &GetAllMyRows) -> Result<Value, ClientError> {
        self.data(request).await
    }

    /// Add a row, optionally merging into an existing one server-side.
    pub async fn add_my_row(&self, request: &AddMyRow) -> Result<Value, ClientError> {
        self.data(request).await
    }

    /// Patch the caller's row.
    pub async fn update_my_row(&self, request: &UpdateMyRow) -> Result<Value, ClientError> {
        self.data(request).await
    }

    /// Delete from the caller's rows.
    pub async fn delete_my_row(&self, request: &DeleteMyRow) -> Result<Value, ClientError> {
        self.data(request).await
    }

    /// Upload a file into a column. Returns the stored file's URL rather
    /// than `data`.
    pub async fn upload_my_row(&self, request: &UploadMyRow) -> Result<String, ClientError> {
        let fallback = request.operation().fallback_message();
        self.send(request).await?.into_url(fallback)?.ok_or_else(|| {
            ClientError::MalformedEnvelope("successful upload reply carries no `url`".into())
        })
    }

    /// Re-fetch the caller's row.
    pub async fn refresh_my_row(&self, request: &RefreshMyRow) -> Result<Value, ClientError> {
        self.data(request).await
    }

    // ===== Public rows =====

    /// Fetch rows owned by other users.
    pub async fn get_public_user_rows(
        &self,
        request: &GetPublicUserRows,
    ) -> Result<Value, ClientError> {
        self.data(request).await
    }

    /// Fetch one public row.
    pub async fn get_public_row(&self, request: &GetPublicRow) -> Result<Value, ClientError> {
        self.data(request).await
    }

    /// Patch a public row.
    pub async fn update_public_row(
        &self,
        request: &UpdatePublicRow,
    ) -> Result<Value, ClientError> {
        self.data(request).await
    }

    /// Remove a value from an array column of a public row.
    pub async fn delete_public_row(
        &self,
        request: &DeletePublicRow,
    ) -> Result<Value, ClientError> {
        self.data(request).await
    }
}
