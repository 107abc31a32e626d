//! # sheet-client
//!
//! Client library for the gShell user-access backend.
//!
//! ## Features
//!
//! - **REST client**: registration, cookie-session login/logout, CRUD on
//!   the caller's rows and on public rows, file upload
//! - **Realtime channel**: one Socket.IO connection per channel object,
//!   forwarding subscribed events to a single callback
//! - **Transport Abstraction**: pluggable HTTP and realtime transports
//!   (reqwest / rust_socketio, mocks for tests)
//! - **Pure logic in sheet-core**: request building, validation, the
//!   connection state machine and the list normalizer have no I/O
//!
//! ## Example
//!
//! ```no_run
//! use sheet_core::{GetAllMyRows, LoginUser};
//! use sheetkit_client::{ClientConfig, ReqwestTransport, SheetClient};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = SheetClient::new(ClientConfig::default(), ReqwestTransport::new()?);
//! client.login_user(&LoginUser::new("key", "ada", "secret")).await?;
//! let rows = client
//!     .get_all_my_rows(&GetAllMyRows::new("key", "orders").filter("status", "open"))
//!     .await?;
//! # let _ = rows;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod http;
pub mod realtime;

pub use client::{ClientConfig, ClientError, SheetClient, DEFAULT_BASE_URL};
pub use http::{
    build_url, HttpRequest, HttpResponse, HttpTransport, MockHttp, ReqwestTransport,
    TransportError,
};
pub use realtime::{
    MessageHandler, MockSocket, RealtimeChannel, RealtimeConfig, RealtimeError,
    RealtimeTransport, SignalHandler, SocketIoTransport, TransportSignal, DEFAULT_REALTIME_URL,
};
