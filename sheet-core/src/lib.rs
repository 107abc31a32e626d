//! # sheet-core
//!
//! Pure logic for sheetkit (no I/O, instant tests).
//!
//! This crate implements request building, validation, the realtime
//! connection state machine and list-field normalization without any
//! network access.
//!
//! ## Design Philosophy
//!
//! Every module here takes input and produces output without side effects:
//! - Request types validate themselves and compile to an [`ApiCall`]
//!   (method, path, query, body) that a transport executes
//! - [`ChannelState`] turns lifecycle events into actions for the client
//! - [`normalize_rows`] reshapes rows returned by the server
//!
//! The actual I/O (HTTP, websockets) is performed by `sheet-client`, which
//! interprets the calls and actions produced here.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod lists;
pub mod request;
pub mod state;
pub mod validate;

pub use lists::{coerce_list, normalize_row, normalize_rows, normalize_value};
pub use request::{
    AddMyRow, ApiCall, ApiRequest, CallBody, DeleteMyRow, DeletePublicRow, FileUpload,
    GetAllMyRows, GetMyRow, GetPublicRow, GetPublicUserRows, LoginUser, LogoutUser, MergeAction,
    MergeOptions, Method, MultipartForm, Operation, RefreshMyRow, RegisterUser, UpdateMyRow,
    UpdatePublicRow, UploadMyRow, DEFAULT_ROLE,
};
pub use state::{Action, ChannelEvent, ChannelState, Event};
pub use validate::ValidationError;
