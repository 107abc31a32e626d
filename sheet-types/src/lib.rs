//! # sheet-types
//!
//! Wire format types for the sheetkit row-store client.
//!
//! This crate provides the foundational types used across all sheetkit crates:
//! - [`Envelope`], [`Reply`] - The `{success, data, message, url}` response shape
//! - [`AccessKey`] - Tenant/application scope credential
//! - [`Row`] - A column-keyed record
//! - [`ColumnType`], [`ColumnTypes`] - Declared column types for list normalization
//! - [`EnvelopeError`], [`Rejected`] - Error types

#![warn(missing_docs)]
#![warn(clippy::all)]

mod column;
mod envelope;
mod error;
mod ids;

pub use column::{ColumnType, ColumnTypes};
pub use envelope::{excerpt, Envelope, Reply, EXCERPT_LEN};
pub use error::{EnvelopeError, Rejected};
pub use ids::{AccessKey, Row};
