//! Core data model for redbind
//!
//! This crate defines the leaf types shared by every layer of the codec:
//!
//! - [`RespValue`] - the wire-protocol value union (null / text / bytes /
//!   error / integer / array), supplied to and consumed from a key-value
//!   store client library
//! - [`Path`] - the field/index path attached to every error for
//!   diagnosability
//! - [`CodecError`] - the single error type used by both encode and decode
//! - [`Timestamp`] - a UTC instant wrapper that the codec can intercept and
//!   re-represent per its configured date strategy
//!
//! The wire value carries no transport logic. Framing, parsing, and I/O
//! belong to the client library that produces and consumes these values.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod path;
mod time;
mod value;

pub use error::CodecError;
pub use path::{Path, PathSegment};
pub use time::{Timestamp, TIMESTAMP_TOKEN};
pub use value::{RespValue, RESP_VALUE_TOKEN};

/// Convenience alias used across the workspace.
pub type Result<T> = std::result::Result<T, CodecError>;
