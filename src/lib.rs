//! # redbind
//!
//! Bidirectional codec between structured Rust values and the compact wire
//! value model used by key-value store clients (null / text / bytes / error
//! / integer / array).
//!
//! From one derived type, a configured [`Codec`] produces any of three
//! wire-facing forms, and reconstructs the type from a wire value or a
//! field map:
//!
//! ```
//! use redbind::prelude::*;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! struct Session {
//!     user: String,
//!     hits: i64,
//! }
//!
//! let codec = Codec::default();
//! let session = Session { user: "ada".into(), hits: 3 };
//!
//! // Hash-oriented commands: a flat field list.
//! let fields = codec.encode_fields(&session)?;
//!
//! // Variadic commands: names and values interleaved.
//! let args = codec.encode_args(&session)?;
//! assert_eq!(args.len(), 4);
//!
//! // And back again.
//! let restored: Session = codec.decode_fields(&fields)?;
//! assert_eq!(restored, session);
//! # Ok::<(), CodecError>(())
//! ```
//!
//! The codec never performs I/O: wire values come from and go to an
//! external client library, and the codec only maps between them and
//! application types.
//!
//! ## Strategy configuration
//!
//! Boolean and date representations, field-name casing, the null-field
//! policy, and the handling of structurally unrepresentable shapes are all
//! fixed at construction time through [`CodecConfig`]:
//!
//! ```
//! use redbind::prelude::*;
//!
//! let codec = Codec::new(
//!     CodecConfig::default()
//!         .with_booleans(BoolCoding::Int)
//!         .with_dates(DateCoding::UnixSeconds)
//!         .with_field_names(FieldNaming::CamelCase),
//! );
//! # let _ = codec;
//! ```

#![warn(missing_docs)]

pub mod prelude;

// Re-export the data model
pub use redbind_core::{CodecError, Path, PathSegment, RespValue, Result, Timestamp};

// Re-export the engine surface
pub use redbind_codec::{
    probe_type, probe_value, project_args, project_fields, project_value, BlobCodec, BoolCoding,
    Codec, CodecConfig, DateCoding, FieldNaming, JsonBlobCodec, NestedCoding, NullFields,
    Projection, Shape, Tree,
};
