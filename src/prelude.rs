//! Convenience re-exports for typical codec usage.
//!
//! ```
//! use redbind::prelude::*;
//!
//! let codec = Codec::default();
//! # let _ = codec;
//! ```

pub use redbind_codec::{
    BoolCoding, Codec, CodecConfig, DateCoding, FieldNaming, NestedCoding, NullFields, Projection,
};
pub use redbind_core::{CodecError, Path, RespValue, Result, Timestamp};
