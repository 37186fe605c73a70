//! Generic encoder/decoder engine for redbind
//!
//! This crate turns arbitrary `Serialize`/`Deserialize` types into the wire
//! value model used by key-value store clients, and back:
//!
//! - one wire value ([`Codec::encode_value`] / [`Codec::decode`])
//! - a flat field list for hash-oriented commands ([`Codec::encode_fields`]
//!   / [`Codec::decode_fields`])
//! - a flattened command-argument list ([`Codec::encode_args`])
//!
//! Every encode builds an intermediate [`Tree`] and projects it; every
//! decode walks the wire value against the shape the target type requests.
//! Shape decisions for opaque values come from the [`probe`](probe_value)
//! mechanism: a throwaway trial traversal that aborts at the first container
//! decision.
//!
//! ## Example
//!
//! ```
//! use redbind_codec::Codec;
//! use redbind_core::RespValue;
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
//! // Hash-oriented: field list out, struct back.
//! let fields = codec.encode_fields(&session)?;
//! assert_eq!(fields[0].0, "user");
//! let back: Session = codec.decode_fields(&fields)?;
//! assert_eq!(back, session);
//!
//! // Command arguments: names and values interleave.
//! let args = codec.encode_args(&session)?;
//! assert_eq!(args.len(), 4);
//! assert_eq!(args[0], RespValue::bulk(*b"user"));
//! # Ok::<(), redbind_core::CodecError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod blob;
mod config;
mod de;
mod fields;
mod probe;
mod project;
mod ser;
mod tree;
mod tree_de;

pub use blob::{BlobCodec, JsonBlobCodec};
pub use config::{BoolCoding, CodecConfig, DateCoding, FieldNaming, NestedCoding, NullFields};
pub use probe::{probe_type, probe_value, Shape};
pub use project::{project_args, project_fields, project_value, Projection};
pub use tree::Tree;

use redbind_core::{RespValue, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::trace;

/// A configured encoder/decoder instance.
///
/// Construction fixes the strategy configuration; the instance is then
/// immutable and freely shared across threads. Each operation owns its own
/// working state, so concurrent calls need no locking.
#[derive(Debug, Clone, Default)]
pub struct Codec {
    config: CodecConfig,
}

impl Codec {
    /// Build a codec over an assembled configuration.
    pub fn new(config: CodecConfig) -> Self {
        Codec { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Encode a value to its intermediate tree under the given projection.
    ///
    /// Most callers want one of the projected forms below; the raw tree is
    /// exposed for consumers composing their own projections.
    pub fn encode_tree<T: Serialize + ?Sized>(
        &self,
        value: &T,
        projection: Projection,
    ) -> Result<Tree> {
        trace!(
            "encode_tree: {} as {:?}",
            std::any::type_name::<T>(),
            projection
        );
        ser::encode_tree(value, &self.config, projection)
    }

    /// Encode a value to one wire value.
    ///
    /// Fails with `UnsupportedShape` when the value's root shape is keyed;
    /// flat maps have no single-value form in this protocol family.
    pub fn encode_value<T: Serialize + ?Sized>(&self, value: &T) -> Result<RespValue> {
        project_value(self.encode_tree(value, Projection::Value)?)
    }

    /// Encode a keyed value to the flat field list used by hash-oriented
    /// commands.
    pub fn encode_fields<T: Serialize + ?Sized>(
        &self,
        value: &T,
    ) -> Result<Vec<(String, RespValue)>> {
        project_fields(self.encode_tree(value, Projection::Fields)?)
    }

    /// Encode a value to a flattened command-argument list.
    pub fn encode_args<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<RespValue>> {
        project_args(self.encode_tree(value, Projection::Args)?, &self.config)
    }

    /// Decode a target from one wire value.
    pub fn decode<'de, T: Deserialize<'de>>(&self, value: &'de RespValue) -> Result<T> {
        trace!("decode: {}", std::any::type_name::<T>());
        T::deserialize(de::ValueDeserializer::new(value, &self.config))
    }

    /// Decode a keyed target from a field-name → wire-value list.
    ///
    /// Fails immediately with `UnsupportedShape` when the target's probed
    /// shape is not keyed. Lookups use the first occurrence of a name.
    pub fn decode_fields<'de, T: Deserialize<'de>>(
        &self,
        fields: &'de [(String, RespValue)],
    ) -> Result<T> {
        trace!("decode_fields: {}", std::any::type_name::<T>());
        match probe_type::<T>() {
            Shape::Keyed | Shape::Unknown => {
                T::deserialize(fields::FieldsDeserializer::new(fields, &self.config))
            }
            _ => Err(redbind_core::CodecError::UnsupportedShape {
                path: redbind_core::Path::root(),
            }),
        }
    }

    /// Convenience over [`Codec::decode_fields`] for callers holding a map.
    /// Map iteration order is unspecified, which is fine: field lookup is
    /// by name and a map cannot carry duplicates.
    pub fn decode_field_map<T: serde::de::DeserializeOwned>(
        &self,
        fields: &HashMap<String, RespValue>,
    ) -> Result<T> {
        let entries: Vec<(String, RespValue)> = fields
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        self.decode_fields(&entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redbind_core::CodecError;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Session {
        user: String,
        hits: i64,
    }

    fn session() -> Session {
        Session {
            user: "ada".into(),
            hits: 3,
        }
    }

    #[test]
    fn test_encode_value_of_keyed_root_is_unsupported() {
        let err = Codec::default().encode_value(&session()).unwrap_err();
        assert!(matches!(err, CodecError::UnsupportedShape { .. }));
    }

    #[test]
    fn test_encode_value_of_scalar_and_vec() {
        let codec = Codec::default();
        assert_eq!(codec.encode_value(&7_i64).unwrap(), RespValue::Int(7));
        assert_eq!(
            codec.encode_value(&vec![1_i64, 2]).unwrap(),
            RespValue::Array(vec![RespValue::Int(1), RespValue::Int(2)])
        );
    }

    #[test]
    fn test_fields_round_trip() {
        let codec = Codec::default();
        let fields = codec.encode_fields(&session()).unwrap();
        let back: Session = codec.decode_fields(&fields).unwrap();
        assert_eq!(back, session());
    }

    #[test]
    fn test_decode_fields_rejects_non_keyed_target() {
        let codec = Codec::default();
        let fields = codec.encode_fields(&session()).unwrap();
        let err = codec.decode_fields::<i64>(&fields).unwrap_err();
        assert!(matches!(err, CodecError::UnsupportedShape { .. }));
    }

    #[test]
    fn test_decode_field_map() {
        let codec = Codec::default();
        let mut map = HashMap::new();
        map.insert("user".to_string(), RespValue::bulk(*b"ada"));
        map.insert("hits".to_string(), RespValue::Int(3));
        let back: Session = codec.decode_field_map(&map).unwrap();
        assert_eq!(back, session());
    }

    #[test]
    fn test_codec_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Codec>();
    }
}
