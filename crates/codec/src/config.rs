//! Strategy configuration
//!
//! A [`CodecConfig`] is assembled once, attached to a [`crate::Codec`], and
//! never mutated afterwards. It is `Send + Sync`; independent encode/decode
//! calls share it read-only with no locking.

use crate::blob::{BlobCodec, JsonBlobCodec};
use redbind_core::{CodecError, Path, RespValue, Result, Timestamp};
use std::fmt;
use std::sync::Arc;

/// How booleans map to wire values.
#[derive(Debug, Clone, Copy, Default)]
pub enum BoolCoding {
    /// `"true"` / `"false"` byte strings. The default.
    #[default]
    Text,
    /// Integers `1` / `0`.
    Int,
    /// Caller-supplied function pair. `decode` must be the exact inverse of
    /// `encode`.
    Custom {
        /// Boolean to wire value.
        encode: fn(bool) -> RespValue,
        /// Wire value back to boolean; the path is for error reporting.
        decode: fn(&RespValue, &Path) -> Result<bool>,
    },
}

impl BoolCoding {
    pub(crate) fn encode(&self, value: bool) -> RespValue {
        match self {
            BoolCoding::Text => RespValue::bulk(if value { &b"true"[..] } else { &b"false"[..] }),
            BoolCoding::Int => RespValue::Int(i64::from(value)),
            BoolCoding::Custom { encode, .. } => encode(value),
        }
    }

    pub(crate) fn decode(&self, value: &RespValue, path: &Path) -> Result<bool> {
        match self {
            BoolCoding::Text => match value.as_text() {
                Some("true") => Ok(true),
                Some("false") => Ok(false),
                Some(other) => Err(CodecError::corrupted(
                    format!("expected boolean literal, found `{}`", other),
                    path.clone(),
                )),
                None => Err(CodecError::mismatch("Bool", value.type_name(), path.clone())),
            },
            BoolCoding::Int => match value {
                RespValue::Int(1) => Ok(true),
                RespValue::Int(0) => Ok(false),
                RespValue::Int(other) => Err(CodecError::corrupted(
                    format!("expected boolean integer 0 or 1, found {}", other),
                    path.clone(),
                )),
                other => Err(CodecError::mismatch("Bool", other.type_name(), path.clone())),
            },
            BoolCoding::Custom { decode, .. } => decode(value, path),
        }
    }
}

/// How [`Timestamp`] fields map to wire values.
#[derive(Debug, Clone, Copy, Default)]
pub enum DateCoding {
    /// Whole seconds since the Unix epoch, as an integer.
    UnixSeconds,
    /// Milliseconds since the Unix epoch, as an integer.
    UnixMillis,
    /// RFC 3339 text.
    Iso8601,
    /// Defer to the instant's underlying numeric representation
    /// (milliseconds). The default.
    #[default]
    Deferred,
    /// Caller-supplied function pair.
    Custom {
        /// Instant to wire value.
        encode: fn(&Timestamp) -> RespValue,
        /// Wire value back to an instant.
        decode: fn(&RespValue, &Path) -> Result<Timestamp>,
    },
}

impl DateCoding {
    pub(crate) fn encode(&self, ts: &Timestamp) -> RespValue {
        match self {
            DateCoding::UnixSeconds => RespValue::Int(ts.unix_seconds()),
            DateCoding::UnixMillis | DateCoding::Deferred => RespValue::Int(ts.unix_millis()),
            DateCoding::Iso8601 => RespValue::bulk(ts.to_rfc3339().into_bytes()),
            DateCoding::Custom { encode, .. } => encode(ts),
        }
    }

    pub(crate) fn decode(&self, value: &RespValue, path: &Path) -> Result<Timestamp> {
        match self {
            DateCoding::UnixSeconds => {
                let seconds = decode_integer(value, path)?;
                Timestamp::from_unix_seconds(seconds).ok_or_else(|| {
                    CodecError::corrupted(
                        format!("timestamp seconds out of range: {}", seconds),
                        path.clone(),
                    )
                })
            }
            DateCoding::UnixMillis | DateCoding::Deferred => {
                let millis = decode_integer(value, path)?;
                Timestamp::from_unix_millis(millis).ok_or_else(|| {
                    CodecError::corrupted(
                        format!("timestamp milliseconds out of range: {}", millis),
                        path.clone(),
                    )
                })
            }
            DateCoding::Iso8601 => match value.as_text() {
                Some(text) => Timestamp::parse_rfc3339(text).ok_or_else(|| {
                    CodecError::corrupted(
                        format!("invalid RFC 3339 timestamp: `{}`", text),
                        path.clone(),
                    )
                }),
                None => Err(CodecError::mismatch(
                    "Timestamp",
                    value.type_name(),
                    path.clone(),
                )),
            },
            DateCoding::Custom { decode, .. } => decode(value, path),
        }
    }
}

/// Integer off the wire: either a native integer or numeric text, the two
/// forms stores hand back.
pub(crate) fn decode_integer(value: &RespValue, path: &Path) -> Result<i64> {
    match value {
        RespValue::Int(i) => Ok(*i),
        RespValue::Simple(_) | RespValue::Bulk(_) => match value.as_text() {
            Some(text) => text.parse::<i64>().map_err(|_| {
                CodecError::corrupted(format!("invalid integer literal: `{}`", text), path.clone())
            }),
            None => Err(CodecError::corrupted(
                "integer literal is not valid UTF-8",
                path.clone(),
            )),
        },
        other => Err(CodecError::mismatch("Int", other.type_name(), path.clone())),
    }
}

/// What happens to values whose natural shape cannot be represented
/// structurally in the current context.
#[derive(Clone)]
pub enum NestedCoding {
    /// Hand the whole subtree to a blob codec and carry the bytes as one
    /// `Bulk` leaf. The default uses [`JsonBlobCodec`]; any [`BlobCodec`]
    /// implementation can be plugged in.
    Blob(Arc<dyn BlobCodec>),
    /// Fail the operation with `UnsupportedShape`.
    Reject,
}

impl NestedCoding {
    /// The default self-describing JSON blob codec.
    pub fn json() -> Self {
        NestedCoding::Blob(Arc::new(JsonBlobCodec))
    }

    /// A caller-supplied blob codec.
    pub fn custom(codec: impl BlobCodec + 'static) -> Self {
        NestedCoding::Blob(Arc::new(codec))
    }
}

impl Default for NestedCoding {
    fn default() -> Self {
        NestedCoding::json()
    }
}

impl fmt::Debug for NestedCoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NestedCoding::Blob(_) => f.write_str("NestedCoding::Blob(..)"),
            NestedCoding::Reject => f.write_str("NestedCoding::Reject"),
        }
    }
}

/// Case transform applied to every field name at encode time and inverted at
/// decode time.
///
/// Application field names are snake_case on the Rust side; the transform
/// picks the rendering used on the wire (and inside blob payloads).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldNaming {
    /// Names pass through untouched. The default.
    #[default]
    Preserve,
    /// `user_id` ⇄ `userId`.
    CamelCase,
    /// `user_id` ⇄ `UserId`.
    PascalCase,
    /// `user_id` ⇄ `USER_ID`.
    ScreamingSnakeCase,
    /// `user_id` ⇄ `user-id`.
    KebabCase,
}

impl FieldNaming {
    /// Render a Rust-side field name for the wire.
    pub fn to_wire(&self, name: &str) -> String {
        match self {
            FieldNaming::Preserve => name.to_string(),
            FieldNaming::CamelCase => snake_to_camel(name, false),
            FieldNaming::PascalCase => snake_to_camel(name, true),
            FieldNaming::ScreamingSnakeCase => name.to_ascii_uppercase(),
            FieldNaming::KebabCase => name.replace('_', "-"),
        }
    }

    /// Fold a wire-side field name back to its Rust-side rendering.
    pub fn from_wire(&self, name: &str) -> String {
        match self {
            FieldNaming::Preserve => name.to_string(),
            FieldNaming::CamelCase | FieldNaming::PascalCase => camel_to_snake(name),
            FieldNaming::ScreamingSnakeCase => name.to_ascii_lowercase(),
            FieldNaming::KebabCase => name.replace('-', "_"),
        }
    }
}

fn snake_to_camel(name: &str, capitalize_first: bool) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = capitalize_first;
    for c in name.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn camel_to_snake(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_uppercase() {
            if !out.is_empty() {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Encode-time policy for fields whose value encodes as `Null` (absent
/// optionals in particular).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NullFields {
    /// Drop the field entirely. The default.
    #[default]
    Omit,
    /// Keep the field with an explicit `Null` entry.
    Emit,
}

/// Immutable strategy bundle for one codec instance.
#[derive(Debug, Clone, Default)]
pub struct CodecConfig {
    /// Boolean representation.
    pub booleans: BoolCoding,
    /// Date representation for [`Timestamp`] fields.
    pub dates: DateCoding,
    /// Handling of shapes the context cannot carry structurally.
    pub nested: NestedCoding,
    /// Field-name case transform.
    pub field_names: FieldNaming,
    /// Policy for null-encoding fields.
    pub null_fields: NullFields,
}

impl CodecConfig {
    /// Replace the boolean strategy.
    pub fn with_booleans(mut self, booleans: BoolCoding) -> Self {
        self.booleans = booleans;
        self
    }

    /// Replace the date strategy.
    pub fn with_dates(mut self, dates: DateCoding) -> Self {
        self.dates = dates;
        self
    }

    /// Replace the nested/blob strategy.
    pub fn with_nested(mut self, nested: NestedCoding) -> Self {
        self.nested = nested;
        self
    }

    /// Replace the field naming transform.
    pub fn with_field_names(mut self, field_names: FieldNaming) -> Self {
        self.field_names = field_names;
        self
    }

    /// Replace the null-field policy.
    pub fn with_null_fields(mut self, null_fields: NullFields) -> Self {
        self.null_fields = null_fields;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // === Boolean strategies ===

    #[test]
    fn test_bool_text_round_trip() {
        let coding = BoolCoding::Text;
        let t = coding.encode(true);
        let f = coding.encode(false);
        assert_eq!(t, RespValue::bulk(*b"true"));
        assert_eq!(f, RespValue::bulk(*b"false"));
        assert_eq!(coding.decode(&t, &Path::root()).unwrap(), true);
        assert_eq!(coding.decode(&f, &Path::root()).unwrap(), false);
    }

    #[test]
    fn test_bool_text_accepts_simple_text() {
        let coding = BoolCoding::Text;
        assert_eq!(
            coding
                .decode(&RespValue::simple("true"), &Path::root())
                .unwrap(),
            true
        );
    }

    #[test]
    fn test_bool_int_round_trip() {
        let coding = BoolCoding::Int;
        assert_eq!(coding.encode(true), RespValue::Int(1));
        assert_eq!(coding.encode(false), RespValue::Int(0));
        assert_eq!(
            coding.decode(&RespValue::Int(1), &Path::root()).unwrap(),
            true
        );
        assert_eq!(
            coding.decode(&RespValue::Int(0), &Path::root()).unwrap(),
            false
        );
    }

    #[test]
    fn test_bool_bad_literal_is_corrupted() {
        let err = BoolCoding::Text
            .decode(&RespValue::bulk(*b"yes"), &Path::root())
            .unwrap_err();
        assert!(matches!(err, CodecError::DataCorrupted { .. }));

        let err = BoolCoding::Int
            .decode(&RespValue::Int(2), &Path::root())
            .unwrap_err();
        assert!(matches!(err, CodecError::DataCorrupted { .. }));
    }

    #[test]
    fn test_bool_wrong_wire_kind_is_mismatch() {
        let err = BoolCoding::Text
            .decode(&RespValue::Array(vec![]), &Path::root())
            .unwrap_err();
        assert!(matches!(err, CodecError::TypeMismatch { .. }));
    }

    // === Date strategies ===

    #[test]
    fn test_date_unix_seconds_round_trip() {
        let ts = Timestamp::from_unix_seconds(1_700_000_000).unwrap();
        let coding = DateCoding::UnixSeconds;
        let wire = coding.encode(&ts);
        assert_eq!(wire, RespValue::Int(1_700_000_000));
        assert_eq!(coding.decode(&wire, &Path::root()).unwrap(), ts);
    }

    #[test]
    fn test_date_unix_millis_round_trip() {
        let ts = Timestamp::from_unix_millis(1_700_000_000_123).unwrap();
        let coding = DateCoding::UnixMillis;
        let wire = coding.encode(&ts);
        assert_eq!(wire, RespValue::Int(1_700_000_000_123));
        assert_eq!(coding.decode(&wire, &Path::root()).unwrap(), ts);
    }

    #[test]
    fn test_date_iso8601_round_trip() {
        let ts = Timestamp::from_unix_millis(1_700_000_000_123).unwrap();
        let coding = DateCoding::Iso8601;
        let wire = coding.encode(&ts);
        assert_eq!(wire, RespValue::bulk(ts.to_rfc3339().into_bytes()));
        assert_eq!(coding.decode(&wire, &Path::root()).unwrap(), ts);
    }

    #[test]
    fn test_date_accepts_numeric_text() {
        let coding = DateCoding::UnixSeconds;
        let decoded = coding
            .decode(&RespValue::bulk(*b"1700000000"), &Path::root())
            .unwrap();
        assert_eq!(decoded.unix_seconds(), 1_700_000_000);
    }

    #[test]
    fn test_date_bad_literal_is_corrupted() {
        let err = DateCoding::Iso8601
            .decode(&RespValue::bulk(*b"yesterday"), &Path::root())
            .unwrap_err();
        assert!(matches!(err, CodecError::DataCorrupted { .. }));
    }

    // === Field naming ===

    #[test]
    fn test_camel_case_is_invertible() {
        let naming = FieldNaming::CamelCase;
        assert_eq!(naming.to_wire("user_id"), "userId");
        assert_eq!(naming.from_wire("userId"), "user_id");
        assert_eq!(naming.to_wire("a"), "a");
        assert_eq!(naming.from_wire("a"), "a");
    }

    #[test]
    fn test_pascal_case_is_invertible() {
        let naming = FieldNaming::PascalCase;
        assert_eq!(naming.to_wire("user_id"), "UserId");
        assert_eq!(naming.from_wire("UserId"), "user_id");
    }

    #[test]
    fn test_screaming_and_kebab() {
        assert_eq!(FieldNaming::ScreamingSnakeCase.to_wire("user_id"), "USER_ID");
        assert_eq!(FieldNaming::ScreamingSnakeCase.from_wire("USER_ID"), "user_id");
        assert_eq!(FieldNaming::KebabCase.to_wire("user_id"), "user-id");
        assert_eq!(FieldNaming::KebabCase.from_wire("user-id"), "user_id");
    }

    #[test]
    fn test_preserve_is_identity() {
        assert_eq!(FieldNaming::Preserve.to_wire("anything_At_all"), "anything_At_all");
        assert_eq!(FieldNaming::Preserve.from_wire("anything_At_all"), "anything_At_all");
    }

    // === Config assembly ===

    #[test]
    fn test_builder_style_updates() {
        let config = CodecConfig::default()
            .with_booleans(BoolCoding::Int)
            .with_field_names(FieldNaming::CamelCase)
            .with_null_fields(NullFields::Emit);
        assert!(matches!(config.booleans, BoolCoding::Int));
        assert_eq!(config.field_names, FieldNaming::CamelCase);
        assert_eq!(config.null_fields, NullFields::Emit);
    }

    #[test]
    fn test_config_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CodecConfig>();
    }
}
