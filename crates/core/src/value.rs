//! Wire protocol value union
//!
//! The closed value model exchanged with a key-value store client library:
//! null, simple (inline) text, error text, 64-bit integers, binary-safe byte
//! strings, and arrays of further values. The codec consumes and produces
//! these; it never frames or parses wire bytes.
//!
//! `RespValue` participates in serde through a private newtype-struct token
//! so the codec engine can recognize a pre-built wire value embedded inside
//! application data and pass it through verbatim. Under foreign serde formats
//! the token is transparent and the value appears externally tagged
//! (`{"Int": 5}`).

use serde::de::{EnumAccess, SeqAccess, VariantAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Marker name used by the serde pass-through impls.
///
/// Not part of the public contract; the codec engine matches on it to
/// short-circuit traversal.
#[doc(hidden)]
pub const RESP_VALUE_TOKEN: &str = "$redbind::resp_value";

const VARIANTS: &[&str] = &["Null", "Simple", "Error", "Int", "Bulk", "Array"];

/// A wire protocol value.
///
/// The union is recursive through [`RespValue::Array`]: every element of an
/// array is itself a complete wire value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RespValue {
    /// Absence of a value.
    Null,
    /// Simple inline text (never contains line breaks on the wire).
    Simple(String),
    /// Server-reported error text.
    Error(String),
    /// 64-bit signed integer.
    Int(i64),
    /// Binary-safe byte string.
    Bulk(Vec<u8>),
    /// Ordered sequence of complete wire values.
    Array(Vec<RespValue>),
}

impl RespValue {
    /// Returns the variant name, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            RespValue::Null => "Null",
            RespValue::Simple(_) => "Simple",
            RespValue::Error(_) => "Error",
            RespValue::Int(_) => "Int",
            RespValue::Bulk(_) => "Bulk",
            RespValue::Array(_) => "Array",
        }
    }

    /// Build a bulk (byte string) value.
    pub fn bulk(bytes: impl Into<Vec<u8>>) -> Self {
        RespValue::Bulk(bytes.into())
    }

    /// Build a simple text value.
    pub fn simple(text: impl Into<String>) -> Self {
        RespValue::Simple(text.into())
    }

    /// Check whether this value is `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, RespValue::Null)
    }

    /// Try to view this value as an integer.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            RespValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to view this value as text. `Simple` text is returned directly;
    /// `Bulk` qualifies when its bytes are valid UTF-8.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RespValue::Simple(s) => Some(s),
            RespValue::Bulk(b) => std::str::from_utf8(b).ok(),
            _ => None,
        }
    }

    /// Try to view this value as raw bytes (`Bulk` or `Simple`).
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            RespValue::Bulk(b) => Some(b),
            RespValue::Simple(s) => Some(s.as_bytes()),
            _ => None,
        }
    }

    /// Try to view this value as an array slice.
    pub fn as_array(&self) -> Option<&[RespValue]> {
        match self {
            RespValue::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Split a server error off as `Err`, passing every other value through.
    pub fn into_result(self) -> Result<RespValue, String> {
        match self {
            RespValue::Error(message) => Err(message),
            other => Ok(other),
        }
    }
}

impl From<i64> for RespValue {
    fn from(i: i64) -> Self {
        RespValue::Int(i)
    }
}

impl From<String> for RespValue {
    fn from(s: String) -> Self {
        RespValue::Bulk(s.into_bytes())
    }
}

impl From<&str> for RespValue {
    fn from(s: &str) -> Self {
        RespValue::Bulk(s.as_bytes().to_vec())
    }
}

impl From<Vec<u8>> for RespValue {
    fn from(bytes: Vec<u8>) -> Self {
        RespValue::Bulk(bytes)
    }
}

impl From<Vec<RespValue>> for RespValue {
    fn from(items: Vec<RespValue>) -> Self {
        RespValue::Array(items)
    }
}

// === serde pass-through ===

impl Serialize for RespValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_newtype_struct(RESP_VALUE_TOKEN, &Tagged(self))
    }
}

/// Externally-tagged body behind the token.
struct Tagged<'a>(&'a RespValue);

impl Serialize for Tagged<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            RespValue::Null => serializer.serialize_unit_variant("RespValue", 0, "Null"),
            RespValue::Simple(s) => serializer.serialize_newtype_variant("RespValue", 1, "Simple", s),
            RespValue::Error(e) => serializer.serialize_newtype_variant("RespValue", 2, "Error", e),
            RespValue::Int(i) => serializer.serialize_newtype_variant("RespValue", 3, "Int", i),
            RespValue::Bulk(b) => {
                serializer.serialize_newtype_variant("RespValue", 4, "Bulk", &RawBytes(b))
            }
            RespValue::Array(items) => {
                serializer.serialize_newtype_variant("RespValue", 5, "Array", items)
            }
        }
    }
}

/// Forces `serialize_bytes` so byte payloads stay distinguishable from
/// integer sequences during capture.
struct RawBytes<'a>(&'a [u8]);

impl Serialize for RawBytes<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(self.0)
    }
}

impl<'de> Deserialize<'de> for RespValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_newtype_struct(RESP_VALUE_TOKEN, ValueVisitor)
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = RespValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a wire protocol value")
    }

    // The codec engine intercepts the token and hands the value over as an
    // in-band enum; foreign formats forward here instead.
    fn visit_newtype_struct<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_enum("RespValue", VARIANTS, ValueVisitor)
    }

    fn visit_enum<A: EnumAccess<'de>>(self, access: A) -> Result<Self::Value, A::Error> {
        let (tag, variant) = access.variant::<String>()?;
        match tag.as_str() {
            "Null" => {
                variant.unit_variant()?;
                Ok(RespValue::Null)
            }
            "Simple" => Ok(RespValue::Simple(variant.newtype_variant()?)),
            "Error" => Ok(RespValue::Error(variant.newtype_variant()?)),
            "Int" => Ok(RespValue::Int(variant.newtype_variant()?)),
            "Bulk" => Ok(RespValue::Bulk(variant.newtype_variant::<BulkBuf>()?.0)),
            "Array" => Ok(RespValue::Array(variant.newtype_variant()?)),
            other => Err(serde::de::Error::unknown_variant(other, VARIANTS)),
        }
    }

    // Unit-variant tags arrive as plain strings in some formats.
    fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
        match v {
            "Null" => Ok(RespValue::Null),
            other => Err(E::unknown_variant(other, VARIANTS)),
        }
    }
}

/// Byte buffer that also accepts sequences of integers, which is how
/// byte strings appear under formats without a native bytes type.
struct BulkBuf(Vec<u8>);

impl<'de> Deserialize<'de> for BulkBuf {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_byte_buf(BulkBufVisitor)
    }
}

struct BulkBufVisitor;

impl<'de> Visitor<'de> for BulkBufVisitor {
    type Value = BulkBuf;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a byte string")
    }

    fn visit_bytes<E: serde::de::Error>(self, v: &[u8]) -> Result<Self::Value, E> {
        Ok(BulkBuf(v.to_vec()))
    }

    fn visit_byte_buf<E: serde::de::Error>(self, v: Vec<u8>) -> Result<Self::Value, E> {
        Ok(BulkBuf(v))
    }

    fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(BulkBuf(v.as_bytes().to_vec()))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut buf = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(byte) = seq.next_element::<u8>()? {
            buf.push(byte);
        }
        Ok(BulkBuf(buf))
    }
}
