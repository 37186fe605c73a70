//! Decoder engine, single-value entry point
//!
//! Walks a wire value against the shape the target type requests. Primitive
//! targets convert directly; sequence targets require a wire `Array` and
//! decode positionally; keyed targets are only reachable from a single wire
//! value as blob bytes (the symmetric case to the encoder's nested-shape
//! routing). Server `Error` values never silently satisfy a target.

use crate::config::{decode_integer, CodecConfig, NestedCoding};
use crate::tree_de::TreeDeserializer;
use redbind_core::{
    CodecError, Path, RespValue, Result, RESP_VALUE_TOKEN, TIMESTAMP_TOKEN,
};
use serde::de::value::{SeqDeserializer, StrDeserializer};
use serde::de::{
    DeserializeSeed, EnumAccess, IntoDeserializer, SeqAccess, VariantAccess, Visitor,
};
use serde::forward_to_deserialize_any;
use serde::Deserializer;

pub(crate) struct ValueDeserializer<'de, 'c> {
    value: &'de RespValue,
    config: &'c CodecConfig,
    path: Path,
}

impl<'de, 'c> ValueDeserializer<'de, 'c> {
    pub(crate) fn new(value: &'de RespValue, config: &'c CodecConfig) -> Self {
        ValueDeserializer {
            value,
            config,
            path: Path::root(),
        }
    }

    fn at(value: &'de RespValue, config: &'c CodecConfig, path: Path) -> Self {
        ValueDeserializer {
            value,
            config,
            path,
        }
    }

    /// Entry used by the fields-map decoder: one field's value, addressed
    /// by name from the root.
    pub(crate) fn at_field(value: &'de RespValue, config: &'c CodecConfig, name: &str) -> Self {
        ValueDeserializer {
            value,
            config,
            path: Path::root().child_field(name),
        }
    }

    fn mismatch(&self, expected: &'static str) -> CodecError {
        CodecError::mismatch(expected, self.value.type_name(), self.path.clone())
    }

    fn reject_server_error(&self) -> Result<()> {
        if let RespValue::Error(message) = self.value {
            return Err(CodecError::corrupted(
                format!("server error: {}", message),
                self.path.clone(),
            ));
        }
        Ok(())
    }

    fn text(&self) -> Result<&'de str> {
        match self.value {
            RespValue::Simple(s) => Ok(s),
            RespValue::Bulk(b) => std::str::from_utf8(b).map_err(|_| {
                CodecError::corrupted("byte string is not valid UTF-8", self.path.clone())
            }),
            _ => Err(self.mismatch("Bulk")),
        }
    }

    fn parse_f64(&self) -> Result<f64> {
        match self.value {
            RespValue::Int(i) => Ok(*i as f64),
            RespValue::Simple(_) | RespValue::Bulk(_) => {
                let text = self.text()?;
                text.parse::<f64>().map_err(|_| {
                    CodecError::corrupted(
                        format!("invalid float literal: `{}`", text),
                        self.path.clone(),
                    )
                })
            }
            _ => Err(self.mismatch("Float")),
        }
    }
}

impl<'de, 'c> Deserializer<'de> for ValueDeserializer<'de, 'c> {
    type Error = CodecError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.value {
            RespValue::Null => visitor.visit_unit(),
            RespValue::Simple(s) => visitor.visit_borrowed_str(s),
            RespValue::Int(i) => visitor.visit_i64(*i),
            RespValue::Bulk(b) => match std::str::from_utf8(b) {
                Ok(text) => visitor.visit_borrowed_str(text),
                Err(_) => visitor.visit_borrowed_bytes(b),
            },
            RespValue::Array(_) => self.deserialize_seq(visitor),
            RespValue::Error(message) => Err(CodecError::corrupted(
                format!("server error: {}", message),
                self.path.clone(),
            )),
        }
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.reject_server_error()?;
        visitor.visit_bool(self.config.booleans.decode(self.value, &self.path)?)
    }

    fn deserialize_i8<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_i64(visitor)
    }

    fn deserialize_i16<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_i64(visitor)
    }

    fn deserialize_i32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_i64(visitor)
    }

    fn deserialize_i64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.reject_server_error()?;
        visitor.visit_i64(decode_integer(self.value, &self.path)?)
    }

    fn deserialize_i128<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.reject_server_error()?;
        visitor.visit_i128(i128::from(decode_integer(self.value, &self.path)?))
    }

    fn deserialize_u8<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_i64(visitor)
    }

    fn deserialize_u16<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_i64(visitor)
    }

    fn deserialize_u32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_i64(visitor)
    }

    fn deserialize_u64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.reject_server_error()?;
        let i = decode_integer(self.value, &self.path)?;
        let unsigned = u64::try_from(i).map_err(|_| {
            CodecError::corrupted(
                format!("expected an unsigned integer, found {}", i),
                self.path.clone(),
            )
        })?;
        visitor.visit_u64(unsigned)
    }

    fn deserialize_u128<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_u64(visitor)
    }

    fn deserialize_f32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_f64(visitor)
    }

    fn deserialize_f64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.reject_server_error()?;
        visitor.visit_f64(self.parse_f64()?)
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.reject_server_error()?;
        let text = self.text()?;
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => visitor.visit_char(c),
            _ => Err(CodecError::corrupted(
                format!("expected a single character, found `{}`", text),
                self.path.clone(),
            )),
        }
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.reject_server_error()?;
        match self.value {
            RespValue::Simple(s) => visitor.visit_borrowed_str(s),
            RespValue::Bulk(_) => visitor.visit_borrowed_str(self.text()?),
            RespValue::Int(i) => visitor.visit_string(i.to_string()),
            _ => Err(self.mismatch("Bulk")),
        }
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.reject_server_error()?;
        match self.value {
            RespValue::Bulk(b) => visitor.visit_borrowed_bytes(b),
            RespValue::Simple(s) => visitor.visit_borrowed_bytes(s.as_bytes()),
            _ => Err(self.mismatch("Bulk")),
        }
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.reject_server_error()?;
        match self.value {
            RespValue::Null => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.reject_server_error()?;
        match self.value {
            RespValue::Null => visitor.visit_unit(),
            _ => Err(self.mismatch("Null")),
        }
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        if name == TIMESTAMP_TOKEN {
            self.reject_server_error()?;
            let ts = self.config.dates.decode(self.value, &self.path)?;
            return visitor.visit_string(ts.to_rfc3339());
        }
        if name == RESP_VALUE_TOKEN {
            // Pass-through: hand the wire value over verbatim, server
            // errors included.
            return visitor.visit_enum(WireEnumAccess { value: self.value });
        }
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.reject_server_error()?;
        match self.value {
            RespValue::Array(items) => visitor.visit_seq(WireSeqAccess {
                items: items.iter(),
                config: self.config,
                path: self.path,
                index: 0,
            }),
            _ => Err(self.mismatch("Array")),
        }
    }

    fn deserialize_tuple<V: Visitor<'de>>(self, len: usize, visitor: V) -> Result<V::Value> {
        self.reject_server_error()?;
        match self.value {
            RespValue::Array(items) if items.len() < len => Err(CodecError::Exhausted {
                path: self.path.clone(),
            }),
            RespValue::Array(_) => self.deserialize_seq(visitor),
            _ => Err(self.mismatch("Array")),
        }
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        len: usize,
        visitor: V,
    ) -> Result<V::Value> {
        self.deserialize_tuple(len, visitor)
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.blob_structural(visitor, BlobHint::Map)
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        self.blob_structural(visitor, BlobHint::Struct { name, fields })
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        self.reject_server_error()?;
        let text = self.text()?;
        visitor.visit_enum(text.into_deserializer())
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_str(visitor)
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_unit()
    }
}

/// Which structural hint asked for the blob route.
enum BlobHint {
    Map,
    Struct {
        name: &'static str,
        fields: &'static [&'static str],
    },
}

impl<'de, 'c> ValueDeserializer<'de, 'c> {
    /// A keyed target decoding from a single wire value: the value must be
    /// a self-contained blob payload, which is decoded and then drives the
    /// caller structurally.
    fn blob_structural<V: Visitor<'de>>(self, visitor: V, hint: BlobHint) -> Result<V::Value> {
        self.reject_server_error()?;
        let bytes = self.value.as_bytes().ok_or_else(|| self.mismatch("Bulk"))?;
        match &self.config.nested {
            NestedCoding::Blob(codec) => {
                let tree = codec.decode(bytes, &self.path)?;
                let inner = TreeDeserializer::new(tree, self.config, self.path);
                match hint {
                    BlobHint::Map => inner.deserialize_map(visitor),
                    BlobHint::Struct { name, fields } => {
                        inner.deserialize_struct(name, fields, visitor)
                    }
                }
            }
            NestedCoding::Reject => Err(CodecError::UnsupportedShape { path: self.path }),
        }
    }
}

struct WireSeqAccess<'de, 'c> {
    items: std::slice::Iter<'de, RespValue>,
    config: &'c CodecConfig,
    path: Path,
    index: usize,
}

impl<'de, 'c> SeqAccess<'de> for WireSeqAccess<'de, 'c> {
    type Error = CodecError;

    fn next_element_seed<T: DeserializeSeed<'de>>(&mut self, seed: T) -> Result<Option<T::Value>> {
        match self.items.next() {
            None => Ok(None),
            Some(value) => {
                let child_path = self.path.child_index(self.index);
                self.index += 1;
                seed.deserialize(ValueDeserializer::at(value, self.config, child_path))
                    .map(Some)
            }
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.items.len())
    }
}

// === Wire pass-through plumbing ===

/// Feeds a borrowed wire value to `RespValue`'s visitor as the in-band
/// tagged enum.
struct WireEnumAccess<'de> {
    value: &'de RespValue,
}

impl<'de> EnumAccess<'de> for WireEnumAccess<'de> {
    type Error = CodecError;
    type Variant = WireVariantAccess<'de>;

    fn variant_seed<V: DeserializeSeed<'de>>(self, seed: V) -> Result<(V::Value, Self::Variant)> {
        let tag: StrDeserializer<'de, CodecError> = self.value.type_name().into_deserializer();
        let chosen = seed.deserialize(tag)?;
        Ok((chosen, WireVariantAccess { value: self.value }))
    }
}

struct WireVariantAccess<'de> {
    value: &'de RespValue,
}

impl<'de> VariantAccess<'de> for WireVariantAccess<'de> {
    type Error = CodecError;

    fn unit_variant(self) -> Result<()> {
        Ok(())
    }

    fn newtype_variant_seed<T: DeserializeSeed<'de>>(self, seed: T) -> Result<T::Value> {
        match self.value {
            RespValue::Simple(s) | RespValue::Error(s) => {
                let text: StrDeserializer<'de, CodecError> = s.as_str().into_deserializer();
                seed.deserialize(text)
            }
            RespValue::Int(i) => seed.deserialize((*i).into_deserializer()),
            RespValue::Bulk(b) => seed.deserialize(SeqDeserializer::new(b.iter().copied())),
            RespValue::Array(items) => seed.deserialize(SeqDeserializer::new(
                items.iter().map(|value| WirePassthrough { value }),
            )),
            RespValue::Null => Err(CodecError::Message(
                "null wire value carries no payload".to_string(),
            )),
        }
    }

    fn tuple_variant<V: Visitor<'de>>(self, _len: usize, _visitor: V) -> Result<V::Value> {
        Err(CodecError::Message(
            "wire values have no tuple variants".to_string(),
        ))
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        _fields: &'static [&'static str],
        _visitor: V,
    ) -> Result<V::Value> {
        Err(CodecError::Message(
            "wire values have no struct variants".to_string(),
        ))
    }
}

/// Deserializer for one array element of a pass-through wire value; only
/// the value token is meaningful.
struct WirePassthrough<'de> {
    value: &'de RespValue,
}

impl<'de> IntoDeserializer<'de, CodecError> for WirePassthrough<'de> {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self {
        self
    }
}

impl<'de> Deserializer<'de> for WirePassthrough<'de> {
    type Error = CodecError;

    fn deserialize_any<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value> {
        Err(CodecError::Message(
            "wire pass-through expects the value token".to_string(),
        ))
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        if name == RESP_VALUE_TOKEN {
            return visitor.visit_enum(WireEnumAccess { value: self.value });
        }
        Err(CodecError::Message(
            "wire pass-through expects the value token".to_string(),
        ))
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf option unit unit_struct seq tuple tuple_struct map
        struct enum identifier ignored_any
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    fn decode<'de, T: Deserialize<'de>>(value: &'de RespValue) -> Result<T> {
        let config = CodecConfig::default();
        T::deserialize(ValueDeserializer::new(value, &config))
    }

    // === Scalars ===

    #[test]
    fn test_decode_int_from_int_and_text() {
        assert_eq!(decode::<i64>(&RespValue::Int(7)).unwrap(), 7);
        assert_eq!(decode::<i64>(&RespValue::bulk(*b"-12")).unwrap(), -12);
        assert_eq!(decode::<u16>(&RespValue::Int(9)).unwrap(), 9);
    }

    #[test]
    fn test_decode_bad_int_literal_is_corrupted() {
        let err = decode::<i64>(&RespValue::bulk(*b"seven")).unwrap_err();
        assert!(matches!(err, CodecError::DataCorrupted { .. }));
    }

    #[test]
    fn test_decode_int_from_array_is_mismatch() {
        let err = decode::<i64>(&RespValue::Array(vec![])).unwrap_err();
        assert!(matches!(
            err,
            CodecError::TypeMismatch {
                expected: "Int",
                found: "Array",
                ..
            }
        ));
    }

    #[test]
    fn test_decode_string_from_simple_bulk_and_int() {
        assert_eq!(
            decode::<String>(&RespValue::simple("OK")).unwrap(),
            "OK".to_string()
        );
        assert_eq!(
            decode::<String>(&RespValue::bulk(*b"hi")).unwrap(),
            "hi".to_string()
        );
        assert_eq!(
            decode::<String>(&RespValue::Int(42)).unwrap(),
            "42".to_string()
        );
    }

    #[test]
    fn test_decode_float_from_text_and_int() {
        assert_eq!(decode::<f64>(&RespValue::bulk(*b"1.5")).unwrap(), 1.5);
        assert_eq!(decode::<f64>(&RespValue::Int(2)).unwrap(), 2.0);
    }

    #[test]
    fn test_decode_bool_default_strategy() {
        assert!(decode::<bool>(&RespValue::bulk(*b"true")).unwrap());
        assert!(!decode::<bool>(&RespValue::bulk(*b"false")).unwrap());
        let err = decode::<bool>(&RespValue::bulk(*b"maybe")).unwrap_err();
        assert!(matches!(err, CodecError::DataCorrupted { .. }));
    }

    // === Options and nulls ===

    #[test]
    fn test_decode_option() {
        assert_eq!(decode::<Option<i64>>(&RespValue::Null).unwrap(), None);
        assert_eq!(decode::<Option<i64>>(&RespValue::Int(3)).unwrap(), Some(3));
    }

    #[test]
    fn test_decode_null_into_required_scalar_is_mismatch() {
        let err = decode::<i64>(&RespValue::Null).unwrap_err();
        assert!(matches!(
            err,
            CodecError::TypeMismatch { found: "Null", .. }
        ));
    }

    // === Sequences ===

    #[test]
    fn test_decode_vec() {
        let wire = RespValue::Array(vec![
            RespValue::Int(1),
            RespValue::Int(2),
            RespValue::Int(3),
        ]);
        assert_eq!(decode::<Vec<i64>>(&wire).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_decode_tuple_underrun_is_exhausted() {
        let wire = RespValue::Array(vec![RespValue::Int(1)]);
        let err = decode::<(i64, i64)>(&wire).unwrap_err();
        assert!(matches!(err, CodecError::Exhausted { .. }));
    }

    #[test]
    fn test_decode_seq_element_error_carries_index_path() {
        let wire = RespValue::Array(vec![RespValue::Int(1), RespValue::bulk(*b"x")]);
        let err = decode::<Vec<i64>>(&wire).unwrap_err();
        match err {
            CodecError::DataCorrupted { path, .. } => assert_eq!(path.to_string(), "$[1]"),
            other => panic!("expected DataCorrupted, got {:?}", other),
        }
    }

    // === Server errors ===

    #[test]
    fn test_server_error_never_satisfies_a_target() {
        let wire = RespValue::Error("ERR unknown command".into());
        let err = decode::<String>(&wire).unwrap_err();
        assert!(matches!(err, CodecError::DataCorrupted { .. }));
    }

    #[test]
    fn test_server_error_passes_through_to_resp_value_target() {
        let wire = RespValue::Error("ERR oops".into());
        let back: RespValue = decode(&wire).unwrap();
        assert_eq!(back, wire);
    }

    // === Pass-through ===

    #[test]
    fn test_wire_value_round_trips_through_passthrough() {
        let wire = RespValue::Array(vec![
            RespValue::Null,
            RespValue::Int(-3),
            RespValue::simple("OK"),
            RespValue::bulk(vec![0xff, 0x00]),
            RespValue::Array(vec![RespValue::Int(1)]),
        ]);
        let back: RespValue = decode(&wire).unwrap();
        assert_eq!(back, wire);
    }

    // === Enums ===

    #[test]
    fn test_unit_enum_decodes_from_text() {
        #[derive(Debug, PartialEq, Deserialize)]
        enum Level {
            Low,
            High,
        }
        assert_eq!(decode::<Level>(&RespValue::bulk(*b"High")).unwrap(), Level::High);
        assert!(decode::<Level>(&RespValue::bulk(*b"Medium")).is_err());
    }

    // === Keyed targets from a single wire value ===

    #[derive(Debug, PartialEq, Deserialize)]
    struct Inner {
        x: i64,
    }

    #[test]
    fn test_struct_target_decodes_from_blob_bytes() {
        let wire = RespValue::bulk(*br#"{"x":5}"#);
        assert_eq!(decode::<Inner>(&wire).unwrap(), Inner { x: 5 });
    }

    #[test]
    fn test_struct_target_from_array_is_mismatch() {
        let wire = RespValue::Array(vec![]);
        let err = decode::<Inner>(&wire).unwrap_err();
        assert!(matches!(
            err,
            CodecError::TypeMismatch {
                expected: "Bulk",
                ..
            }
        ));
    }

    #[test]
    fn test_struct_target_with_reject_strategy_is_unsupported() {
        let config = CodecConfig::default().with_nested(NestedCoding::Reject);
        let wire = RespValue::bulk(*br#"{"x":5}"#);
        let err = Inner::deserialize(ValueDeserializer::new(&wire, &config)).unwrap_err();
        assert!(matches!(err, CodecError::UnsupportedShape { .. }));
    }

    #[test]
    fn test_malformed_blob_is_corrupted() {
        let wire = RespValue::bulk(*br#"{"x":"#);
        let err = decode::<Inner>(&wire).unwrap_err();
        assert!(matches!(err, CodecError::DataCorrupted { .. }));
    }
}
