//! Decoder engine, fields-map entry point
//!
//! Hash-oriented commands hand back a field-name → wire-value association
//! rather than one wire value. This entry point can only produce
//! keyed-rooted targets; lookups use the first occurrence of a name, a
//! missing required field is `KeyNotFound`, and a missing optional field
//! decodes to `None`.

use crate::config::CodecConfig;
use crate::de::ValueDeserializer;
use redbind_core::{CodecError, Path, RespValue, Result};
use serde::de::value::StringDeserializer;
use serde::de::{DeserializeSeed, IntoDeserializer, MapAccess, Visitor};
use serde::forward_to_deserialize_any;
use serde::Deserializer;

pub(crate) struct FieldsDeserializer<'de, 'c> {
    entries: Vec<(&'de str, &'de RespValue)>,
    config: &'c CodecConfig,
}

impl<'de, 'c> FieldsDeserializer<'de, 'c> {
    pub(crate) fn new(fields: &'de [(String, RespValue)], config: &'c CodecConfig) -> Self {
        // First occurrence wins; duplicates behind it are ignored.
        let mut entries: Vec<(&'de str, &'de RespValue)> = Vec::with_capacity(fields.len());
        for (name, value) in fields {
            if !entries.iter().any(|(seen, _)| *seen == name.as_str()) {
                entries.push((name.as_str(), value));
            }
        }
        FieldsDeserializer { entries, config }
    }

    fn unsupported() -> CodecError {
        CodecError::UnsupportedShape { path: Path::root() }
    }
}

impl<'de, 'c> Deserializer<'de> for FieldsDeserializer<'de, 'c> {
    type Error = CodecError;

    fn deserialize_any<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value> {
        Err(Self::unsupported())
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_map(FieldsMapAccess {
            entries: self.entries.into_iter(),
            config: self.config,
            transform: false,
            pending: None,
        })
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_map(FieldsMapAccess {
            entries: self.entries.into_iter(),
            config: self.config,
            transform: true,
            pending: None,
        })
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_some(self)
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple tuple_struct enum
        identifier ignored_any
    }
}

struct FieldsMapAccess<'de, 'c> {
    entries: std::vec::IntoIter<(&'de str, &'de RespValue)>,
    config: &'c CodecConfig,
    transform: bool,
    pending: Option<(&'de str, &'de RespValue)>,
}

impl<'de, 'c> MapAccess<'de> for FieldsMapAccess<'de, 'c> {
    type Error = CodecError;

    fn next_key_seed<K: DeserializeSeed<'de>>(&mut self, seed: K) -> Result<Option<K::Value>> {
        match self.entries.next() {
            None => Ok(None),
            Some((name, value)) => {
                self.pending = Some((name, value));
                // Fold the wire rendering back to the application's field
                // name before matching.
                let key = if self.transform {
                    self.config.field_names.from_wire(name)
                } else {
                    name.to_string()
                };
                let key: StringDeserializer<CodecError> = key.into_deserializer();
                seed.deserialize(key).map(Some)
            }
        }
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value> {
        let (name, value) = self
            .pending
            .take()
            .ok_or_else(|| CodecError::Message("map value requested before its key".to_string()))?;
        seed.deserialize(ValueDeserializer::at_field(value, self.config, name))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.entries.len())
    }
}
