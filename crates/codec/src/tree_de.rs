//! Structural deserializer over decoded blob trees
//!
//! Blob payloads decode to an owned [`Tree`] first; this deserializer then
//! drives the caller's visitor from that tree. Unlike the wire-value
//! decoder it supports keyed nodes structurally, because the blob format is
//! self-describing and carries maps natively.

use crate::config::{decode_integer, CodecConfig};
use crate::tree::Tree;
use redbind_core::{
    CodecError, Path, RespValue, Result, RESP_VALUE_TOKEN, TIMESTAMP_TOKEN,
};
use serde::de::value::{SeqDeserializer, StrDeserializer, StringDeserializer};
use serde::de::{DeserializeSeed, EnumAccess, IntoDeserializer, MapAccess, SeqAccess, VariantAccess, Visitor};
use serde::forward_to_deserialize_any;
use serde::Deserializer;

pub(crate) struct TreeDeserializer<'c> {
    tree: Tree,
    config: &'c CodecConfig,
    path: Path,
}

fn tree_kind(tree: &Tree) -> &'static str {
    match tree {
        Tree::Single(value) => value.type_name(),
        Tree::Keyed(_) => "Keyed",
        Tree::Unkeyed(_) => "Array",
    }
}

impl<'c> TreeDeserializer<'c> {
    pub(crate) fn new(tree: Tree, config: &'c CodecConfig, path: Path) -> Self {
        TreeDeserializer { tree, config, path }
    }

    fn mismatch(&self, expected: &'static str) -> CodecError {
        CodecError::mismatch(expected, tree_kind(&self.tree), self.path.clone())
    }

    /// Take the terminal wire value, or fail with a mismatch naming
    /// `expected`.
    fn leaf(self, expected: &'static str) -> Result<(RespValue, &'c CodecConfig, Path)> {
        match self.tree {
            Tree::Single(value) => Ok((value, self.config, self.path)),
            other => Err(CodecError::mismatch(
                expected,
                tree_kind(&other),
                self.path,
            )),
        }
    }
}

/// Collapse a tree back to a wire value. Only possible when no keyed node
/// remains.
fn tree_to_wire(tree: Tree, path: &Path) -> Result<RespValue> {
    match tree {
        Tree::Single(value) => Ok(value),
        Tree::Unkeyed(elements) => {
            let mut items = Vec::with_capacity(elements.len());
            for (i, element) in elements.into_iter().enumerate() {
                items.push(tree_to_wire(element, &path.child_index(i))?);
            }
            Ok(RespValue::Array(items))
        }
        Tree::Keyed(_) => Err(CodecError::UnsupportedShape { path: path.clone() }),
    }
}

impl<'de, 'c> Deserializer<'de> for TreeDeserializer<'c> {
    type Error = CodecError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match &self.tree {
            Tree::Single(RespValue::Null) => visitor.visit_unit(),
            Tree::Single(RespValue::Int(_)) => self.deserialize_i64(visitor),
            Tree::Single(RespValue::Simple(_)) | Tree::Single(RespValue::Bulk(_)) => {
                self.deserialize_string(visitor)
            }
            Tree::Single(RespValue::Error(message)) => Err(CodecError::corrupted(
                format!("server error: {}", message),
                self.path.clone(),
            )),
            Tree::Single(RespValue::Array(_)) => self.deserialize_seq(visitor),
            Tree::Unkeyed(_) => self.deserialize_seq(visitor),
            Tree::Keyed(_) => self.deserialize_map(visitor),
        }
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let (value, config, path) = self.leaf("Bool")?;
        visitor.visit_bool(config.booleans.decode(&value, &path)?)
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
        let (value, _, path) = self.leaf("Int")?;
        visitor.visit_i64(decode_integer(&value, &path)?)
    }

    fn deserialize_i128<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let (value, _, path) = self.leaf("Int")?;
        visitor.visit_i128(i128::from(decode_integer(&value, &path)?))
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
        let (value, _, path) = self.leaf("Int")?;
        let i = decode_integer(&value, &path)?;
        let unsigned = u64::try_from(i).map_err(|_| {
            CodecError::corrupted(format!("expected an unsigned integer, found {}", i), path)
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
        let (value, _, path) = self.leaf("Float")?;
        let parsed = match &value {
            RespValue::Int(i) => *i as f64,
            RespValue::Simple(_) | RespValue::Bulk(_) => {
                let text = value.as_text().ok_or_else(|| {
                    CodecError::corrupted("float literal is not valid UTF-8", path.clone())
                })?;
                text.parse::<f64>().map_err(|_| {
                    CodecError::corrupted(
                        format!("invalid float literal: `{}`", text),
                        path.clone(),
                    )
                })?
            }
            other => {
                return Err(CodecError::mismatch("Float", other.type_name(), path));
            }
        };
        visitor.visit_f64(parsed)
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let (value, _, path) = self.leaf("Bulk")?;
        let text = value
            .as_text()
            .ok_or_else(|| CodecError::mismatch("Bulk", value.type_name(), path.clone()))?;
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => visitor.visit_char(c),
            _ => Err(CodecError::corrupted(
                format!("expected a single character, found `{}`", text),
                path,
            )),
        }
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_string(visitor)
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let (value, _, path) = self.leaf("Bulk")?;
        match value {
            RespValue::Simple(s) => visitor.visit_string(s),
            RespValue::Bulk(b) => match String::from_utf8(b) {
                Ok(s) => visitor.visit_string(s),
                Err(_) => Err(CodecError::corrupted(
                    "byte string is not valid UTF-8",
                    path,
                )),
            },
            RespValue::Int(i) => visitor.visit_string(i.to_string()),
            other => Err(CodecError::mismatch("Bulk", other.type_name(), path)),
        }
    }

    fn deserialize_bytes<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_byte_buf(visitor)
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let (value, _, path) = self.leaf("Bulk")?;
        match value {
            RespValue::Bulk(b) => visitor.visit_byte_buf(b),
            RespValue::Simple(s) => visitor.visit_byte_buf(s.into_bytes()),
            other => Err(CodecError::mismatch("Bulk", other.type_name(), path)),
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        if self.tree.is_null_leaf() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        if self.tree.is_null_leaf() {
            visitor.visit_unit()
        } else {
            Err(self.mismatch("Null"))
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
            let (value, config, path) = self.leaf("Timestamp")?;
            let ts = config.dates.decode(&value, &path)?;
            return visitor.visit_string(ts.to_rfc3339());
        }
        if name == RESP_VALUE_TOKEN {
            let wire = tree_to_wire(self.tree, &self.path)?;
            return visitor.visit_enum(OwnedWireEnumAccess { value: wire });
        }
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        match self.tree {
            Tree::Unkeyed(elements) => visitor.visit_seq(TreeSeqAccess {
                elements: elements.into_iter(),
                config: self.config,
                path: self.path,
                index: 0,
            }),
            Tree::Single(RespValue::Array(items)) => {
                let trees: Vec<Tree> = items.into_iter().map(Tree::Single).collect();
                visitor.visit_seq(TreeSeqAccess {
                    elements: trees.into_iter(),
                    config: self.config,
                    path: self.path,
                    index: 0,
                })
            }
            other => Err(CodecError::mismatch(
                "Array",
                tree_kind(&other),
                self.path,
            )),
        }
    }

    fn deserialize_tuple<V: Visitor<'de>>(self, len: usize, visitor: V) -> Result<V::Value> {
        let have = match &self.tree {
            Tree::Unkeyed(elements) => elements.len(),
            Tree::Single(RespValue::Array(items)) => items.len(),
            other => {
                return Err(CodecError::mismatch("Array", tree_kind(other), self.path));
            }
        };
        if have < len {
            return Err(CodecError::Exhausted { path: self.path });
        }
        self.deserialize_seq(visitor)
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
        match self.tree {
            Tree::Keyed(fields) => visitor.visit_map(TreeMapAccess {
                fields: fields.into_iter(),
                config: self.config,
                path: self.path,
                transform: false,
                pending: None,
            }),
            other => Err(CodecError::mismatch("Keyed", tree_kind(&other), self.path)),
        }
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        match self.tree {
            Tree::Keyed(fields) => visitor.visit_map(TreeMapAccess {
                fields: fields.into_iter(),
                config: self.config,
                path: self.path,
                transform: true,
                pending: None,
            }),
            other => Err(CodecError::mismatch("Keyed", tree_kind(&other), self.path)),
        }
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value> {
        let (value, _, path) = self.leaf("Bulk")?;
        let text = value
            .as_text()
            .ok_or_else(|| CodecError::mismatch("Bulk", value.type_name(), path))?
            .to_string();
        let variant: StringDeserializer<CodecError> = text.into_deserializer();
        visitor.visit_enum(variant)
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_string(visitor)
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_unit()
    }
}

struct TreeSeqAccess<'c> {
    elements: std::vec::IntoIter<Tree>,
    config: &'c CodecConfig,
    path: Path,
    index: usize,
}

impl<'de, 'c> SeqAccess<'de> for TreeSeqAccess<'c> {
    type Error = CodecError;

    fn next_element_seed<T: DeserializeSeed<'de>>(&mut self, seed: T) -> Result<Option<T::Value>> {
        match self.elements.next() {
            None => Ok(None),
            Some(element) => {
                let child_path = self.path.child_index(self.index);
                self.index += 1;
                seed.deserialize(TreeDeserializer::new(element, self.config, child_path))
                    .map(Some)
            }
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.elements.len())
    }
}

struct TreeMapAccess<'c> {
    fields: std::vec::IntoIter<(String, Tree)>,
    config: &'c CodecConfig,
    path: Path,
    transform: bool,
    pending: Option<(String, Tree)>,
}

impl<'de, 'c> MapAccess<'de> for TreeMapAccess<'c> {
    type Error = CodecError;

    fn next_key_seed<K: DeserializeSeed<'de>>(&mut self, seed: K) -> Result<Option<K::Value>> {
        match self.fields.next() {
            None => Ok(None),
            Some((name, value)) => {
                let key = if self.transform {
                    self.config.field_names.from_wire(&name)
                } else {
                    name.clone()
                };
                self.pending = Some((name, value));
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
        let child_path = self.path.child_field(name);
        seed.deserialize(TreeDeserializer::new(value, self.config, child_path))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.fields.len())
    }
}

// === Owned wire pass-through (wire values embedded in blob payloads) ===

struct OwnedWireEnumAccess {
    value: RespValue,
}

impl<'de> EnumAccess<'de> for OwnedWireEnumAccess {
    type Error = CodecError;
    type Variant = OwnedWireVariantAccess;

    fn variant_seed<V: DeserializeSeed<'de>>(self, seed: V) -> Result<(V::Value, Self::Variant)> {
        let tag: StrDeserializer<CodecError> = self.value.type_name().into_deserializer();
        let chosen = seed.deserialize(tag)?;
        Ok((chosen, OwnedWireVariantAccess { value: self.value }))
    }
}

struct OwnedWireVariantAccess {
    value: RespValue,
}

impl<'de> VariantAccess<'de> for OwnedWireVariantAccess {
    type Error = CodecError;

    fn unit_variant(self) -> Result<()> {
        Ok(())
    }

    fn newtype_variant_seed<T: DeserializeSeed<'de>>(self, seed: T) -> Result<T::Value> {
        match self.value {
            RespValue::Simple(s) | RespValue::Error(s) => {
                let text: StringDeserializer<CodecError> = s.into_deserializer();
                seed.deserialize(text)
            }
            RespValue::Int(i) => seed.deserialize(i.into_deserializer()),
            RespValue::Bulk(b) => seed.deserialize(SeqDeserializer::new(b.into_iter())),
            RespValue::Array(items) => seed.deserialize(SeqDeserializer::new(
                items.into_iter().map(|value| OwnedWirePassthrough { value }),
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

struct OwnedWirePassthrough {
    value: RespValue,
}

impl<'de> IntoDeserializer<'de, CodecError> for OwnedWirePassthrough {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self {
        self
    }
}

impl<'de> Deserializer<'de> for OwnedWirePassthrough {
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
            return visitor.visit_enum(OwnedWireEnumAccess { value: self.value });
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
