//! Encoder engine
//!
//! Walks an arbitrary `Serialize` value and builds the intermediate
//! [`Tree`]. Wire pass-throughs and dates terminate recursion directly;
//! for every container child the engine first probes the child's shape and,
//! when that shape has no structural representation under the active
//! projection, hands the child whole to the nested/blob strategy instead of
//! recursing.
//!
//! Each container builder owns its children and yields the finished node
//! from `end()`, so no tree node is ever aliased while being filled.

use crate::config::{CodecConfig, NestedCoding, NullFields};
use crate::probe::{probe_value, Shape};
use crate::project::Projection;
use crate::tree::Tree;
use redbind_core::{
    CodecError, Path, RespValue, Result, Timestamp, RESP_VALUE_TOKEN, TIMESTAMP_TOKEN,
};
use serde::ser::{
    Impossible, Serialize, SerializeMap, SerializeSeq, SerializeStruct, SerializeStructVariant,
    SerializeTuple, SerializeTupleStruct, SerializeTupleVariant, Serializer,
};

/// Position-independent traversal mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Value,
    Fields,
    Args,
    /// Inside a blob sub-encode; every shape is structural there.
    Blob,
}

impl From<Projection> for Mode {
    fn from(projection: Projection) -> Self {
        match projection {
            Projection::Value => Mode::Value,
            Projection::Fields => Mode::Fields,
            Projection::Args => Mode::Args,
        }
    }
}

/// Build the intermediate tree for `value` under the caller's intended
/// projection.
pub(crate) fn encode_tree<T: Serialize + ?Sized>(
    value: &T,
    config: &CodecConfig,
    projection: Projection,
) -> Result<Tree> {
    value.serialize(TreeSerializer {
        config,
        mode: projection.into(),
        path: Path::root(),
    })
}

/// Whether a child of this shape must be routed to the blob strategy at the
/// given position. Keyed shapes have no wire form anywhere below the root;
/// arrays nested in arrays have none under the fields projection.
fn blob_required(mode: Mode, in_array: bool, shape: Shape) -> bool {
    match shape {
        Shape::Keyed => mode != Mode::Blob,
        Shape::Unkeyed => mode == Mode::Fields && in_array,
        Shape::Single | Shape::Unknown => false,
    }
}

/// Encode one container child: probe first, then either recurse
/// structurally or hand the child whole to the nested strategy.
fn encode_child<T: Serialize + ?Sized>(
    value: &T,
    config: &CodecConfig,
    mode: Mode,
    in_array: bool,
    path: Path,
) -> Result<Tree> {
    let shape = probe_value(value);
    if blob_required(mode, in_array, shape) {
        return encode_opaque(value, config, path);
    }
    value.serialize(TreeSerializer { config, mode, path })
}

fn encode_opaque<T: Serialize + ?Sized>(
    value: &T,
    config: &CodecConfig,
    path: Path,
) -> Result<Tree> {
    match &config.nested {
        NestedCoding::Blob(codec) => {
            let subtree = value.serialize(TreeSerializer {
                config,
                mode: Mode::Blob,
                path: path.clone(),
            })?;
            let bytes = codec.encode(&subtree, &path)?;
            Ok(Tree::Single(RespValue::Bulk(bytes)))
        }
        NestedCoding::Reject => Err(CodecError::UnsupportedShape { path }),
    }
}

fn format_f64(f: f64) -> String {
    if f.is_nan() {
        "nan".to_string()
    } else if f == f64::INFINITY {
        "inf".to_string()
    } else if f == f64::NEG_INFINITY {
        "-inf".to_string()
    } else {
        // Keep a decimal point so the literal reads back as a float.
        let s = f.to_string();
        if s.contains('.') || s.contains('e') || s.contains('E') {
            s
        } else {
            format!("{}.0", s)
        }
    }
}

fn format_f32(f: f32) -> String {
    if f.is_nan() {
        "nan".to_string()
    } else if f == f32::INFINITY {
        "inf".to_string()
    } else if f == f32::NEG_INFINITY {
        "-inf".to_string()
    } else {
        let s = f.to_string();
        if s.contains('.') || s.contains('e') || s.contains('E') {
            s
        } else {
            format!("{}.0", s)
        }
    }
}

struct TreeSerializer<'c> {
    config: &'c CodecConfig,
    mode: Mode,
    path: Path,
}

impl<'c> TreeSerializer<'c> {
    fn single(value: RespValue) -> Result<Tree> {
        Ok(Tree::Single(value))
    }

    fn out_of_range(&self, literal: impl std::fmt::Display) -> CodecError {
        CodecError::corrupted(
            format!("integer {} does not fit the wire integer", literal),
            self.path.clone(),
        )
    }
}

impl<'c> Serializer for TreeSerializer<'c> {
    type Ok = Tree;
    type Error = CodecError;
    type SerializeSeq = SeqBuilder<'c>;
    type SerializeTuple = SeqBuilder<'c>;
    type SerializeTupleStruct = SeqBuilder<'c>;
    type SerializeTupleVariant = SeqBuilder<'c>;
    type SerializeMap = MapBuilder<'c>;
    type SerializeStruct = MapBuilder<'c>;
    type SerializeStructVariant = MapBuilder<'c>;

    fn serialize_bool(self, v: bool) -> Result<Tree> {
        Self::single(self.config.booleans.encode(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Tree> {
        Self::single(RespValue::Int(i64::from(v)))
    }

    fn serialize_i16(self, v: i16) -> Result<Tree> {
        Self::single(RespValue::Int(i64::from(v)))
    }

    fn serialize_i32(self, v: i32) -> Result<Tree> {
        Self::single(RespValue::Int(i64::from(v)))
    }

    fn serialize_i64(self, v: i64) -> Result<Tree> {
        Self::single(RespValue::Int(v))
    }

    fn serialize_i128(self, v: i128) -> Result<Tree> {
        let narrowed = i64::try_from(v).map_err(|_| self.out_of_range(v))?;
        Self::single(RespValue::Int(narrowed))
    }

    fn serialize_u8(self, v: u8) -> Result<Tree> {
        Self::single(RespValue::Int(i64::from(v)))
    }

    fn serialize_u16(self, v: u16) -> Result<Tree> {
        Self::single(RespValue::Int(i64::from(v)))
    }

    fn serialize_u32(self, v: u32) -> Result<Tree> {
        Self::single(RespValue::Int(i64::from(v)))
    }

    fn serialize_u64(self, v: u64) -> Result<Tree> {
        let narrowed = i64::try_from(v).map_err(|_| self.out_of_range(v))?;
        Self::single(RespValue::Int(narrowed))
    }

    fn serialize_u128(self, v: u128) -> Result<Tree> {
        let narrowed = i64::try_from(v).map_err(|_| self.out_of_range(v))?;
        Self::single(RespValue::Int(narrowed))
    }

    fn serialize_f32(self, v: f32) -> Result<Tree> {
        Self::single(RespValue::Bulk(format_f32(v).into_bytes()))
    }

    fn serialize_f64(self, v: f64) -> Result<Tree> {
        Self::single(RespValue::Bulk(format_f64(v).into_bytes()))
    }

    fn serialize_char(self, v: char) -> Result<Tree> {
        Self::single(RespValue::Bulk(v.to_string().into_bytes()))
    }

    fn serialize_str(self, v: &str) -> Result<Tree> {
        Self::single(RespValue::Bulk(v.as_bytes().to_vec()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Tree> {
        Self::single(RespValue::Bulk(v.to_vec()))
    }

    fn serialize_none(self) -> Result<Tree> {
        Self::single(RespValue::Null)
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<Tree> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Tree> {
        Self::single(RespValue::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Tree> {
        Self::single(RespValue::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
    ) -> Result<Tree> {
        Self::single(RespValue::Bulk(variant.as_bytes().to_vec()))
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        name: &'static str,
        value: &T,
    ) -> Result<Tree> {
        if name == RESP_VALUE_TOKEN {
            // Pre-built wire value: pass through verbatim.
            let wire = value.serialize(WireCapture {
                path: self.path.clone(),
            })?;
            return Self::single(wire);
        }
        if name == TIMESTAMP_TOKEN {
            let captured = value.serialize(ScalarCapture)?;
            let text = match captured {
                Captured::Text(text) => text,
                _ => {
                    return Err(CodecError::Message(
                        "timestamp emitted a non-text payload".to_string(),
                    ))
                }
            };
            let ts = Timestamp::parse_rfc3339(&text).ok_or_else(|| {
                CodecError::corrupted(
                    format!("invalid RFC 3339 timestamp: `{}`", text),
                    self.path.clone(),
                )
            })?;
            return Self::single(self.config.dates.encode(&ts));
        }
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        value: &T,
    ) -> Result<Tree> {
        value.serialize(self)
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq> {
        Ok(SeqBuilder {
            config: self.config,
            mode: self.mode,
            path: self.path,
            elements: Vec::with_capacity(len.unwrap_or(0)),
            index: 0,
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        self.serialize_seq(Some(len))
    }

    fn serialize_map(self, len: Option<usize>) -> Result<Self::SerializeMap> {
        Ok(MapBuilder {
            config: self.config,
            mode: self.mode,
            path: self.path,
            fields: Vec::with_capacity(len.unwrap_or(0)),
            pending_key: None,
            is_struct: false,
        })
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<Self::SerializeStruct> {
        Ok(MapBuilder {
            config: self.config,
            mode: self.mode,
            path: self.path,
            fields: Vec::with_capacity(len),
            pending_key: None,
            is_struct: true,
        })
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Ok(MapBuilder {
            config: self.config,
            mode: self.mode,
            path: self.path,
            fields: Vec::with_capacity(len),
            pending_key: None,
            is_struct: true,
        })
    }
}

// === Container builders ===

struct SeqBuilder<'c> {
    config: &'c CodecConfig,
    mode: Mode,
    path: Path,
    elements: Vec<Tree>,
    index: usize,
}

impl SeqBuilder<'_> {
    fn push<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        let child_path = self.path.child_index(self.index);
        let tree = encode_child(value, self.config, self.mode, true, child_path)?;
        self.elements.push(tree);
        self.index += 1;
        Ok(())
    }
}

impl SerializeSeq for SeqBuilder<'_> {
    type Ok = Tree;
    type Error = CodecError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<Tree> {
        Ok(Tree::Unkeyed(self.elements))
    }
}

impl SerializeTuple for SeqBuilder<'_> {
    type Ok = Tree;
    type Error = CodecError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<Tree> {
        Ok(Tree::Unkeyed(self.elements))
    }
}

impl SerializeTupleStruct for SeqBuilder<'_> {
    type Ok = Tree;
    type Error = CodecError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<Tree> {
        Ok(Tree::Unkeyed(self.elements))
    }
}

impl SerializeTupleVariant for SeqBuilder<'_> {
    type Ok = Tree;
    type Error = CodecError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.push(value)
    }

    fn end(self) -> Result<Tree> {
        Ok(Tree::Unkeyed(self.elements))
    }
}

struct MapBuilder<'c> {
    config: &'c CodecConfig,
    mode: Mode,
    path: Path,
    fields: Vec<(String, Tree)>,
    pending_key: Option<String>,
    is_struct: bool,
}

impl MapBuilder<'_> {
    fn push_field<T: Serialize + ?Sized>(&mut self, name: String, value: &T) -> Result<()> {
        // Declared struct field names go through the naming transform; map
        // keys are data and pass through untouched.
        let wire_name = if self.is_struct {
            self.config.field_names.to_wire(&name)
        } else {
            name
        };
        let child_path = self.path.child_field(wire_name.clone());
        let tree = encode_child(value, self.config, self.mode, false, child_path)?;
        if tree.is_null_leaf() && self.config.null_fields == NullFields::Omit {
            return Ok(());
        }
        self.fields.push((wire_name, tree));
        Ok(())
    }
}

impl SerializeMap for MapBuilder<'_> {
    type Ok = Tree;
    type Error = CodecError;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<()> {
        let name = match key.serialize(ScalarCapture)? {
            Captured::Text(text) => text,
            Captured::Int(i) => i.to_string(),
            Captured::Bytes(bytes) => String::from_utf8(bytes).map_err(|_| {
                CodecError::corrupted("map key is not valid UTF-8", self.path.clone())
            })?,
        };
        self.pending_key = Some(name);
        Ok(())
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        let name = self
            .pending_key
            .take()
            .ok_or_else(|| CodecError::Message("map value emitted before its key".to_string()))?;
        self.push_field(name, value)
    }

    fn end(self) -> Result<Tree> {
        Ok(Tree::Keyed(self.fields))
    }
}

impl SerializeStruct for MapBuilder<'_> {
    type Ok = Tree;
    type Error = CodecError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<()> {
        self.push_field(key.to_string(), value)
    }

    fn end(self) -> Result<Tree> {
        Ok(Tree::Keyed(self.fields))
    }
}

impl SerializeStructVariant for MapBuilder<'_> {
    type Ok = Tree;
    type Error = CodecError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<()> {
        self.push_field(key.to_string(), value)
    }

    fn end(self) -> Result<Tree> {
        Ok(Tree::Keyed(self.fields))
    }
}

// === Capture serializers ===

/// Scalar captured out of a token payload or a map key.
enum Captured {
    Text(String),
    Bytes(Vec<u8>),
    Int(i64),
}

/// Accepts exactly one scalar emission.
struct ScalarCapture;

fn non_scalar(what: &str) -> CodecError {
    CodecError::Message(format!("expected a scalar emission, found {}", what))
}

impl Serializer for ScalarCapture {
    type Ok = Captured;
    type Error = CodecError;
    type SerializeSeq = Impossible<Captured, CodecError>;
    type SerializeTuple = Impossible<Captured, CodecError>;
    type SerializeTupleStruct = Impossible<Captured, CodecError>;
    type SerializeTupleVariant = Impossible<Captured, CodecError>;
    type SerializeMap = Impossible<Captured, CodecError>;
    type SerializeStruct = Impossible<Captured, CodecError>;
    type SerializeStructVariant = Impossible<Captured, CodecError>;

    fn serialize_str(self, v: &str) -> Result<Captured> {
        Ok(Captured::Text(v.to_string()))
    }

    fn serialize_char(self, v: char) -> Result<Captured> {
        Ok(Captured::Text(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Captured> {
        Ok(Captured::Bytes(v.to_vec()))
    }

    fn serialize_i8(self, v: i8) -> Result<Captured> {
        Ok(Captured::Int(i64::from(v)))
    }

    fn serialize_i16(self, v: i16) -> Result<Captured> {
        Ok(Captured::Int(i64::from(v)))
    }

    fn serialize_i32(self, v: i32) -> Result<Captured> {
        Ok(Captured::Int(i64::from(v)))
    }

    fn serialize_i64(self, v: i64) -> Result<Captured> {
        Ok(Captured::Int(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Captured> {
        Ok(Captured::Int(i64::from(v)))
    }

    fn serialize_u16(self, v: u16) -> Result<Captured> {
        Ok(Captured::Int(i64::from(v)))
    }

    fn serialize_u32(self, v: u32) -> Result<Captured> {
        Ok(Captured::Int(i64::from(v)))
    }

    fn serialize_u64(self, v: u64) -> Result<Captured> {
        i64::try_from(v)
            .map(Captured::Int)
            .map_err(|_| non_scalar("an out-of-range integer"))
    }

    fn serialize_bool(self, _: bool) -> Result<Captured> {
        Err(non_scalar("a boolean"))
    }

    fn serialize_f32(self, _: f32) -> Result<Captured> {
        Err(non_scalar("a float"))
    }

    fn serialize_f64(self, _: f64) -> Result<Captured> {
        Err(non_scalar("a float"))
    }

    fn serialize_none(self) -> Result<Captured> {
        Err(non_scalar("an absent value"))
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<Captured> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Captured> {
        Err(non_scalar("a unit"))
    }

    fn serialize_unit_struct(self, _: &'static str) -> Result<Captured> {
        Err(non_scalar("a unit struct"))
    }

    fn serialize_unit_variant(
        self,
        _: &'static str,
        _: u32,
        variant: &'static str,
    ) -> Result<Captured> {
        Ok(Captured::Text(variant.to_string()))
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _: &'static str,
        value: &T,
    ) -> Result<Captured> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        value: &T,
    ) -> Result<Captured> {
        value.serialize(self)
    }

    fn serialize_seq(self, _: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(non_scalar("a sequence"))
    }

    fn serialize_tuple(self, _: usize) -> Result<Self::SerializeTuple> {
        Err(non_scalar("a tuple"))
    }

    fn serialize_tuple_struct(self, _: &'static str, _: usize) -> Result<Self::SerializeTupleStruct> {
        Err(non_scalar("a tuple struct"))
    }

    fn serialize_tuple_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(non_scalar("a tuple variant"))
    }

    fn serialize_map(self, _: Option<usize>) -> Result<Self::SerializeMap> {
        Err(non_scalar("a map"))
    }

    fn serialize_struct(self, _: &'static str, _: usize) -> Result<Self::SerializeStruct> {
        Err(non_scalar("a struct"))
    }

    fn serialize_struct_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(non_scalar("a struct variant"))
    }
}

/// Rebuilds a [`RespValue`] from the tagged emission its `Serialize` impl
/// produces behind the pass-through token.
struct WireCapture {
    path: Path,
}

fn unexpected_wire(path: &Path) -> CodecError {
    CodecError::corrupted("unexpected wire value emission", path.clone())
}

impl Serializer for WireCapture {
    type Ok = RespValue;
    type Error = CodecError;
    type SerializeSeq = WireSeqCapture;
    type SerializeTuple = Impossible<RespValue, CodecError>;
    type SerializeTupleStruct = Impossible<RespValue, CodecError>;
    type SerializeTupleVariant = Impossible<RespValue, CodecError>;
    type SerializeMap = Impossible<RespValue, CodecError>;
    type SerializeStruct = Impossible<RespValue, CodecError>;
    type SerializeStructVariant = Impossible<RespValue, CodecError>;

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        name: &'static str,
        value: &T,
    ) -> Result<RespValue> {
        if name == RESP_VALUE_TOKEN {
            return value.serialize(self);
        }
        Err(unexpected_wire(&self.path))
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<RespValue> {
        match variant {
            "Simple" => match value.serialize(ScalarCapture)? {
                Captured::Text(text) => Ok(RespValue::Simple(text)),
                _ => Err(unexpected_wire(&self.path)),
            },
            "Error" => match value.serialize(ScalarCapture)? {
                Captured::Text(text) => Ok(RespValue::Error(text)),
                _ => Err(unexpected_wire(&self.path)),
            },
            "Int" => match value.serialize(ScalarCapture)? {
                Captured::Int(i) => Ok(RespValue::Int(i)),
                _ => Err(unexpected_wire(&self.path)),
            },
            "Bulk" => match value.serialize(ScalarCapture)? {
                Captured::Bytes(bytes) => Ok(RespValue::Bulk(bytes)),
                Captured::Text(text) => Ok(RespValue::Bulk(text.into_bytes())),
                _ => Err(unexpected_wire(&self.path)),
            },
            "Array" => value.serialize(self),
            _ => Err(unexpected_wire(&self.path)),
        }
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
    ) -> Result<RespValue> {
        match variant {
            "Null" => Ok(RespValue::Null),
            _ => Err(unexpected_wire(&self.path)),
        }
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq> {
        Ok(WireSeqCapture {
            path: self.path,
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_bool(self, _: bool) -> Result<RespValue> {
        Err(unexpected_wire(&self.path))
    }

    fn serialize_i8(self, _: i8) -> Result<RespValue> {
        Err(unexpected_wire(&self.path))
    }

    fn serialize_i16(self, _: i16) -> Result<RespValue> {
        Err(unexpected_wire(&self.path))
    }

    fn serialize_i32(self, _: i32) -> Result<RespValue> {
        Err(unexpected_wire(&self.path))
    }

    fn serialize_i64(self, _: i64) -> Result<RespValue> {
        Err(unexpected_wire(&self.path))
    }

    fn serialize_u8(self, _: u8) -> Result<RespValue> {
        Err(unexpected_wire(&self.path))
    }

    fn serialize_u16(self, _: u16) -> Result<RespValue> {
        Err(unexpected_wire(&self.path))
    }

    fn serialize_u32(self, _: u32) -> Result<RespValue> {
        Err(unexpected_wire(&self.path))
    }

    fn serialize_u64(self, _: u64) -> Result<RespValue> {
        Err(unexpected_wire(&self.path))
    }

    fn serialize_f32(self, _: f32) -> Result<RespValue> {
        Err(unexpected_wire(&self.path))
    }

    fn serialize_f64(self, _: f64) -> Result<RespValue> {
        Err(unexpected_wire(&self.path))
    }

    fn serialize_char(self, _: char) -> Result<RespValue> {
        Err(unexpected_wire(&self.path))
    }

    fn serialize_str(self, _: &str) -> Result<RespValue> {
        Err(unexpected_wire(&self.path))
    }

    fn serialize_bytes(self, _: &[u8]) -> Result<RespValue> {
        Err(unexpected_wire(&self.path))
    }

    fn serialize_none(self) -> Result<RespValue> {
        Err(unexpected_wire(&self.path))
    }

    fn serialize_some<T: Serialize + ?Sized>(self, _: &T) -> Result<RespValue> {
        Err(unexpected_wire(&self.path))
    }

    fn serialize_unit(self) -> Result<RespValue> {
        Err(unexpected_wire(&self.path))
    }

    fn serialize_unit_struct(self, _: &'static str) -> Result<RespValue> {
        Err(unexpected_wire(&self.path))
    }

    fn serialize_tuple(self, _: usize) -> Result<Self::SerializeTuple> {
        Err(unexpected_wire(&self.path))
    }

    fn serialize_tuple_struct(self, _: &'static str, _: usize) -> Result<Self::SerializeTupleStruct> {
        Err(unexpected_wire(&self.path))
    }

    fn serialize_tuple_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(unexpected_wire(&self.path))
    }

    fn serialize_map(self, _: Option<usize>) -> Result<Self::SerializeMap> {
        Err(unexpected_wire(&self.path))
    }

    fn serialize_struct(self, _: &'static str, _: usize) -> Result<Self::SerializeStruct> {
        Err(unexpected_wire(&self.path))
    }

    fn serialize_struct_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(unexpected_wire(&self.path))
    }
}

struct WireSeqCapture {
    path: Path,
    items: Vec<RespValue>,
}

impl SerializeSeq for WireSeqCapture {
    type Ok = RespValue;
    type Error = CodecError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        let item = value.serialize(WireCapture {
            path: self.path.clone(),
        })?;
        self.items.push(item);
        Ok(())
    }

    fn end(self) -> Result<RespValue> {
        Ok(RespValue::Array(self.items))
    }
}
