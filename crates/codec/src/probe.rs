//! Shape probing
//!
//! For a generic structured value there is no way to learn its natural wire
//! shape other than letting it begin traversing itself. The probe runs a
//! throwaway trial traversal against a sentinel collaborator: scalar entry
//! points answer [`Shape::Single`] directly, while container entry points
//! record the observed shape and abort the trial through a typed sentinel
//! error before any real work happens. The wrapper treats the sentinel as
//! "shape determined", not as a failure.
//!
//! Probing allocates no tree, has no side effects, and is idempotent.

use redbind_core::{RESP_VALUE_TOKEN, TIMESTAMP_TOKEN};
use serde::de::Visitor;
use serde::ser::Impossible;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Classification of a value or target type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Encodes as named fields (structs, maps, struct variants).
    Keyed,
    /// Encodes as ordered elements (sequences, tuples, tuple variants).
    Unkeyed,
    /// Encodes as one terminal wire value.
    Single,
    /// The value declined to commit before first access; treated as the
    /// least-committal case and never triggers opaque re-encoding.
    Unknown,
}

/// Determine the shape a value would encode as, without encoding it.
pub fn probe_value<T: Serialize + ?Sized>(value: &T) -> Shape {
    match value.serialize(ValueProbe) {
        Ok(shape) => shape,
        Err(Abort::Found(shape)) => shape,
        Err(Abort::Message(_)) => Shape::Unknown,
    }
}

/// Determine the shape a target type expects to decode from, without
/// decoding anything.
pub fn probe_type<'de, T: Deserialize<'de>>() -> Shape {
    match T::deserialize(TypeProbe) {
        Ok(_) => Shape::Unknown,
        Err(Abort::Found(shape)) => shape,
        Err(Abort::Message(_)) => Shape::Unknown,
    }
}

/// Typed sentinel raised by the probe collaborators. `Found` is the normal
/// outcome of a trial; `Message` only appears when a foreign `Serialize`/
/// `Deserialize` impl raises its own error first.
#[derive(Debug)]
enum Abort {
    Found(Shape),
    Message(String),
}

impl fmt::Display for Abort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Abort::Found(shape) => write!(f, "shape determined: {:?}", shape),
            Abort::Message(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for Abort {}

impl serde::ser::Error for Abort {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Abort::Message(msg.to_string())
    }
}

impl serde::de::Error for Abort {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Abort::Message(msg.to_string())
    }
}

// === Encode-side sentinel ===

struct ValueProbe;

impl Serializer for ValueProbe {
    type Ok = Shape;
    type Error = Abort;
    type SerializeSeq = Impossible<Shape, Abort>;
    type SerializeTuple = Impossible<Shape, Abort>;
    type SerializeTupleStruct = Impossible<Shape, Abort>;
    type SerializeTupleVariant = Impossible<Shape, Abort>;
    type SerializeMap = Impossible<Shape, Abort>;
    type SerializeStruct = Impossible<Shape, Abort>;
    type SerializeStructVariant = Impossible<Shape, Abort>;

    fn serialize_bool(self, _: bool) -> Result<Shape, Abort> {
        Ok(Shape::Single)
    }

    fn serialize_i8(self, _: i8) -> Result<Shape, Abort> {
        Ok(Shape::Single)
    }

    fn serialize_i16(self, _: i16) -> Result<Shape, Abort> {
        Ok(Shape::Single)
    }

    fn serialize_i32(self, _: i32) -> Result<Shape, Abort> {
        Ok(Shape::Single)
    }

    fn serialize_i64(self, _: i64) -> Result<Shape, Abort> {
        Ok(Shape::Single)
    }

    fn serialize_i128(self, _: i128) -> Result<Shape, Abort> {
        Ok(Shape::Single)
    }

    fn serialize_u8(self, _: u8) -> Result<Shape, Abort> {
        Ok(Shape::Single)
    }

    fn serialize_u16(self, _: u16) -> Result<Shape, Abort> {
        Ok(Shape::Single)
    }

    fn serialize_u32(self, _: u32) -> Result<Shape, Abort> {
        Ok(Shape::Single)
    }

    fn serialize_u64(self, _: u64) -> Result<Shape, Abort> {
        Ok(Shape::Single)
    }

    fn serialize_u128(self, _: u128) -> Result<Shape, Abort> {
        Ok(Shape::Single)
    }

    fn serialize_f32(self, _: f32) -> Result<Shape, Abort> {
        Ok(Shape::Single)
    }

    fn serialize_f64(self, _: f64) -> Result<Shape, Abort> {
        Ok(Shape::Single)
    }

    fn serialize_char(self, _: char) -> Result<Shape, Abort> {
        Ok(Shape::Single)
    }

    fn serialize_str(self, _: &str) -> Result<Shape, Abort> {
        Ok(Shape::Single)
    }

    fn serialize_bytes(self, _: &[u8]) -> Result<Shape, Abort> {
        Ok(Shape::Single)
    }

    fn serialize_none(self) -> Result<Shape, Abort> {
        Ok(Shape::Single)
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<Shape, Abort> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Shape, Abort> {
        Ok(Shape::Single)
    }

    fn serialize_unit_struct(self, _: &'static str) -> Result<Shape, Abort> {
        Ok(Shape::Single)
    }

    fn serialize_unit_variant(self, _: &'static str, _: u32, _: &'static str) -> Result<Shape, Abort> {
        Ok(Shape::Single)
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        name: &'static str,
        value: &T,
    ) -> Result<Shape, Abort> {
        // Wire pass-throughs and dates are engine base cases, terminal by
        // definition.
        if name == RESP_VALUE_TOKEN || name == TIMESTAMP_TOKEN {
            return Ok(Shape::Single);
        }
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        value: &T,
    ) -> Result<Shape, Abort> {
        value.serialize(self)
    }

    fn serialize_seq(self, _: Option<usize>) -> Result<Self::SerializeSeq, Abort> {
        Err(Abort::Found(Shape::Unkeyed))
    }

    fn serialize_tuple(self, _: usize) -> Result<Self::SerializeTuple, Abort> {
        Err(Abort::Found(Shape::Unkeyed))
    }

    fn serialize_tuple_struct(self, _: &'static str, _: usize) -> Result<Self::SerializeTupleStruct, Abort> {
        Err(Abort::Found(Shape::Unkeyed))
    }

    fn serialize_tuple_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Self::SerializeTupleVariant, Abort> {
        Err(Abort::Found(Shape::Unkeyed))
    }

    fn serialize_map(self, _: Option<usize>) -> Result<Self::SerializeMap, Abort> {
        Err(Abort::Found(Shape::Keyed))
    }

    fn serialize_struct(self, _: &'static str, _: usize) -> Result<Self::SerializeStruct, Abort> {
        Err(Abort::Found(Shape::Keyed))
    }

    fn serialize_struct_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Self::SerializeStructVariant, Abort> {
        Err(Abort::Found(Shape::Keyed))
    }
}

// === Decode-side sentinel ===

struct TypeProbe;

macro_rules! probe_hint {
    ($($method:ident => $shape:expr,)*) => {
        $(
            fn $method<V: Visitor<'de>>(self, _: V) -> Result<V::Value, Abort> {
                Err(Abort::Found($shape))
            }
        )*
    };
}

impl<'de> Deserializer<'de> for TypeProbe {
    type Error = Abort;

    probe_hint! {
        deserialize_any => Shape::Unknown,
        deserialize_ignored_any => Shape::Unknown,
        deserialize_bool => Shape::Single,
        deserialize_i8 => Shape::Single,
        deserialize_i16 => Shape::Single,
        deserialize_i32 => Shape::Single,
        deserialize_i64 => Shape::Single,
        deserialize_i128 => Shape::Single,
        deserialize_u8 => Shape::Single,
        deserialize_u16 => Shape::Single,
        deserialize_u32 => Shape::Single,
        deserialize_u64 => Shape::Single,
        deserialize_u128 => Shape::Single,
        deserialize_f32 => Shape::Single,
        deserialize_f64 => Shape::Single,
        deserialize_char => Shape::Single,
        deserialize_str => Shape::Single,
        deserialize_string => Shape::Single,
        deserialize_bytes => Shape::Single,
        deserialize_byte_buf => Shape::Single,
        deserialize_unit => Shape::Single,
        deserialize_identifier => Shape::Single,
        deserialize_seq => Shape::Unkeyed,
        deserialize_map => Shape::Keyed,
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Abort> {
        // An optional takes the shape of its payload.
        visitor.visit_some(self)
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        _: &'static str,
        _: V,
    ) -> Result<V::Value, Abort> {
        Err(Abort::Found(Shape::Single))
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Abort> {
        if name == RESP_VALUE_TOKEN || name == TIMESTAMP_TOKEN {
            return Err(Abort::Found(Shape::Single));
        }
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_tuple<V: Visitor<'de>>(self, _: usize, _: V) -> Result<V::Value, Abort> {
        Err(Abort::Found(Shape::Unkeyed))
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _: &'static str,
        _: usize,
        _: V,
    ) -> Result<V::Value, Abort> {
        Err(Abort::Found(Shape::Unkeyed))
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _: &'static str,
        _: &'static [&'static str],
        _: V,
    ) -> Result<V::Value, Abort> {
        Err(Abort::Found(Shape::Keyed))
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _: &'static str,
        _: &'static [&'static str],
        _: V,
    ) -> Result<V::Value, Abort> {
        // Enums decode from variant-name text.
        Err(Abort::Found(Shape::Single))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redbind_core::{RespValue, Timestamp};
    use serde::{Deserialize, Serialize};
    use std::collections::HashMap;

    #[derive(Serialize, Deserialize)]
    struct Session {
        id: String,
        hits: u32,
    }

    #[derive(Serialize, Deserialize)]
    struct Pair(i32, i32);

    // === Encode-side probing ===

    #[test]
    fn test_scalars_probe_single() {
        assert_eq!(probe_value(&true), Shape::Single);
        assert_eq!(probe_value(&42_i64), Shape::Single);
        assert_eq!(probe_value("hello"), Shape::Single);
        assert_eq!(probe_value(&1.5_f64), Shape::Single);
    }

    #[test]
    fn test_structs_and_maps_probe_keyed() {
        let session = Session {
            id: "s1".into(),
            hits: 3,
        };
        assert_eq!(probe_value(&session), Shape::Keyed);

        let map: HashMap<String, i64> = HashMap::new();
        assert_eq!(probe_value(&map), Shape::Keyed);
    }

    #[test]
    fn test_sequences_probe_unkeyed() {
        assert_eq!(probe_value(&vec![1, 2, 3]), Shape::Unkeyed);
        assert_eq!(probe_value(&(1, "a")), Shape::Unkeyed);
        assert_eq!(probe_value(&Pair(1, 2)), Shape::Unkeyed);
    }

    #[test]
    fn test_wire_value_probes_single_even_when_array() {
        let prebuilt = RespValue::Array(vec![RespValue::Int(1)]);
        assert_eq!(probe_value(&prebuilt), Shape::Single);
    }

    #[test]
    fn test_timestamp_probes_single() {
        assert_eq!(probe_value(&Timestamp::now()), Shape::Single);
    }

    #[test]
    fn test_option_probes_as_payload() {
        assert_eq!(probe_value(&Some(vec![1, 2])), Shape::Unkeyed);
        assert_eq!(probe_value(&None::<i32>), Shape::Single);
    }

    #[test]
    fn test_probe_is_idempotent() {
        let session = Session {
            id: "s1".into(),
            hits: 3,
        };
        for _ in 0..3 {
            assert_eq!(probe_value(&session), Shape::Keyed);
        }
    }

    // === Decode-side probing ===

    #[test]
    fn test_target_scalars_probe_single() {
        assert_eq!(probe_type::<bool>(), Shape::Single);
        assert_eq!(probe_type::<i64>(), Shape::Single);
        assert_eq!(probe_type::<String>(), Shape::Single);
        assert_eq!(probe_type::<Timestamp>(), Shape::Single);
        assert_eq!(probe_type::<RespValue>(), Shape::Single);
    }

    #[test]
    fn test_target_containers_probe_shape() {
        assert_eq!(probe_type::<Session>(), Shape::Keyed);
        assert_eq!(probe_type::<HashMap<String, i64>>(), Shape::Keyed);
        assert_eq!(probe_type::<Vec<i64>>(), Shape::Unkeyed);
        assert_eq!(probe_type::<(i32, i32)>(), Shape::Unkeyed);
        assert_eq!(probe_type::<Pair>(), Shape::Unkeyed);
    }

    #[test]
    fn test_target_option_probes_as_payload() {
        assert_eq!(probe_type::<Option<Session>>(), Shape::Keyed);
        assert_eq!(probe_type::<Option<i64>>(), Shape::Single);
    }
}
