//! Materialization of [`Value`]s into host types through `serde`.
//!
//! [`Value`] implements [`serde::Deserializer`], so any `Deserialize` type
//! can be read from a decoded cell: collections become sequences or maps,
//! UDTs become maps keyed by field name, UUIDs and addresses are handed to
//! the target in their textual form.

use serde::de::value::{MapDeserializer, SeqDeserializer, StringDeserializer};
use serde::de::{DeserializeOwned, IntoDeserializer, Visitor};
use serde::forward_to_deserialize_any;

use super::value::Value;
use crate::errors::MappingError;

/// Deserializes a host value out of a [`Value`].
///
/// # Errors
///
/// Returns [`MappingError::Custom`] if the value does not fit `T`.
pub fn from_value<T: DeserializeOwned>(value: Value) -> Result<T, MappingError> {
    T::deserialize(value)
}

impl<'de> IntoDeserializer<'de, MappingError> for Value {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self::Deserializer {
        self
    }
}

impl<'de> serde::Deserializer<'de> for Value {
    type Error = MappingError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        match self {
            Value::Null | Value::Unset => visitor.visit_unit(),
            Value::Boolean(v) => visitor.visit_bool(v),
            Value::TinyInt(v) => visitor.visit_i8(v),
            Value::SmallInt(v) => visitor.visit_i16(v),
            Value::Int(v) => visitor.visit_i32(v),
            Value::BigInt(v) | Value::Counter(v) => visitor.visit_i64(v),
            Value::Float(v) => visitor.visit_f32(v),
            Value::Double(v) => visitor.visit_f64(v),
            Value::Text(v) => visitor.visit_string(v),
            Value::Blob(v) => visitor.visit_byte_buf(v),
            Value::Uuid(v) | Value::TimeUuid(v) => visitor.visit_string(v.to_string()),
            Value::Date(v) => visitor.visit_u32(v.0),
            Value::Time(v) => visitor.visit_i64(v.0),
            Value::Timestamp(v) => visitor.visit_i64(v.0),
            Value::Inet(v) => visitor.visit_string(v.to_string()),
            Value::List(items) | Value::Tuple(items) => {
                let mut seq = SeqDeserializer::<_, MappingError>::new(items.into_iter());
                let value = visitor.visit_seq(&mut seq)?;
                seq.end()?;
                Ok(value)
            }
            Value::Set(items) => {
                let mut seq = SeqDeserializer::<_, MappingError>::new(items.into_iter());
                let value = visitor.visit_seq(&mut seq)?;
                seq.end()?;
                Ok(value)
            }
            Value::Map(entries) => {
                let mut map = MapDeserializer::<_, MappingError>::new(entries.into_iter());
                let value = visitor.visit_map(&mut map)?;
                map.end()?;
                Ok(value)
            }
            Value::Udt { fields, .. } => {
                let mut map = MapDeserializer::<_, MappingError>::new(fields.into_iter());
                let value = visitor.visit_map(&mut map)?;
                map.end()?;
                Ok(value)
            }
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        match self {
            Value::Null | Value::Unset => visitor.visit_none(),
            other => visitor.visit_some(other),
        }
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        // Unit variants stored by name.
        match self {
            Value::Text(name) => visitor.visit_enum(StringDeserializer::<MappingError>::new(name)),
            other => other.deserialize_any(visitor),
        }
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        match self {
            // Lets `Vec<u8>` read blobs.
            Value::Blob(bytes) => {
                let mut seq = SeqDeserializer::<_, MappingError>::new(bytes.into_iter());
                let value = visitor.visit_seq(&mut seq)?;
                seq.end()?;
                Ok(value)
            }
            other => other.deserialize_any(visitor),
        }
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(
        self,
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        visitor.visit_unit()
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct tuple tuple_struct map struct identifier
    }
}
