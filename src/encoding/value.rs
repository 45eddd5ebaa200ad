//! The CQL value model.
//!
//! [`Value`] is the typed form every bound parameter and every decoded cell
//! passes through. It is a closed union over the CQL types this crate can
//! marshal, plus the two markers the protocol distinguishes:
//!
//! - [`Value::Null`]: the column is set to empty.
//! - [`Value::Unset`]: the column is not touched at all.

use std::hash::{Hash, Hasher};
use std::net::IpAddr;

use uuid::Uuid;

use super::extra_types::{CqlDate, CqlTime, CqlTimestamp};

/// `IndexMap` alias using hashbrown's default hasher.
pub(crate) type IndexMap<K, V> = indexmap::IndexMap<K, V, hashbrown::DefaultHashBuilder>;

/// `IndexSet` alias using hashbrown's default hasher.
pub(crate) type IndexSet<T> = indexmap::IndexSet<T, hashbrown::DefaultHashBuilder>;

/// Elements of a CQL set: unique, kept in first-insertion order.
pub type ValueSet = IndexSet<Value>;

/// Entries of a CQL map: unique keys, kept in first-insertion order.
pub type ValueMap = IndexMap<Value, Value>;

/// A value of a CQL column or statement parameter.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// CQL null.
    #[default]
    Null,
    /// `boolean`
    Boolean(bool),
    /// `tinyint`
    TinyInt(i8),
    /// `smallint`
    SmallInt(i16),
    /// `int`
    Int(i32),
    /// `bigint`
    BigInt(i64),
    /// `float`
    Float(f32),
    /// `double`
    Double(f64),
    /// `text`, `varchar` and `ascii`
    Text(String),
    /// `blob`
    Blob(Vec<u8>),
    /// `uuid`
    Uuid(Uuid),
    /// `timeuuid`
    TimeUuid(Uuid),
    /// `date`
    Date(CqlDate),
    /// `time`
    Time(CqlTime),
    /// `timestamp`
    Timestamp(CqlTimestamp),
    /// `inet`
    Inet(IpAddr),
    /// `counter` delta.
    Counter(i64),
    /// `list<T>`
    List(Vec<Value>),
    /// `set<T>`
    Set(ValueSet),
    /// `map<K, V>`
    Map(ValueMap),
    /// `tuple<...>`, positional and of fixed arity.
    Tuple(Vec<Value>),
    /// A user-defined type.
    ///
    /// Only the field values travel on the wire, in declaration order; the
    /// names are kept so decoded records can be read by field.
    Udt {
        /// Name of the type.
        type_name: String,
        /// Fields in declaration order.
        fields: Vec<(String, Value)>,
    },
    /// Marker for a parameter that must leave its column untouched.
    Unset,
}

impl Value {
    /// Check if the value is Null.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if the value is Unset.
    #[must_use]
    pub fn is_unset(&self) -> bool {
        matches!(self, Value::Unset)
    }

    /// Check if the value is a counter delta.
    #[must_use]
    pub fn is_counter(&self) -> bool {
        matches!(self, Value::Counter(_))
    }

    /// Name of the CQL type this value encodes as.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::TinyInt(_) => "tinyint",
            Value::SmallInt(_) => "smallint",
            Value::Int(_) => "int",
            Value::BigInt(_) => "bigint",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::Text(_) => "text",
            Value::Blob(_) => "blob",
            Value::Uuid(_) => "uuid",
            Value::TimeUuid(_) => "timeuuid",
            Value::Date(_) => "date",
            Value::Time(_) => "time",
            Value::Timestamp(_) => "timestamp",
            Value::Inet(_) => "inet",
            Value::Counter(_) => "counter",
            Value::List(_) => "list",
            Value::Set(_) => "set",
            Value::Map(_) => "map",
            Value::Tuple(_) => "tuple",
            Value::Udt { .. } => "udt",
            Value::Unset => "unset",
        }
    }

    /// Builds a list value.
    #[must_use]
    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Value::List(items.into_iter().collect())
    }

    /// Builds a set value, dropping duplicate elements.
    #[must_use]
    pub fn set(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Set(items.into_iter().collect())
    }

    /// Builds a map value. A repeated key keeps its first position and its last value.
    #[must_use]
    pub fn map(entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        Value::Map(entries.into_iter().collect())
    }

    /// Builds a user-defined type value from fields in declaration order.
    #[must_use]
    pub fn udt<N: Into<String>>(
        type_name: impl Into<String>,
        fields: impl IntoIterator<Item = (N, Value)>,
    ) -> Self {
        Value::Udt {
            type_name: type_name.into(),
            fields: fields
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) | (Value::Unset, Value::Unset) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::TinyInt(a), Value::TinyInt(b)) => a == b,
            (Value::SmallInt(a), Value::SmallInt(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::BigInt(a), Value::BigInt(b)) | (Value::Counter(a), Value::Counter(b)) => {
                a == b
            }
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Double(a), Value::Double(b)) => a.to_bits() == b.to_bits(),
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Blob(a), Value::Blob(b)) => a == b,
            (Value::Uuid(a), Value::Uuid(b)) | (Value::TimeUuid(a), Value::TimeUuid(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Time(a), Value::Time(b)) => a == b,
            (Value::Timestamp(a), Value::Timestamp(b)) => a == b,
            (Value::Inet(a), Value::Inet(b)) => a == b,
            (Value::List(a), Value::List(b)) | (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (Value::Set(a), Value::Set(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (
                Value::Udt {
                    type_name: a_name,
                    fields: a_fields,
                },
                Value::Udt {
                    type_name: b_name,
                    fields: b_fields,
                },
            ) => a_name == b_name && a_fields == b_fields,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Must agree with PartialEq: floats hash by bits, and sets and maps
        // compare regardless of order so only their length is hashed.
        core::mem::discriminant(self).hash(state);
        match self {
            Value::Null | Value::Unset => {}
            Value::Boolean(v) => v.hash(state),
            Value::TinyInt(v) => v.hash(state),
            Value::SmallInt(v) => v.hash(state),
            Value::Int(v) => v.hash(state),
            Value::BigInt(v) | Value::Counter(v) => v.hash(state),
            Value::Float(v) => v.to_bits().hash(state),
            Value::Double(v) => v.to_bits().hash(state),
            Value::Text(v) => v.hash(state),
            Value::Blob(v) => v.hash(state),
            Value::Uuid(v) | Value::TimeUuid(v) => v.hash(state),
            Value::Date(v) => v.hash(state),
            Value::Time(v) => v.hash(state),
            Value::Timestamp(v) => v.hash(state),
            Value::Inet(v) => v.hash(state),
            Value::List(v) | Value::Tuple(v) => v.hash(state),
            Value::Set(v) => v.len().hash(state),
            Value::Map(v) => v.len().hash(state),
            Value::Udt { type_name, fields } => {
                type_name.hash(state);
                fields.hash(state);
            }
        }
    }
}

// From implementations for common types
impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<i8> for Value {
    fn from(v: i8) -> Self {
        Value::TinyInt(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::SmallInt(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::BigInt(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Double(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_owned())
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Uuid(v)
    }
}

impl From<IpAddr> for Value {
    fn from(v: IpAddr) -> Self {
        Value::Inet(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_and_unset_are_distinct() {
        assert_ne!(Value::Null, Value::Unset);
        assert!(Value::Null.is_null());
        assert!(!Value::Unset.is_null());
        assert!(Value::Unset.is_unset());
    }

    #[test]
    fn test_float_equality_is_bitwise() {
        assert_eq!(Value::Double(f64::NAN), Value::Double(f64::NAN));
        assert_ne!(Value::Double(0.0), Value::Double(-0.0));
        assert_ne!(Value::Float(1.0), Value::Double(1.0));
    }

    #[test]
    fn test_set_deduplicates_and_ignores_order() {
        let a = Value::set([Value::Int(1), Value::Int(2), Value::Int(1)]);
        let b = Value::set([Value::Int(2), Value::Int(1)]);
        assert_eq!(a, b);
        let Value::Set(items) = a else {
            panic!("expected a set");
        };
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_map_last_write_wins() {
        let map = Value::map([
            (Value::from("a"), Value::Int(1)),
            (Value::from("b"), Value::Int(2)),
            (Value::from("a"), Value::Int(3)),
        ]);
        let Value::Map(entries) = map else {
            panic!("expected a map");
        };
        let keys: Vec<_> = entries.keys().cloned().collect();
        assert_eq!(keys, vec![Value::from("a"), Value::from("b")]);
        assert_eq!(entries.get(&Value::from("a")), Some(&Value::Int(3)));
    }

    #[test]
    fn test_counter_is_not_bigint() {
        assert_ne!(Value::Counter(1), Value::BigInt(1));
        assert!(Value::Counter(1).is_counter());
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some(5i32)), Value::Int(5));
    }
}
