//! CQL binary protocol (v4) encoding of values.
//!
//! Every value travels as a *cell*: a big-endian `i32` length followed by
//! that many bytes. Two negative lengths are reserved:
//!
//! - `-1`: null
//! - `-2`: not set, the column is left untouched
//!
//! Numbers are fixed width and big-endian. A list or a set is an `i32`
//! element count followed by one cell per element. A map is an `i32` entry
//! count followed by alternating key and value cells. Tuples and UDTs are one
//! cell per field with no count, the arity comes from the column type.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use uuid::Uuid;

use super::column_type::ColumnType;
use super::extra_types::{CqlDate, CqlTime, CqlTimestamp};
use super::value::{Value, ValueMap, ValueSet};
use crate::errors::{BindingError, DecodeError};

/// Length prefix of a null cell.
pub const NULL_LENGTH: i32 = -1;
/// Length prefix of a not-set cell.
pub const UNSET_LENGTH: i32 = -2;

/// Appends `value` to `out` as a length-prefixed cell.
///
/// On error `out` is left as it was before the call.
///
/// # Errors
///
/// * [`BindingError::NestedUnset`] if an `Unset` appears inside a collection,
///   tuple or UDT.
/// * [`BindingError::ValueTooLarge`] or [`BindingError::CollectionTooLarge`]
///   if a length does not fit the protocol's `i32` prefixes.
pub fn serialize_value(value: &Value, out: &mut Vec<u8>) -> Result<(), BindingError> {
    let len_pos = out.len();
    out.extend([0u8; 4]);
    match cell_length(value, len_pos, out) {
        Ok(len) => {
            out[len_pos..len_pos + 4].copy_from_slice(&len.to_be_bytes());
            Ok(())
        }
        Err(err) => {
            out.truncate(len_pos);
            Err(err)
        }
    }
}

/// Writes the body of `value` after the length slot at `len_pos` and returns
/// the length prefix to store there.
fn cell_length(value: &Value, len_pos: usize, out: &mut Vec<u8>) -> Result<i32, BindingError> {
    match value {
        Value::Null => Ok(NULL_LENGTH),
        Value::Unset => Ok(UNSET_LENGTH),
        _ => {
            write_body(value, out)?;
            let body_len = out.len() - len_pos - 4;
            i32::try_from(body_len).map_err(|_| BindingError::ValueTooLarge(body_len))
        }
    }
}

/// Serializes the contents of a cell without its length prefix.
///
/// Returns `None` for a null value, which has no contents.
///
/// # Errors
///
/// * [`BindingError::NestedUnset`] for `Unset`, which has no contents either
///   and is only meaningful as a statement parameter.
/// * Any error of [`serialize_value`].
pub fn serialize_cell(value: &Value) -> Result<Option<Vec<u8>>, BindingError> {
    match value {
        Value::Null => Ok(None),
        Value::Unset => Err(BindingError::NestedUnset("cell")),
        _ => {
            let mut body = Vec::new();
            write_body(value, &mut body)?;
            Ok(Some(body))
        }
    }
}

/// Writes a cell nested in a container, where `Unset` is meaningless.
fn serialize_nested(
    value: &Value,
    container: &'static str,
    out: &mut Vec<u8>,
) -> Result<(), BindingError> {
    if value.is_unset() {
        return Err(BindingError::NestedUnset(container));
    }
    serialize_value(value, out)
}

/// Writes an element count.
fn write_count(count: usize, out: &mut Vec<u8>) -> Result<(), BindingError> {
    let count = i32::try_from(count).map_err(|_| BindingError::CollectionTooLarge(count))?;
    out.extend(count.to_be_bytes());
    Ok(())
}

/// Writes the contents of a cell.
fn write_body(value: &Value, out: &mut Vec<u8>) -> Result<(), BindingError> {
    match value {
        // Length-only cells
        Value::Null | Value::Unset => {}
        Value::Boolean(v) => out.push(u8::from(*v)),
        Value::TinyInt(v) => out.extend(v.to_be_bytes()),
        Value::SmallInt(v) => out.extend(v.to_be_bytes()),
        Value::Int(v) => out.extend(v.to_be_bytes()),
        Value::BigInt(v) | Value::Counter(v) => out.extend(v.to_be_bytes()),
        Value::Float(v) => out.extend(v.to_be_bytes()),
        Value::Double(v) => out.extend(v.to_be_bytes()),
        Value::Text(s) => out.extend_from_slice(s.as_bytes()),
        Value::Blob(b) => out.extend_from_slice(b),
        Value::Uuid(u) | Value::TimeUuid(u) => out.extend_from_slice(u.as_bytes()),
        Value::Date(d) => out.extend(d.0.to_be_bytes()),
        Value::Time(t) => out.extend(t.0.to_be_bytes()),
        Value::Timestamp(ts) => out.extend(ts.0.to_be_bytes()),
        Value::Inet(IpAddr::V4(addr)) => out.extend(addr.octets()),
        Value::Inet(IpAddr::V6(addr)) => out.extend(addr.octets()),
        Value::List(items) => {
            write_count(items.len(), out)?;
            for item in items {
                serialize_nested(item, "list", out)?;
            }
        }
        Value::Set(items) => {
            write_count(items.len(), out)?;
            for item in items {
                serialize_nested(item, "set", out)?;
            }
        }
        Value::Map(entries) => {
            write_count(entries.len(), out)?;
            for (key, value) in entries {
                serialize_nested(key, "map", out)?;
                serialize_nested(value, "map", out)?;
            }
        }
        Value::Tuple(items) => {
            for item in items {
                serialize_nested(item, "tuple", out)?;
            }
        }
        Value::Udt { fields, .. } => {
            for (_, value) in fields {
                serialize_nested(value, "udt", out)?;
            }
        }
    }
    Ok(())
}

/// A single bound parameter as it sits in a [`SerializedValues`] buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell<'a> {
    /// A null cell.
    Null,
    /// A not-set cell.
    Unset,
    /// A cell with contents.
    Bytes(&'a [u8]),
}

/// The serialized parameter list of a statement.
///
/// On the wire this is a `u16` count followed by the cells, see
/// [`to_bytes`](Self::to_bytes).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SerializedValues {
    count: u16,
    buffer: Vec<u8>,
}

impl SerializedValues {
    /// Creates an empty parameter list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializes a whole parameter list.
    ///
    /// # Errors
    ///
    /// * [`BindingError::TooManyValues`] for more than 65535 parameters.
    /// * Any error of [`serialize_value`].
    pub fn from_values<'a>(values: impl IntoIterator<Item = &'a Value>) -> Result<Self, BindingError> {
        let mut serialized = Self::new();
        for value in values {
            serialized.push(value)?;
        }
        Ok(serialized)
    }

    /// Appends one parameter.
    ///
    /// # Errors
    ///
    /// * [`BindingError::TooManyValues`] if the list already holds 65535 parameters.
    /// * Any error of [`serialize_value`].
    pub fn push(&mut self, value: &Value) -> Result<(), BindingError> {
        let count = self
            .count
            .checked_add(1)
            .ok_or(BindingError::TooManyValues(usize::from(self.count) + 1))?;
        serialize_value(value, &mut self.buffer)?;
        self.count = count;
        Ok(())
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        usize::from(self.count)
    }

    /// Whether there are no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The concatenated cells, without the count.
    #[must_use]
    pub fn cell_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Iterates over the parameters.
    #[must_use]
    pub fn cells(&self) -> Cells<'_> {
        Cells {
            reader: Reader::new(&self.buffer),
        }
    }

    /// The parameter list in its wire layout: `[u16 count][cells]`.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(2 + self.buffer.len());
        bytes.extend(self.count.to_be_bytes());
        bytes.extend_from_slice(&self.buffer);
        bytes
    }
}

/// Iterator over the cells of a [`SerializedValues`].
#[derive(Debug, Clone)]
pub struct Cells<'a> {
    reader: Reader<'a>,
}

impl<'a> Iterator for Cells<'a> {
    type Item = Cell<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.reader.is_empty() {
            return None;
        }
        let len = self.reader.read_i32().ok()?;
        match len {
            NULL_LENGTH => Some(Cell::Null),
            UNSET_LENGTH => Some(Cell::Unset),
            _ => {
                let len = usize::try_from(len).ok()?;
                self.reader.take(len).ok().map(Cell::Bytes)
            }
        }
    }
}

/// Cursor over a byte slice.
#[derive(Debug, Clone)]
struct Reader<'a> {
    data: &'a [u8],
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        if n > self.data.len() {
            return Err(DecodeError::UnexpectedEof {
                needed: n,
                available: self.data.len(),
            });
        }
        let (head, tail) = self.data.split_at(n);
        self.data = tail;
        Ok(head)
    }

    fn read_i32(&mut self) -> Result<i32, DecodeError> {
        let bytes = self.take(4)?;
        Ok(i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Reads a collection count, which cannot be negative.
    fn read_count(&mut self) -> Result<usize, DecodeError> {
        let count = self.read_i32()?;
        usize::try_from(count).map_err(|_| DecodeError::InvalidLength(count))
    }

    /// Reads a cell, `None` for a null cell.
    fn read_cell(&mut self) -> Result<Option<&'a [u8]>, DecodeError> {
        let len = self.read_i32()?;
        if len == NULL_LENGTH {
            return Ok(None);
        }
        let len = usize::try_from(len).map_err(|_| DecodeError::InvalidLength(len))?;
        self.take(len).map(Some)
    }

    fn finish(self) -> Result<(), DecodeError> {
        if self.data.is_empty() {
            Ok(())
        } else {
            Err(DecodeError::TrailingBytes(self.data.len()))
        }
    }
}

/// The value of a null cell of the given type.
///
/// Collections have no null distinct from empty, so a null collection cell
/// is the empty collection.
fn null_value(typ: &ColumnType) -> Value {
    match typ {
        ColumnType::List(_) => Value::List(Vec::new()),
        ColumnType::Set(_) => Value::Set(ValueSet::default()),
        ColumnType::Map(..) => Value::Map(ValueMap::default()),
        _ => Value::Null,
    }
}

/// Checks the width of a fixed-size value.
fn fixed<const N: usize>(bytes: &[u8], type_name: &'static str) -> Result<[u8; N], DecodeError> {
    bytes.try_into().map_err(|_| DecodeError::InvalidWidth {
        type_name,
        expected: N,
        got: bytes.len(),
    })
}

/// Decodes the contents of a cell (`None` for a null cell) as a value of `typ`.
///
/// # Errors
///
/// * [`DecodeError::UnsupportedType`] for `varint`, `decimal`, `duration`
///   and custom types.
/// * Any other [`DecodeError`] if the bytes are not a valid encoding of `typ`.
pub fn deserialize_value(cell: Option<&[u8]>, typ: &ColumnType) -> Result<Value, DecodeError> {
    let Some(bytes) = cell else {
        return Ok(null_value(typ));
    };
    Ok(match typ {
        ColumnType::Boolean => Value::Boolean(fixed::<1>(bytes, "boolean")?[0] != 0),
        ColumnType::TinyInt => Value::TinyInt(i8::from_be_bytes(fixed(bytes, "tinyint")?)),
        ColumnType::SmallInt => Value::SmallInt(i16::from_be_bytes(fixed(bytes, "smallint")?)),
        ColumnType::Int => Value::Int(i32::from_be_bytes(fixed(bytes, "int")?)),
        ColumnType::BigInt => Value::BigInt(i64::from_be_bytes(fixed(bytes, "bigint")?)),
        ColumnType::Counter => Value::Counter(i64::from_be_bytes(fixed(bytes, "counter")?)),
        ColumnType::Float => Value::Float(f32::from_be_bytes(fixed(bytes, "float")?)),
        ColumnType::Double => Value::Double(f64::from_be_bytes(fixed(bytes, "double")?)),
        ColumnType::Ascii | ColumnType::Text => Value::Text(
            String::from_utf8(bytes.to_vec()).map_err(|_| DecodeError::InvalidUtf8)?,
        ),
        ColumnType::Blob => Value::Blob(bytes.to_vec()),
        ColumnType::Uuid => Value::Uuid(Uuid::from_bytes(fixed(bytes, "uuid")?)),
        ColumnType::TimeUuid => Value::TimeUuid(Uuid::from_bytes(fixed(bytes, "timeuuid")?)),
        ColumnType::Date => Value::Date(CqlDate(u32::from_be_bytes(fixed(bytes, "date")?))),
        ColumnType::Time => Value::Time(CqlTime(i64::from_be_bytes(fixed(bytes, "time")?))),
        ColumnType::Timestamp => Value::Timestamp(CqlTimestamp(i64::from_be_bytes(fixed(
            bytes,
            "timestamp",
        )?))),
        ColumnType::Inet => match bytes.len() {
            4 => Value::Inet(IpAddr::V4(Ipv4Addr::from(fixed::<4>(bytes, "inet")?))),
            16 => Value::Inet(IpAddr::V6(Ipv6Addr::from(fixed::<16>(bytes, "inet")?))),
            got => {
                return Err(DecodeError::InvalidWidth {
                    type_name: "inet",
                    expected: 4,
                    got,
                });
            }
        },
        ColumnType::List(element) => {
            let mut reader = Reader::new(bytes);
            let count = reader.read_count()?;
            let mut items = Vec::new();
            for _ in 0..count {
                items.push(deserialize_value(reader.read_cell()?, element)?);
            }
            reader.finish()?;
            Value::List(items)
        }
        ColumnType::Set(element) => {
            let mut reader = Reader::new(bytes);
            let count = reader.read_count()?;
            let mut items = ValueSet::default();
            for _ in 0..count {
                items.insert(deserialize_value(reader.read_cell()?, element)?);
            }
            reader.finish()?;
            Value::Set(items)
        }
        ColumnType::Map(key_type, value_type) => {
            let mut reader = Reader::new(bytes);
            let count = reader.read_count()?;
            let mut entries = ValueMap::default();
            for _ in 0..count {
                let key = deserialize_value(reader.read_cell()?, key_type)?;
                let value = deserialize_value(reader.read_cell()?, value_type)?;
                entries.insert(key, value);
            }
            reader.finish()?;
            Value::Map(entries)
        }
        ColumnType::Tuple(element_types) => {
            let mut reader = Reader::new(bytes);
            let mut items = Vec::with_capacity(element_types.len());
            for element in element_types {
                items.push(read_field(&mut reader, element)?);
            }
            reader.finish()?;
            Value::Tuple(items)
        }
        ColumnType::UserDefinedType {
            type_name,
            field_types,
            ..
        } => {
            let mut reader = Reader::new(bytes);
            let mut fields = Vec::with_capacity(field_types.len());
            for (name, field_type) in field_types {
                fields.push((name.clone(), read_field(&mut reader, field_type)?));
            }
            reader.finish()?;
            Value::Udt {
                type_name: type_name.clone(),
                fields,
            }
        }
        ColumnType::Varint | ColumnType::Decimal | ColumnType::Duration | ColumnType::Custom(_) => {
            return Err(DecodeError::UnsupportedType(typ.to_string()));
        }
    })
}

/// Reads a tuple or UDT field. Trailing fields may be omitted by the
/// server, typically after the type gained fields, and read as null.
fn read_field(reader: &mut Reader<'_>, typ: &ColumnType) -> Result<Value, DecodeError> {
    if reader.is_empty() {
        Ok(null_value(typ))
    } else {
        deserialize_value(reader.read_cell()?, typ)
    }
}
