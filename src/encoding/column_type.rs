//! Column types as described by result metadata.

use core::fmt;

/// The CQL type of a result column, which drives decoding of its cells.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "testing", derive(arbitrary::Arbitrary))]
pub enum ColumnType {
    /// `ascii`
    Ascii,
    /// `boolean`
    Boolean,
    /// `blob`
    Blob,
    /// `counter`
    Counter,
    /// `date`
    Date,
    /// `decimal`, not decodable by this crate.
    Decimal,
    /// `double`
    Double,
    /// `duration`, not decodable by this crate.
    Duration,
    /// `float`
    Float,
    /// `int`
    Int,
    /// `bigint`
    BigInt,
    /// `smallint`
    SmallInt,
    /// `tinyint`
    TinyInt,
    /// `text` / `varchar`
    Text,
    /// `time`
    Time,
    /// `timestamp`
    Timestamp,
    /// `uuid`
    Uuid,
    /// `timeuuid`
    TimeUuid,
    /// `inet`
    Inet,
    /// `varint`, not decodable by this crate.
    Varint,
    /// `list<T>`
    List(Box<ColumnType>),
    /// `set<T>`
    Set(Box<ColumnType>),
    /// `map<K, V>`
    Map(Box<ColumnType>, Box<ColumnType>),
    /// `tuple<...>`
    Tuple(Vec<ColumnType>),
    /// A user-defined type.
    UserDefinedType {
        /// Keyspace the type lives in.
        keyspace: String,
        /// Name of the type.
        type_name: String,
        /// Fields in declaration order.
        field_types: Vec<(String, ColumnType)>,
    },
    /// A custom type identified by its class name, not decodable by this crate.
    Custom(String),
}

impl ColumnType {
    /// `list<element>`
    #[must_use]
    pub fn list(element: ColumnType) -> Self {
        ColumnType::List(Box::new(element))
    }

    /// `set<element>`
    #[must_use]
    pub fn set(element: ColumnType) -> Self {
        ColumnType::Set(Box::new(element))
    }

    /// `map<key, value>`
    #[must_use]
    pub fn map(key: ColumnType, value: ColumnType) -> Self {
        ColumnType::Map(Box::new(key), Box::new(value))
    }

    /// A user-defined type with fields in declaration order.
    #[must_use]
    pub fn udt<N: Into<String>>(
        keyspace: impl Into<String>,
        type_name: impl Into<String>,
        field_types: impl IntoIterator<Item = (N, ColumnType)>,
    ) -> Self {
        ColumnType::UserDefinedType {
            keyspace: keyspace.into(),
            type_name: type_name.into(),
            field_types: field_types
                .into_iter()
                .map(|(name, typ)| (name.into(), typ))
                .collect(),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Ascii => f.write_str("ascii"),
            ColumnType::Boolean => f.write_str("boolean"),
            ColumnType::Blob => f.write_str("blob"),
            ColumnType::Counter => f.write_str("counter"),
            ColumnType::Date => f.write_str("date"),
            ColumnType::Decimal => f.write_str("decimal"),
            ColumnType::Double => f.write_str("double"),
            ColumnType::Duration => f.write_str("duration"),
            ColumnType::Float => f.write_str("float"),
            ColumnType::Int => f.write_str("int"),
            ColumnType::BigInt => f.write_str("bigint"),
            ColumnType::SmallInt => f.write_str("smallint"),
            ColumnType::TinyInt => f.write_str("tinyint"),
            ColumnType::Text => f.write_str("text"),
            ColumnType::Time => f.write_str("time"),
            ColumnType::Timestamp => f.write_str("timestamp"),
            ColumnType::Uuid => f.write_str("uuid"),
            ColumnType::TimeUuid => f.write_str("timeuuid"),
            ColumnType::Inet => f.write_str("inet"),
            ColumnType::Varint => f.write_str("varint"),
            ColumnType::List(element) => write!(f, "list<{element}>"),
            ColumnType::Set(element) => write!(f, "set<{element}>"),
            ColumnType::Map(key, value) => write!(f, "map<{key}, {value}>"),
            ColumnType::Tuple(elements) => {
                f.write_str("tuple<")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{element}")?;
                }
                f.write_str(">")
            }
            ColumnType::UserDefinedType {
                keyspace,
                type_name,
                ..
            } => {
                if keyspace.is_empty() {
                    f.write_str(type_name)
                } else {
                    write!(f, "{keyspace}.{type_name}")
                }
            }
            ColumnType::Custom(class) => write!(f, "'{class}'"),
        }
    }
}
