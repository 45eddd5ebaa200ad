//! Submodule defining the errors used across the crate.
//!
//! Each concern has its own enum, all of them convert into [`Error`]:
//!
//! - [`BindingError`]: a host value cannot become a [`Value`](crate::Value).
//! - [`QueryBuilderError`]: a builder was configured inconsistently.
//! - [`DatabaseError`]: the database rejected a statement.
//! - [`MappingError`]: a decoded row does not fit the requested shape.
//! - [`DecodeError`]: raw bytes are not a valid encoding of the column type.

use std::fmt::Display;

/// Errors raised while turning a host value into a [`Value`](crate::Value)
/// or serializing it for the wire.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindingError {
    /// An integer without an explicit width does not fit the default 32-bit column type.
    #[error("Integer {value} does not fit into a CQL {target}; use an explicit width wrapper")]
    IntegerOutOfRange {
        /// The offending value.
        value: i128,
        /// The CQL type it was being encoded as.
        target: &'static str,
    },
    /// A user-defined type dumped a different number of values than it declares fields.
    #[error("UDT `{type_name}` declares {expected} fields but dumped {got} values")]
    UdtFieldCount {
        /// The UDT name.
        type_name: String,
        /// The number of declared fields.
        expected: usize,
        /// The number of dumped values.
        got: usize,
    },
    /// `Unset` may only be used as a top-level statement parameter.
    #[error("Unset can only be bound as a statement parameter, not inside a {0}")]
    NestedUnset(&'static str),
    /// The serialized value exceeds the protocol's 32-bit length prefix.
    #[error("Serialized value of {0} bytes exceeds the protocol limit")]
    ValueTooLarge(usize),
    /// A statement cannot carry more than `u16::MAX` parameters.
    #[error("Statement has {0} parameters, the protocol allows at most 65535")]
    TooManyValues(usize),
    /// A collection has more elements than the protocol can express.
    #[error("Collection with {0} elements exceeds the protocol limit")]
    CollectionTooLarge(usize),
}

/// Errors raised by inconsistent query builder state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryBuilderError {
    /// `IF EXISTS` and custom `IF` conditions are mutually exclusive.
    #[error("IF EXISTS cannot be combined with custom IF conditions")]
    ConflictingConditions,
    /// The statement kind needs at least one column assignment.
    #[error("{0} statement needs at least one assigned column")]
    NoAssignments(&'static str),
    /// Counter columns only accept increments and decrements.
    #[error("Counter column `{0}` cannot be assigned directly, use inc or dec")]
    CounterAssignment(String),
}

/// An error reported by the database for a submitted statement.
///
/// The code is the protocol error code (for instance `0x2200` for an invalid
/// request); the session layer fills it in and this crate never rewrites it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Database error 0x{code:04x}: {message}")]
pub struct DatabaseError {
    /// Protocol error code.
    pub code: i32,
    /// Message sent by the server.
    pub message: String,
}

impl DatabaseError {
    /// Protocol code of an invalid request, e.g. a type mismatch against the column.
    pub const INVALID: i32 = 0x2200;
    /// Protocol code of a syntax error.
    pub const SYNTAX_ERROR: i32 = 0x2000;

    /// Creates a new database error.
    #[must_use]
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Errors raised while materializing decoded rows into host values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MappingError {
    /// The response does not carry a rows body.
    #[error("The query did not return rows")]
    NoRows,
    /// The row has no columns, so no scalar can be taken from it.
    #[error("Row has no columns")]
    EmptyRow,
    /// Error reported by the target type while deserializing.
    #[error("{0}")]
    Custom(String),
}

impl serde::de::Error for MappingError {
    fn custom<T: Display>(msg: T) -> Self {
        MappingError::Custom(msg.to_string())
    }
}

/// Errors raised while decoding wire bytes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Fewer bytes are available than the encoding requires.
    #[error("Expected {needed} bytes but only {available} are left")]
    UnexpectedEof {
        /// Bytes required.
        needed: usize,
        /// Bytes available.
        available: usize,
    },
    /// A length prefix is negative where it cannot be.
    #[error("Invalid length prefix {0}")]
    InvalidLength(i32),
    /// A fixed-width value has the wrong number of bytes.
    #[error("A {type_name} value needs {expected} bytes, got {got}")]
    InvalidWidth {
        /// The CQL type being decoded.
        type_name: &'static str,
        /// The expected width.
        expected: usize,
        /// The received width.
        got: usize,
    },
    /// Text is not valid UTF-8.
    #[error("Text value is not valid UTF-8")]
    InvalidUtf8,
    /// Bytes are left over after decoding a value.
    #[error("{0} trailing bytes after value")]
    TrailingBytes(usize),
    /// The column type cannot be decoded by this crate.
    #[error("Column type {0} is not supported")]
    UnsupportedType(String),
    /// A row does not have as many cells as the result has columns.
    #[error("Row has {got} cells but the result has {expected} columns")]
    RowArity {
        /// Number of columns in the result metadata.
        expected: usize,
        /// Number of cells in the row.
        got: usize,
    },
}

/// The error type of this crate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A host value could not be bound.
    #[error(transparent)]
    Binding(#[from] BindingError),
    /// A builder was configured inconsistently.
    #[error(transparent)]
    QueryBuilder(#[from] QueryBuilderError),
    /// The database rejected the statement.
    #[error(transparent)]
    Database(#[from] DatabaseError),
    /// Decoded rows do not fit the requested shape.
    #[error(transparent)]
    Mapping(#[from] MappingError),
    /// Wire bytes could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// The session failed before the database could answer.
    #[error("Session error: {0}")]
    Transport(String),
    /// A paged cursor was read again after reporting its end.
    #[error("Paged result is exhausted")]
    CursorExhausted,
}
