#![doc = include_str!("../README.md")]
#![deny(clippy::mod_module_files)]

pub mod builders;
pub mod encoding;
pub mod errors;
pub mod results;
pub mod session;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-export main types
pub use builders::{Delete, Fragment, Fragments, Insert, Order, QueryBuilder, Select, Update};
pub use encoding::{
    AsList, AsSet, BigInt, BindValues, Blob, ColumnType, Counter, CqlDate, CqlTime, CqlTimestamp,
    Double, SerializedValues, SmallInt, TimeUuid, TinyInt, ToCql, Unset, UserDefinedType, Value,
    ValueMap, ValueSet, from_value, udt_value,
};
pub use results::{QueryResult, Row, RowCursor};
pub use session::{
    Batch, BatchType, ColumnSpec, Consistency, ExecutionProfile, PageRequest, PagingState,
    PreparedStatement, Query, RawResult, RawRow, SerialConsistency, Session, SessionExt,
    Statement,
};

// Re-export errors
pub use errors::{
    BindingError, DatabaseError, DecodeError, Error, MappingError, QueryBuilderError,
};
