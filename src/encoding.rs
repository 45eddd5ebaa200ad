//! Value codec between host values, [`Value`] and the CQL wire format.
//!
//! - Host to [`Value`]: [`ToCql`], [`BindValues`] and [`UserDefinedType`].
//! - [`Value`] to wire bytes and back: [`wire`].
//! - [`Value`] to host: [`from_value`], through `serde`.

mod column_type;
mod de;
mod display;
mod extra_types;
mod to_cql;
mod value;
pub mod wire;

pub use column_type::ColumnType;
pub use de::from_value;
pub use extra_types::{
    AsList, AsSet, BigInt, Blob, Counter, CqlDate, CqlTime, CqlTimestamp, Double, SmallInt,
    TimeUuid, TinyInt, Unset,
};
pub use to_cql::{BindValues, ToCql, UserDefinedType, udt_value};
pub(crate) use value::IndexMap;
pub use value::{Value, ValueMap, ValueSet};
pub use wire::{SerializedValues, deserialize_value, serialize_value};
