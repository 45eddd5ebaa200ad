//! Conversion of host values into [`Value`]s.
//!
//! [`ToCql`] converts one value, [`BindValues`] a whole parameter list and
//! [`UserDefinedType`] describes records that travel as CQL UDTs.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::hash::BuildHasher;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use uuid::Uuid;

use super::extra_types::{
    AsList, AsSet, BigInt, Blob, Counter, CqlDate, CqlTime, CqlTimestamp, Double, SmallInt,
    TimeUuid, TinyInt, Unset,
};
use super::value::Value;
use crate::errors::BindingError;

/// A host value that can be bound as a CQL value.
///
/// Integers with an explicit width map to the matching CQL type (`i8` to
/// `tinyint`, `i16` to `smallint`, `i32` to `int`, `i64` to `bigint`).
/// Integers without one (`u8` to `u64`, `usize`, `isize`) are bound as a
/// 32-bit `int` and must fit in it; use [`TinyInt`], [`SmallInt`] or
/// [`BigInt`] to pick another width.
pub trait ToCql {
    /// Converts `self` into a [`Value`].
    ///
    /// # Errors
    ///
    /// * [`BindingError::IntegerOutOfRange`] if an integer does not fit its default width.
    /// * [`BindingError::UdtFieldCount`] if a UDT dumps the wrong number of fields.
    fn to_cql(&self) -> Result<Value, BindingError>;
}

impl<T: ToCql + ?Sized> ToCql for &T {
    fn to_cql(&self) -> Result<Value, BindingError> {
        (**self).to_cql()
    }
}

impl<T: ToCql + ?Sized> ToCql for Box<T> {
    fn to_cql(&self) -> Result<Value, BindingError> {
        (**self).to_cql()
    }
}

impl ToCql for Value {
    fn to_cql(&self) -> Result<Value, BindingError> {
        Ok(self.clone())
    }
}

/// Types with a lossless, infallible mapping onto a single variant.
macro_rules! copy_to_cql {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl ToCql for $ty {
                fn to_cql(&self) -> Result<Value, BindingError> {
                    Ok(Value::$variant(*self))
                }
            }
        )*
    };
}

copy_to_cql!(
    bool => Boolean,
    i8 => TinyInt,
    i16 => SmallInt,
    i32 => Int,
    i64 => BigInt,
    f32 => Float,
    f64 => Double,
    Uuid => Uuid,
    IpAddr => Inet,
    CqlDate => Date,
    CqlTime => Time,
    CqlTimestamp => Timestamp,
);

/// Integers without an explicit CQL width, bound as `int`.
macro_rules! default_width_to_cql {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ToCql for $ty {
                fn to_cql(&self) -> Result<Value, BindingError> {
                    i32::try_from(*self)
                        .map(Value::Int)
                        .map_err(|_| BindingError::IntegerOutOfRange {
                            value: i128::try_from(*self).unwrap_or(i128::MAX),
                            target: "int",
                        })
                }
            }
        )*
    };
}

default_width_to_cql!(u8, u16, u32, u64, usize, isize);

impl ToCql for str {
    fn to_cql(&self) -> Result<Value, BindingError> {
        Ok(Value::Text(self.to_owned()))
    }
}

impl ToCql for String {
    fn to_cql(&self) -> Result<Value, BindingError> {
        Ok(Value::Text(self.clone()))
    }
}

impl ToCql for [u8] {
    fn to_cql(&self) -> Result<Value, BindingError> {
        Ok(Value::Blob(self.to_vec()))
    }
}

impl ToCql for Ipv4Addr {
    fn to_cql(&self) -> Result<Value, BindingError> {
        Ok(Value::Inet(IpAddr::V4(*self)))
    }
}

impl ToCql for Ipv6Addr {
    fn to_cql(&self) -> Result<Value, BindingError> {
        Ok(Value::Inet(IpAddr::V6(*self)))
    }
}

impl ToCql for TinyInt {
    fn to_cql(&self) -> Result<Value, BindingError> {
        Ok(Value::TinyInt(self.0))
    }
}

impl ToCql for SmallInt {
    fn to_cql(&self) -> Result<Value, BindingError> {
        Ok(Value::SmallInt(self.0))
    }
}

impl ToCql for BigInt {
    fn to_cql(&self) -> Result<Value, BindingError> {
        Ok(Value::BigInt(self.0))
    }
}

impl ToCql for Double {
    fn to_cql(&self) -> Result<Value, BindingError> {
        Ok(Value::Double(self.0))
    }
}

impl ToCql for Counter {
    fn to_cql(&self) -> Result<Value, BindingError> {
        Ok(Value::Counter(self.0))
    }
}

impl ToCql for TimeUuid {
    fn to_cql(&self) -> Result<Value, BindingError> {
        Ok(Value::TimeUuid(self.0))
    }
}

impl ToCql for Blob {
    fn to_cql(&self) -> Result<Value, BindingError> {
        Ok(Value::Blob(self.0.clone()))
    }
}

impl ToCql for Unset {
    fn to_cql(&self) -> Result<Value, BindingError> {
        Ok(Value::Unset)
    }
}

impl<T: ToCql> ToCql for Option<T> {
    fn to_cql(&self) -> Result<Value, BindingError> {
        match self {
            Some(value) => value.to_cql(),
            None => Ok(Value::Null),
        }
    }
}

/// Converts every element of an iterator.
fn collect_values<'a, T, I>(items: I) -> Result<Vec<Value>, BindingError>
where
    T: ToCql + 'a,
    I: IntoIterator<Item = &'a T>,
{
    items.into_iter().map(ToCql::to_cql).collect()
}

/// Converts every entry of a map-like iterator. Later keys overwrite earlier ones.
fn collect_entries<'a, K, V, I>(entries: I) -> Result<Value, BindingError>
where
    K: ToCql + 'a,
    V: ToCql + 'a,
    I: IntoIterator<Item = (&'a K, &'a V)>,
{
    entries
        .into_iter()
        .map(|(key, value)| Ok((key.to_cql()?, value.to_cql()?)))
        .collect::<Result<Vec<_>, BindingError>>()
        .map(Value::map)
}

impl<T: ToCql> ToCql for Vec<T> {
    fn to_cql(&self) -> Result<Value, BindingError> {
        collect_values(self).map(Value::List)
    }
}

impl<T: ToCql, S: BuildHasher> ToCql for HashSet<T, S> {
    fn to_cql(&self) -> Result<Value, BindingError> {
        collect_values(self).map(Value::set)
    }
}

impl<T: ToCql> ToCql for BTreeSet<T> {
    fn to_cql(&self) -> Result<Value, BindingError> {
        collect_values(self).map(Value::set)
    }
}

impl<T: ToCql, S: BuildHasher> ToCql for indexmap::IndexSet<T, S> {
    fn to_cql(&self) -> Result<Value, BindingError> {
        collect_values(self).map(Value::set)
    }
}

impl<K: ToCql, V: ToCql, S: BuildHasher> ToCql for HashMap<K, V, S> {
    fn to_cql(&self) -> Result<Value, BindingError> {
        collect_entries(self)
    }
}

impl<K: ToCql, V: ToCql> ToCql for BTreeMap<K, V> {
    fn to_cql(&self) -> Result<Value, BindingError> {
        collect_entries(self)
    }
}

impl<K: ToCql, V: ToCql, S: BuildHasher> ToCql for indexmap::IndexMap<K, V, S> {
    fn to_cql(&self) -> Result<Value, BindingError> {
        collect_entries(self)
    }
}

impl<C> ToCql for AsList<C>
where
    for<'a> &'a C: IntoIterator<Item: ToCql>,
{
    fn to_cql(&self) -> Result<Value, BindingError> {
        (&self.0)
            .into_iter()
            .map(|item| item.to_cql())
            .collect::<Result<Vec<_>, _>>()
            .map(Value::List)
    }
}

impl<C> ToCql for AsSet<C>
where
    for<'a> &'a C: IntoIterator<Item: ToCql>,
{
    fn to_cql(&self) -> Result<Value, BindingError> {
        (&self.0)
            .into_iter()
            .map(|item| item.to_cql())
            .collect::<Result<Vec<_>, _>>()
            .map(Value::set)
    }
}

/// An ordered list of statement parameters.
///
/// Implemented for tuples of up to twelve [`ToCql`] values (each may have a
/// different type), for `()`, and for vectors, slices and arrays of a single
/// [`ToCql`] type.
pub trait BindValues {
    /// Converts every parameter into a [`Value`], in order.
    ///
    /// # Errors
    ///
    /// Returns the first [`BindingError`] raised by a parameter.
    fn bind_values(&self) -> Result<Vec<Value>, BindingError>;
}

impl BindValues for () {
    fn bind_values(&self) -> Result<Vec<Value>, BindingError> {
        Ok(Vec::new())
    }
}

impl<B: BindValues + ?Sized> BindValues for &B {
    fn bind_values(&self) -> Result<Vec<Value>, BindingError> {
        (**self).bind_values()
    }
}

impl<T: ToCql> BindValues for [T] {
    fn bind_values(&self) -> Result<Vec<Value>, BindingError> {
        collect_values(self)
    }
}

impl<T: ToCql> BindValues for Vec<T> {
    fn bind_values(&self) -> Result<Vec<Value>, BindingError> {
        collect_values(self)
    }
}

impl<T: ToCql, const N: usize> BindValues for [T; N] {
    fn bind_values(&self) -> Result<Vec<Value>, BindingError> {
        collect_values(self)
    }
}

/// Implements [`ToCql`] (as a CQL tuple) and [`BindValues`] (as a parameter list) for a tuple arity.
macro_rules! impl_tuples {
    ($($name:ident : $idx:tt),+) => {
        impl<$($name: ToCql),+> ToCql for ($($name,)+) {
            fn to_cql(&self) -> Result<Value, BindingError> {
                Ok(Value::Tuple(vec![$(self.$idx.to_cql()?),+]))
            }
        }

        impl<$($name: ToCql),+> BindValues for ($($name,)+) {
            fn bind_values(&self) -> Result<Vec<Value>, BindingError> {
                Ok(vec![$(self.$idx.to_cql()?),+])
            }
        }
    };
}

impl_tuples!(A: 0);
impl_tuples!(A: 0, B: 1);
impl_tuples!(A: 0, B: 1, C: 2);
impl_tuples!(A: 0, B: 1, C: 2, D: 3);
impl_tuples!(A: 0, B: 1, C: 2, D: 3, E: 4);
impl_tuples!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);
impl_tuples!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6);
impl_tuples!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7);
impl_tuples!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7, I: 8);
impl_tuples!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7, I: 8, J: 9);
impl_tuples!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7, I: 8, J: 9, K: 10);
impl_tuples!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7, I: 8, J: 9, K: 10, L: 11);

/// A record bound as a CQL user-defined type.
///
/// Only the field values travel on the wire, positionally, so
/// [`dump_udt`](Self::dump_udt) must return exactly one value per entry of
/// [`FIELD_NAMES`](Self::FIELD_NAMES), in the same order. The
/// [`cql_udt!`](crate::cql_udt) macro derives both from a single field list.
pub trait UserDefinedType {
    /// Name of the UDT in the database.
    const TYPE_NAME: &'static str;
    /// Field names in declaration order.
    const FIELD_NAMES: &'static [&'static str];

    /// Converts the fields into values, in declaration order.
    ///
    /// # Errors
    ///
    /// Returns the [`BindingError`] raised by a field.
    fn dump_udt(&self) -> Result<Vec<Value>, BindingError>;
}

/// Converts a [`UserDefinedType`] into a [`Value::Udt`].
///
/// # Errors
///
/// * [`BindingError::UdtFieldCount`] if the record dumps a number of values
///   different from its declared field count.
/// * Any [`BindingError`] raised by a field.
pub fn udt_value<U: UserDefinedType>(record: &U) -> Result<Value, BindingError> {
    let values = record.dump_udt()?;
    if values.len() != U::FIELD_NAMES.len() {
        return Err(BindingError::UdtFieldCount {
            type_name: U::TYPE_NAME.to_owned(),
            expected: U::FIELD_NAMES.len(),
            got: values.len(),
        });
    }
    Ok(Value::udt(U::TYPE_NAME, U::FIELD_NAMES.iter().copied().zip(values)))
}

/// Declares a struct bound as a CQL user-defined type.
///
/// The struct is declared as written and gets [`UserDefinedType`] and
/// [`ToCql`] implementations whose field order is the declaration order.
///
/// ```
/// use scylla_query_rs::{ToCql, UserDefinedType, Value, cql_udt};
///
/// cql_udt! {
///     #[derive(Debug, Clone)]
///     pub struct Address as "address" {
///         pub street: String,
///         pub number: i32,
///     }
/// }
///
/// let address = Address { number: 7, street: "Main".to_owned() };
/// assert_eq!(Address::FIELD_NAMES, &["street", "number"]);
/// assert_eq!(
///     address.to_cql().unwrap(),
///     Value::udt("address", [("street", Value::from("Main")), ("number", Value::Int(7))]),
/// );
/// ```
#[macro_export]
macro_rules! cql_udt {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident as $type_name:literal {
            $($(#[$field_meta:meta])* $field_vis:vis $field:ident : $field_ty:ty),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $($(#[$field_meta])* $field_vis $field: $field_ty,)*
        }

        impl $crate::UserDefinedType for $name {
            const TYPE_NAME: &'static str = $type_name;
            const FIELD_NAMES: &'static [&'static str] = &[$(stringify!($field)),*];

            fn dump_udt(
                &self,
            ) -> ::core::result::Result<::std::vec::Vec<$crate::Value>, $crate::BindingError> {
                ::core::result::Result::Ok(::std::vec![$($crate::ToCql::to_cql(&self.$field)?),*])
            }
        }

        impl $crate::ToCql for $name {
            fn to_cql(&self) -> ::core::result::Result<$crate::Value, $crate::BindingError> {
                $crate::udt_value(self)
            }
        }
    };
}
