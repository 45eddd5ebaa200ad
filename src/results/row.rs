//! Submodule defining decoded rows.

use serde::de::DeserializeOwned;
use serde::de::value::MapDeserializer;

use crate::encoding::{IndexMap, Value, deserialize_value};
use crate::errors::{DecodeError, MappingError};
use crate::session::{ColumnSpec, RawRow};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// A decoded row: column names mapped to values, in projection order.
pub struct Row {
    columns: IndexMap<String, Value>,
}

impl Row {
    /// Decodes the cells of a raw row against the result columns.
    ///
    /// # Errors
    ///
    /// * `RowArity` - If the row does not have one cell per column.
    /// * Any other [`DecodeError`] raised by a cell.
    pub fn decode(specs: &[ColumnSpec], raw: &RawRow) -> Result<Self, DecodeError> {
        check_arity(specs, raw)?;
        specs
            .iter()
            .zip(raw)
            .map(|(spec, cell)| Ok((spec.name.clone(), deserialize_value(cell.as_deref(), &spec.typ)?)))
            .collect()
    }

    /// Returns the value of a column.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns.get(column)
    }

    /// Returns the number of columns.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns whether the row has no columns.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Iterates over the column names, in projection order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Iterates over the columns, in projection order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Consumes the row and returns the value of its first column.
    #[must_use]
    pub fn into_first(self) -> Option<Value> {
        self.columns.into_values().next()
    }

    /// Consumes the row and returns its values, in projection order.
    #[must_use]
    pub fn into_values(self) -> Vec<Value> {
        self.columns.into_values().collect()
    }

    /// Deserializes the row into a host type, matching columns to fields by name.
    ///
    /// # Errors
    ///
    /// * `Custom` - If a column is missing or does not fit its field.
    pub fn deserialize<T: DeserializeOwned>(self) -> Result<T, MappingError> {
        let map = MapDeserializer::<_, MappingError>::new(self.columns.into_iter());
        T::deserialize(map)
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Row {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.into_iter()
    }
}

fn check_arity(specs: &[ColumnSpec], raw: &RawRow) -> Result<(), DecodeError> {
    if specs.len() == raw.len() {
        Ok(())
    } else {
        Err(DecodeError::RowArity {
            expected: specs.len(),
            got: raw.len(),
        })
    }
}

/// Decodes only the first cell of a raw row.
pub(crate) fn decode_first(specs: &[ColumnSpec], raw: &RawRow) -> Result<Option<Value>, DecodeError> {
    check_arity(specs, raw)?;
    specs
        .first()
        .zip(raw.first())
        .map(|(spec, cell)| deserialize_value(cell.as_deref(), &spec.typ))
        .transpose()
}
