//! Materialization of query responses into rows and host values.
//!
//! - [`QueryResult`]: a whole response, already fetched.
//! - [`RowCursor`]: a paged read, fetching one page at a time on demand.

mod cursor;
mod row;

use serde::de::DeserializeOwned;
use uuid::Uuid;

pub use cursor::RowCursor;
pub use row::Row;

use crate::encoding::{Value, from_value};
use crate::errors::{Error, MappingError};
use crate::session::{ColumnSpec, RawResult, RawRow};

/// Name of the column reporting whether a conditional write was applied.
pub const APPLIED_COLUMN: &str = "[applied]";

#[derive(Debug, Clone, PartialEq, Eq)]
/// The response to a statement, with its rows still encoded.
///
/// Rows are decoded on access, so a large result can be scanned with
/// [`as_cls`](Self::as_cls) without materializing every row first.
pub struct QueryResult {
    col_specs: Vec<ColumnSpec>,
    rows: Option<Vec<RawRow>>,
    tracing_id: Option<Uuid>,
    warnings: Vec<String>,
}

impl QueryResult {
    /// Wraps a response returned by the session.
    #[must_use]
    pub fn new(raw: RawResult) -> Self {
        Self {
            col_specs: raw.col_specs,
            rows: raw.rows,
            tracing_id: raw.tracing_id,
            warnings: raw.warnings,
        }
    }

    /// Returns the result columns.
    #[inline]
    #[must_use]
    pub fn column_specs(&self) -> &[ColumnSpec] {
        &self.col_specs
    }

    /// Returns the tracing session id, when tracing was requested.
    #[inline]
    #[must_use]
    pub fn tracing_id(&self) -> Option<Uuid> {
        self.tracing_id
    }

    /// Returns the warnings sent by the server.
    #[inline]
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Returns whether the response carries a rows body.
    #[inline]
    #[must_use]
    pub fn has_rows(&self) -> bool {
        self.rows.is_some()
    }

    /// Returns the number of rows, zero without a rows body.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.as_ref().map_or(0, Vec::len)
    }

    /// Returns whether there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn raw_rows(&self) -> Result<&[RawRow], MappingError> {
        self.rows.as_deref().ok_or(MappingError::NoRows)
    }

    /// Iterates over the rows, decoding each one when reached.
    ///
    /// # Errors
    ///
    /// * `NoRows` - If the response has no rows body.
    pub fn rows(&self) -> Result<impl Iterator<Item = Result<Row, Error>>, Error> {
        let specs = &self.col_specs;
        Ok(self
            .raw_rows()?
            .iter()
            .map(move |raw| Row::decode(specs, raw).map_err(Error::from)))
    }

    /// Decodes every row.
    ///
    /// # Errors
    ///
    /// * `NoRows` - If the response has no rows body.
    /// * `Decode` - If a cell cannot be decoded.
    pub fn all(&self) -> Result<Vec<Row>, Error> {
        self.rows()?.collect()
    }

    /// Decodes every row into a host type.
    ///
    /// # Errors
    ///
    /// * `NoRows` - If the response has no rows body.
    /// * `Decode` - If a cell cannot be decoded.
    /// * `Mapping` - If a row does not fit `T`.
    pub fn all_as<T: DeserializeOwned>(&self) -> Result<Vec<T>, Error> {
        self.as_cls()?.collect()
    }

    /// Iterates over the rows as a host type, decoding each one when reached.
    ///
    /// # Errors
    ///
    /// * `NoRows` - If the response has no rows body.
    pub fn as_cls<T: DeserializeOwned>(
        &self,
    ) -> Result<impl Iterator<Item = Result<T, Error>>, Error> {
        Ok(self
            .rows()?
            .map(|row| row.and_then(|row| Ok(row.deserialize::<T>()?))))
    }

    /// Decodes the first row, `None` when there are no rows.
    ///
    /// # Errors
    ///
    /// * `NoRows` - If the response has no rows body.
    /// * `Decode` - If a cell cannot be decoded.
    pub fn first(&self) -> Result<Option<Row>, Error> {
        self.rows()?.next().transpose()
    }

    /// Decodes the first row into a host type, `None` when there are no rows.
    ///
    /// # Errors
    ///
    /// * `NoRows` - If the response has no rows body.
    /// * `Decode` - If a cell cannot be decoded.
    /// * `Mapping` - If the row does not fit `T`.
    pub fn first_as<T: DeserializeOwned>(&self) -> Result<Option<T>, Error> {
        self.as_cls()?.next().transpose()
    }

    /// Decodes the first column of the first row, `None` when there are no rows.
    ///
    /// # Errors
    ///
    /// * `NoRows` - If the response has no rows body.
    /// * `EmptyRow` - If the result has no columns.
    /// * `Decode` - If the cell cannot be decoded.
    pub fn scalar(&self) -> Result<Option<Value>, Error> {
        match self.raw_rows()?.first() {
            Some(raw) => self.first_cell(raw).map(Some),
            None => Ok(None),
        }
    }

    /// Decodes the first column of the first row into a host type.
    ///
    /// # Errors
    ///
    /// * Any error of [`scalar`](Self::scalar).
    /// * `Mapping` - If the value does not fit `T`.
    pub fn scalar_as<T: DeserializeOwned>(&self) -> Result<Option<T>, Error> {
        Ok(self.scalar()?.map(from_value).transpose()?)
    }

    /// Decodes the first column of every row.
    ///
    /// # Errors
    ///
    /// * Any error of [`scalar`](Self::scalar), for any row.
    pub fn scalars(&self) -> Result<Vec<Value>, Error> {
        self.raw_rows()?
            .iter()
            .map(|raw| self.first_cell(raw))
            .collect()
    }

    /// Decodes the first column of every row into a host type.
    ///
    /// # Errors
    ///
    /// * Any error of [`scalars`](Self::scalars).
    /// * `Mapping` - If a value does not fit `T`.
    pub fn scalars_as<T: DeserializeOwned>(&self) -> Result<Vec<T>, Error> {
        self.raw_rows()?
            .iter()
            .map(|raw| Ok(from_value(self.first_cell(raw)?)?))
            .collect()
    }

    /// Reports whether a conditional write was applied.
    ///
    /// Returns `None` when the response does not carry the `[applied]`
    /// column, as for unconditional statements.
    ///
    /// # Errors
    ///
    /// * `Decode` - If the first row cannot be decoded.
    pub fn was_applied(&self) -> Result<Option<bool>, Error> {
        let Some(row) = self.rows.as_ref().and_then(|rows| rows.first()) else {
            return Ok(None);
        };
        Ok(match Row::decode(&self.col_specs, row)?.get(APPLIED_COLUMN) {
            Some(Value::Boolean(applied)) => Some(*applied),
            _ => None,
        })
    }

    fn first_cell(&self, raw: &RawRow) -> Result<Value, Error> {
        row::decode_first(&self.col_specs, raw)?.ok_or(Error::Mapping(MappingError::EmptyRow))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::ColumnType;
    use crate::session::ColumnSpec;

    fn int_cell(v: i32) -> Option<Vec<u8>> {
        Some(v.to_be_bytes().to_vec())
    }

    fn result(rows: Vec<RawRow>) -> QueryResult {
        QueryResult::new(RawResult::with_rows(
            vec![
                ColumnSpec::new("n", ColumnType::Int),
                ColumnSpec::new("m", ColumnType::Int),
            ],
            rows,
        ))
    }

    #[test]
    fn test_first_on_empty_is_none() {
        let empty = result(Vec::new());
        assert!(empty.is_empty());
        assert_eq!(empty.first().unwrap(), None);
        assert_eq!(empty.scalar().unwrap(), None);
        assert!(empty.all().unwrap().is_empty());
    }

    #[test]
    fn test_void_result_has_no_rows() {
        let void = QueryResult::new(RawResult::void());
        assert_eq!(void.all().unwrap_err(), Error::Mapping(MappingError::NoRows));
        assert_eq!(void.was_applied().unwrap(), None);
        assert_eq!(void.len(), 0);
    }

    #[test]
    fn test_scalars() {
        let result = result(vec![
            vec![int_cell(1), int_cell(10)],
            vec![int_cell(2), int_cell(20)],
        ]);
        assert_eq!(result.scalar_as::<i32>().unwrap(), Some(1));
        assert_eq!(result.scalars_as::<i64>().unwrap(), vec![1, 2]);
        assert_eq!(result.scalars().unwrap(), vec![Value::Int(1), Value::Int(2)]);
    }

    #[test]
    fn test_as_cls_is_lazy() {
        let result = result(vec![
            vec![int_cell(1), int_cell(10)],
            vec![Some(vec![0xff]), int_cell(20)],
        ]);
        let mut rows = result.as_cls::<(i32, i32)>().unwrap();
        // Rows decode as maps, not tuples, so the first one already fails to map.
        assert!(matches!(rows.next(), Some(Err(Error::Mapping(_)))));
        assert!(matches!(rows.next(), Some(Err(Error::Decode(_)))));
        assert!(rows.next().is_none());
    }

    #[test]
    fn test_was_applied() {
        let applied = QueryResult::new(RawResult::with_rows(
            vec![ColumnSpec::new(APPLIED_COLUMN, ColumnType::Boolean)],
            vec![vec![Some(vec![0])]],
        ));
        assert_eq!(applied.was_applied().unwrap(), Some(false));
    }
}
