//! Testing utilities: an in-memory session and codec checks for fuzzing.
//!
//! This module is gated behind the `testing` feature.
//!
//! # Provided helpers
//!
//! - [`MockSession`]: a [`Session`] replaying queued responses and recording requests
//! - [`rows_result`]: encode rows of [`Value`]s into a [`RawResult`]
//! - [`paged_results`]: split rows into the pages a server would return
//! - [`decode_params`]: decode the parameters a statement was executed with
//! - [`check_decode_fixpoint`]: assert that decode, serialize, decode is stable

use std::collections::VecDeque;
use std::future::{Future, ready};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::encoding::wire::{Cell, serialize_cell};
use crate::encoding::{ColumnType, SerializedValues, Value, deserialize_value};
use crate::errors::{BindingError, Error};
use crate::session::{
    Batch, ColumnSpec, PageRequest, PagingState, PreparedStatement, RawResult, RawRow, Session, Statement,
};

/// A request received by a [`MockSession`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    /// The executed statement.
    pub statement: Statement,
    /// Its serialized parameters.
    pub values: SerializedValues,
    /// The page requested, `None` for an unpaged request.
    pub paging: Option<PageRequest>,
}

/// A [`Session`] that replays queued responses in order.
///
/// Every executed statement and batch is recorded. Once the queue is empty,
/// statements and batches answer with [`RawResult::void`].
#[derive(Debug, Default)]
pub struct MockSession {
    responses: Mutex<VecDeque<Result<RawResult, Error>>>,
    requests: Mutex<Vec<RecordedRequest>>,
    batches: Mutex<Vec<Batch>>,
    prepared: Mutex<Vec<String>>,
}

impl MockSession {
    /// Creates a session with no queued responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful response.
    #[must_use]
    pub fn respond(self, result: RawResult) -> Self {
        lock(&self.responses).push_back(Ok(result));
        self
    }

    /// Queues a response for each page.
    #[must_use]
    pub fn respond_pages(self, pages: impl IntoIterator<Item = RawResult>) -> Self {
        lock(&self.responses).extend(pages.into_iter().map(Ok));
        self
    }

    /// Queues a failure.
    #[must_use]
    pub fn respond_with_error(self, error: impl Into<Error>) -> Self {
        lock(&self.responses).push_back(Err(error.into()));
        self
    }

    /// Returns the statements executed so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    /// Returns the batches executed so far.
    #[must_use]
    pub fn batches(&self) -> Vec<Batch> {
        lock(&self.batches).clone()
    }

    /// Returns the texts prepared so far.
    #[must_use]
    pub fn prepared(&self) -> Vec<String> {
        lock(&self.prepared).clone()
    }

    /// Returns the number of queued responses not yet consumed.
    #[must_use]
    pub fn pending(&self) -> usize {
        lock(&self.responses).len()
    }

    fn next_response(&self) -> Result<RawResult, Error> {
        lock(&self.responses)
            .pop_front()
            .unwrap_or_else(|| Ok(RawResult::void()))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Session for MockSession {
    fn execute(
        &self,
        statement: &Statement,
        values: &SerializedValues,
        paging: Option<PageRequest>,
    ) -> impl Future<Output = Result<RawResult, Error>> + Send {
        lock(&self.requests).push(RecordedRequest {
            statement: statement.clone(),
            values: values.clone(),
            paging,
        });
        ready(self.next_response())
    }

    fn prepare(&self, text: &str) -> impl Future<Output = Result<PreparedStatement, Error>> + Send {
        let mut prepared = lock(&self.prepared);
        prepared.push(text.to_owned());
        let id = u32::try_from(prepared.len()).unwrap_or(u32::MAX);
        ready(Ok(PreparedStatement::new(id.to_be_bytes().to_vec(), text)))
    }

    fn batch(&self, batch: &Batch) -> impl Future<Output = Result<RawResult, Error>> + Send {
        lock(&self.batches).push(batch.clone());
        ready(self.next_response())
    }
}

/// Encodes rows of values as a response carrying rows.
///
/// # Errors
///
/// * Any [`BindingError`] raised while serializing a value.
pub fn rows_result(col_specs: Vec<ColumnSpec>, rows: &[Vec<Value>]) -> Result<RawResult, BindingError> {
    let rows = rows
        .iter()
        .map(|row| row.iter().map(serialize_cell).collect::<Result<RawRow, _>>())
        .collect::<Result<Vec<_>, _>>()?;
    Ok(RawResult::with_rows(col_specs, rows))
}

/// Splits rows into pages of `page_size` rows, each but the last carrying a
/// paging state.
///
/// Zero rows still produce one empty page.
///
/// # Errors
///
/// * Any [`BindingError`] raised while serializing a value.
pub fn paged_results(
    col_specs: &[ColumnSpec],
    rows: &[Vec<Value>],
    page_size: usize,
) -> Result<Vec<RawResult>, BindingError> {
    let chunks: Vec<&[Vec<Value>]> = if rows.is_empty() {
        vec![rows]
    } else {
        rows.chunks(page_size.max(1)).collect()
    };
    let last = chunks.len() - 1;
    chunks
        .into_iter()
        .enumerate()
        .map(|(page, chunk)| {
            let result = rows_result(col_specs.to_vec(), chunk)?;
            Ok(if page == last {
                result
            } else {
                result.with_paging_state(PagingState::new(page.to_be_bytes().to_vec()))
            })
        })
        .collect()
}

/// Decodes serialized parameters against their expected types.
///
/// `Unset` cells decode to [`Value::Unset`].
///
/// # Panics
///
/// Panics if the parameters do not decode as `types`.
#[must_use]
pub fn decode_params(values: &SerializedValues, types: &[ColumnType]) -> Vec<Value> {
    assert_eq!(values.len(), types.len(), "parameter count mismatch");
    values
        .cells()
        .zip(types)
        .map(|(cell, typ)| match cell {
            Cell::Null => Value::Null,
            Cell::Unset => Value::Unset,
            Cell::Bytes(bytes) => deserialize_value(Some(bytes), typ).unwrap(),
        })
        .collect()
}

/// Checks that any bytes decoding as `typ` decode to the same value after a
/// serialize round trip.
///
/// # Panics
///
/// Panics if the decoded value cannot be serialized, or decodes differently
/// once serialized.
pub fn check_decode_fixpoint(typ: &ColumnType, bytes: &[u8]) {
    let Ok(value) = deserialize_value(Some(bytes), typ) else {
        return;
    };
    let cell = serialize_cell(&value).unwrap();
    let again = deserialize_value(cell.as_deref(), typ).unwrap();
    assert_eq!(value, again, "decoding {typ} is not stable");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paged_results_chain_states() {
        let specs = vec![ColumnSpec::new("n", ColumnType::Int)];
        let rows: Vec<Vec<Value>> = (0..5).map(|n| vec![Value::Int(n)]).collect();
        let pages = paged_results(&specs, &rows, 2).unwrap();
        assert_eq!(pages.len(), 3);
        assert!(pages[0].paging_state.is_some());
        assert!(pages[1].paging_state.is_some());
        assert!(pages[2].paging_state.is_none());
        assert_eq!(pages[2].rows.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn test_fixpoint_on_nested_types() {
        let typ = ColumnType::map(ColumnType::Text, ColumnType::list(ColumnType::Int));
        let value = Value::map([(
            Value::from("a"),
            Value::list([Value::Int(1), Value::Null]),
        )]);
        let bytes = serialize_cell(&value).unwrap().unwrap();
        check_decode_fixpoint(&typ, &bytes);
        check_decode_fixpoint(&typ, &[0xff]);
    }
}
