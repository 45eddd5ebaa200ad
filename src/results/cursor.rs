//! Submodule defining the paged row cursor.

use std::collections::VecDeque;

use futures::stream::{self, Stream, TryStreamExt};
use serde::de::DeserializeOwned;
use tracing::trace;

use super::Row;
use super::row::decode_first;
use crate::encoding::{SerializedValues, Value, from_value};
use crate::errors::{Error, MappingError};
use crate::session::{ColumnSpec, PageRequest, PagingState, RawResult, RawRow, Session, Statement};

/// A paged read: rows are fetched from the session one page at a time.
///
/// The cursor holds the rows of the current page and the paging state of
/// the next one. [`next_row`](Self::next_row) drains the buffered page and
/// fetches the following page only once the buffer is empty. After the last
/// row has been returned, the cursor reports its end once with `Ok(None)`;
/// any later read fails with [`Error::CursorExhausted`].
pub struct RowCursor<'s, S> {
    session: &'s S,
    statement: Statement,
    values: SerializedValues,
    page_size: Option<i32>,
    col_specs: Vec<ColumnSpec>,
    buffer: VecDeque<RawRow>,
    paging_state: Option<PagingState>,
    finished: bool,
}

impl<S> core::fmt::Debug for RowCursor<'_, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RowCursor")
            .field("statement", &self.statement)
            .field("page_size", &self.page_size)
            .field("buffered", &self.buffer.len())
            .field("paging_state", &self.paging_state)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

impl<'s, S: Session> RowCursor<'s, S> {
    /// Fetches the first page of `statement`.
    pub(crate) async fn open(
        session: &'s S,
        statement: Statement,
        values: SerializedValues,
    ) -> Result<Self, Error> {
        let page_size = statement.profile().and_then(|profile| profile.page_size);
        let mut cursor = Self {
            session,
            statement,
            values,
            page_size,
            col_specs: Vec::new(),
            buffer: VecDeque::new(),
            paging_state: None,
            finished: false,
        };
        cursor.fetch_page().await?;
        Ok(cursor)
    }

    async fn fetch_page(&mut self) -> Result<(), Error> {
        let request = PageRequest {
            page_size: self.page_size,
            paging_state: self.paging_state.clone(),
        };
        trace!(
            statement = self.statement.text(),
            resumed = request.paging_state.is_some(),
            "fetching page"
        );
        let raw = self
            .session
            .execute(&self.statement, &self.values, Some(request))
            .await?;
        self.absorb(raw);
        Ok(())
    }

    fn absorb(&mut self, raw: RawResult) {
        if !raw.col_specs.is_empty() {
            self.col_specs = raw.col_specs;
        }
        self.buffer = raw.rows.unwrap_or_default().into();
        self.paging_state = raw.paging_state;
    }

    fn ensure_open(&self) -> Result<(), Error> {
        if self.finished {
            Err(Error::CursorExhausted)
        } else {
            Ok(())
        }
    }

    /// Returns the result columns.
    #[inline]
    #[must_use]
    pub fn column_specs(&self) -> &[ColumnSpec] {
        &self.col_specs
    }

    /// Returns whether the server announced another page.
    #[inline]
    #[must_use]
    pub fn has_more_pages(&self) -> bool {
        self.paging_state.is_some()
    }

    /// Returns the paging state of the next page, if any.
    #[inline]
    #[must_use]
    pub fn paging_state(&self) -> Option<&PagingState> {
        self.paging_state.as_ref()
    }

    /// Decodes the rows of the current page not yet returned.
    ///
    /// # Errors
    ///
    /// * `Decode` - If a cell cannot be decoded.
    pub fn current_page(&self) -> Result<Vec<Row>, Error> {
        self.buffer
            .iter()
            .map(|raw| Ok(Row::decode(&self.col_specs, raw)?))
            .collect()
    }

    /// Replaces the current page with the next one.
    ///
    /// Returns `false`, leaving the buffer untouched, when there is no next
    /// page.
    ///
    /// # Errors
    ///
    /// * `CursorExhausted` - If the cursor already reported its end.
    /// * Any error reported by the session.
    pub async fn advance(&mut self) -> Result<bool, Error> {
        self.ensure_open()?;
        if self.paging_state.is_none() {
            return Ok(false);
        }
        self.fetch_page().await?;
        Ok(true)
    }

    async fn next_raw(&mut self) -> Result<Option<RawRow>, Error> {
        self.ensure_open()?;
        loop {
            if let Some(raw) = self.buffer.pop_front() {
                return Ok(Some(raw));
            }
            if self.paging_state.is_none() {
                self.finished = true;
                return Ok(None);
            }
            // A page may come back empty while the server still holds rows.
            self.fetch_page().await?;
        }
    }

    /// Returns the next row, fetching the next page when the current one is drained.
    ///
    /// # Errors
    ///
    /// * `CursorExhausted` - If the cursor already reported its end.
    /// * `Decode` - If a cell cannot be decoded.
    /// * Any error reported by the session.
    pub async fn next_row(&mut self) -> Result<Option<Row>, Error> {
        match self.next_raw().await? {
            Some(raw) => Ok(Some(Row::decode(&self.col_specs, &raw)?)),
            None => Ok(None),
        }
    }

    /// Returns the next row as a host type.
    ///
    /// # Errors
    ///
    /// * Any error of [`next_row`](Self::next_row).
    /// * `Mapping` - If the row does not fit `T`.
    pub async fn next_as<T: DeserializeOwned>(&mut self) -> Result<Option<T>, Error> {
        match self.next_row().await? {
            Some(row) => Ok(Some(row.deserialize()?)),
            None => Ok(None),
        }
    }

    /// Returns the first column of the next row.
    ///
    /// # Errors
    ///
    /// * Any error of [`next_row`](Self::next_row).
    /// * `EmptyRow` - If the result has no columns.
    pub async fn next_scalar(&mut self) -> Result<Option<Value>, Error> {
        match self.next_raw().await? {
            Some(raw) => Ok(Some(
                decode_first(&self.col_specs, &raw)?.ok_or(MappingError::EmptyRow)?,
            )),
            None => Ok(None),
        }
    }

    /// Returns the first column of the next row as a host type.
    ///
    /// # Errors
    ///
    /// * Any error of [`next_scalar`](Self::next_scalar).
    /// * `Mapping` - If the value does not fit `T`.
    pub async fn next_scalar_as<T: DeserializeOwned>(&mut self) -> Result<Option<T>, Error> {
        Ok(self.next_scalar().await?.map(from_value).transpose()?)
    }

    /// Turns the cursor into a stream of rows.
    pub fn into_stream(self) -> impl Stream<Item = Result<Row, Error>> {
        stream::try_unfold(self, |mut cursor| async move {
            Ok(cursor.next_row().await?.map(|row| (row, cursor)))
        })
    }

    /// Turns the cursor into a stream of host values, one per row.
    pub fn as_cls<T: DeserializeOwned>(self) -> impl Stream<Item = Result<T, Error>> {
        self.into_stream()
            .and_then(|row| async move { Ok(row.deserialize::<T>()?) })
    }

    /// Turns the cursor into a stream of the first column of every row.
    pub fn scalars(self) -> impl Stream<Item = Result<Value, Error>> {
        stream::try_unfold(self, |mut cursor| async move {
            Ok(cursor.next_scalar().await?.map(|value| (value, cursor)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::ColumnType;
    use crate::session::{Batch, PreparedStatement};
    use std::sync::Mutex;

    /// Serves `total` integer rows, `per_page` at a time.
    struct Pages {
        total: i32,
        per_page: i32,
        requests: Mutex<Vec<Option<PageRequest>>>,
    }

    impl Pages {
        fn new(total: i32, per_page: i32) -> Self {
            Self {
                total,
                per_page,
                requests: Mutex::new(Vec::new()),
            }
        }

        fn page(&self, request: Option<&PageRequest>) -> RawResult {
            let start = request
                .and_then(|r| r.paging_state.as_ref())
                .map_or(0, |state| i32::from_be_bytes(state.as_bytes().try_into().unwrap()));
            let end = (start + self.per_page).min(self.total);
            let rows = (start..end)
                .map(|n| vec![Some(n.to_be_bytes().to_vec())])
                .collect();
            let result = RawResult::with_rows(vec![ColumnSpec::new("n", ColumnType::Int)], rows);
            if end < self.total {
                result.with_paging_state(PagingState::new(end.to_be_bytes().to_vec()))
            } else {
                result
            }
        }
    }

    impl Session for Pages {
        async fn execute(
            &self,
            _statement: &Statement,
            _values: &SerializedValues,
            paging: Option<PageRequest>,
        ) -> Result<RawResult, Error> {
            let result = self.page(paging.as_ref());
            self.requests.lock().unwrap().push(paging);
            Ok(result)
        }

        async fn prepare(&self, text: &str) -> Result<PreparedStatement, Error> {
            Ok(PreparedStatement::new(Vec::new(), text))
        }

        async fn batch(&self, _batch: &Batch) -> Result<RawResult, Error> {
            Ok(RawResult::void())
        }
    }

    async fn open(session: &Pages) -> RowCursor<'_, Pages> {
        RowCursor::open(session, Statement::from("SELECT n FROM t"), SerializedValues::new())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_pages_are_fetched_lazily() {
        let session = Pages::new(5, 2);
        let mut cursor = open(&session).await;
        assert_eq!(session.requests.lock().unwrap().len(), 1);

        let mut seen = Vec::new();
        while let Some(n) = cursor.next_scalar_as::<i32>().await.unwrap() {
            seen.push(n);
        }
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
        assert_eq!(session.requests.lock().unwrap().len(), 3);
        assert_eq!(cursor.next_row().await.unwrap_err(), Error::CursorExhausted);
    }

    #[tokio::test]
    async fn test_advance_replaces_the_page() {
        let session = Pages::new(3, 2);
        let mut cursor = open(&session).await;
        assert_eq!(cursor.current_page().unwrap().len(), 2);
        assert!(cursor.has_more_pages());
        assert!(cursor.advance().await.unwrap());
        assert_eq!(cursor.current_page().unwrap().len(), 1);
        assert!(!cursor.advance().await.unwrap());
    }

    #[tokio::test]
    async fn test_stream_collects_every_row() {
        let session = Pages::new(4, 3);
        let values: Vec<Value> = open(&session).await.scalars().try_collect().await.unwrap();
        assert_eq!(values, (0..4).map(Value::Int).collect::<Vec<_>>());
    }
}
