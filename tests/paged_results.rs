//! Tests for paged reads through `RowCursor`.
//!
//! This module tests:
//! - Pages fetched on demand, one request per drained page
//! - Paging state and page size forwarded to the session
//! - The explicit cursor API: `has_more_pages`, `advance`, `current_page`
//! - Single-pass semantics: reading after the end is an error
//! - Streams built from the cursor

#![cfg(feature = "testing")]

use futures::TryStreamExt;
use scylla_query_rs::testing::{MockSession, paged_results};
use scylla_query_rs::{
    ColumnSpec, ColumnType, Error, ExecutionProfile, QueryBuilder, Select, SessionExt, Value,
};
use serde::Deserialize;

#[derive(Debug, Deserialize, PartialEq)]
struct Event {
    n: i32,
}

fn session_with(rows: i32, page_size: usize) -> MockSession {
    let specs = vec![ColumnSpec::new("n", ColumnType::Int)];
    let rows: Vec<Vec<Value>> = (0..rows).map(|n| vec![Value::Int(n)]).collect();
    MockSession::new().respond_pages(paged_results(&specs, &rows, page_size).unwrap())
}

fn events() -> Select {
    Select::new("events").with_profile(ExecutionProfile::default().with_page_size(2))
}

#[tokio::test]
async fn test_pages_are_fetched_on_demand() {
    let session = session_with(5, 2);
    let mut cursor = events().execute_paged(&session).await.unwrap();
    assert_eq!(session.requests().len(), 1);

    cursor.next_row().await.unwrap();
    cursor.next_row().await.unwrap();
    assert_eq!(session.requests().len(), 1);

    cursor.next_row().await.unwrap();
    assert_eq!(session.requests().len(), 2);

    let requests = session.requests();
    assert_eq!(requests[0].paging.as_ref().unwrap().page_size, Some(2));
    assert!(requests[0].paging.as_ref().unwrap().paging_state.is_none());
    assert!(requests[1].paging.as_ref().unwrap().paging_state.is_some());
}

#[tokio::test]
async fn test_exhausted_cursor_fails() {
    let session = session_with(3, 2);
    let mut cursor = events().execute_paged(&session).await.unwrap();
    let mut seen = Vec::new();
    while let Some(event) = cursor.next_as::<Event>().await.unwrap() {
        seen.push(event.n);
    }
    assert_eq!(seen, vec![0, 1, 2]);
    assert_eq!(cursor.next_row().await.unwrap_err(), Error::CursorExhausted);
    assert_eq!(cursor.advance().await.unwrap_err(), Error::CursorExhausted);
    assert_eq!(session.requests().len(), 2);
}

#[tokio::test]
async fn test_explicit_page_walk() {
    let session = session_with(5, 2);
    let mut cursor = events().execute_paged(&session).await.unwrap();
    let mut sizes = vec![cursor.current_page().unwrap().len()];
    while cursor.has_more_pages() {
        assert!(cursor.advance().await.unwrap());
        sizes.push(cursor.current_page().unwrap().len());
    }
    assert_eq!(sizes, vec![2, 2, 1]);
    assert!(!cursor.advance().await.unwrap());
}

#[tokio::test]
async fn test_empty_paged_result() {
    let session = session_with(0, 2);
    let mut cursor = events().execute_paged(&session).await.unwrap();
    assert!(!cursor.has_more_pages());
    assert_eq!(cursor.next_row().await.unwrap(), None);
    assert_eq!(cursor.next_row().await.unwrap_err(), Error::CursorExhausted);
}

#[tokio::test]
async fn test_dropping_the_cursor_stops_fetching() {
    let session = session_with(6, 2);
    {
        let mut cursor = events().execute_paged(&session).await.unwrap();
        cursor.next_row().await.unwrap();
    }
    assert_eq!(session.requests().len(), 1);
    assert_eq!(session.pending(), 2);
}

#[tokio::test]
async fn test_streams() {
    let session = session_with(5, 2);
    let events: Vec<Event> = events()
        .execute_paged(&session)
        .await
        .unwrap()
        .as_cls()
        .try_collect()
        .await
        .unwrap();
    assert_eq!(events.len(), 5);
    assert_eq!(events[4], Event { n: 4 });

    let session = session_with(3, 2);
    let cursor = session.query_paged("SELECT n FROM events", ()).await.unwrap();
    let values: Vec<Value> = cursor.scalars().try_collect().await.unwrap();
    assert_eq!(values, vec![Value::Int(0), Value::Int(1), Value::Int(2)]);
}
