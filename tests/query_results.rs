//! Tests for executing builders against a session and materializing results.
//!
//! This module tests:
//! - Statements and parameters reaching the session unchanged
//! - `all`, `first`, `scalar`, `scalars` and `as_cls` on fetched rows
//! - Zero-row results and conditional writes that were not applied
//! - Database errors surfacing unchanged

#![cfg(feature = "testing")]

use scylla_query_rs::testing::{MockSession, decode_params, rows_result};
use scylla_query_rs::{
    Batch, BatchType, ColumnSpec, ColumnType, Consistency, DatabaseError, Error,
    ExecutionProfile, Insert, QueryBuilder, RawResult, Select, SessionExt, Statement, Update,
    Value,
};
use serde::Deserialize;

#[derive(Debug, Deserialize, PartialEq)]
struct User {
    id: i32,
    name: String,
}

fn users() -> RawResult {
    rows_result(
        vec![
            ColumnSpec::new("id", ColumnType::Int),
            ColumnSpec::new("name", ColumnType::Text),
        ],
        &[
            vec![Value::Int(1), Value::from("Ada")],
            vec![Value::Int(2), Value::from("Bob")],
        ],
    )
    .unwrap()
}

#[tokio::test]
async fn test_execute_sends_text_values_and_profile() {
    let session = MockSession::new();
    let profile = ExecutionProfile::default().with_consistency(Consistency::Quorum);
    Insert::new("users")
        .set("id", 3)
        .unwrap()
        .set("name", "Cy")
        .unwrap()
        .with_profile(profile.clone())
        .execute(&session)
        .await
        .unwrap();

    let requests = session.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(
        request.statement.text(),
        "INSERT INTO users (id, name) VALUES (?, ?)"
    );
    assert_eq!(request.statement.profile(), Some(&profile));
    assert_eq!(request.paging, None);
    assert_eq!(
        decode_params(&request.values, &[ColumnType::Int, ColumnType::Text]),
        vec![Value::Int(3), Value::from("Cy")]
    );
}

#[tokio::test]
async fn test_materializers() {
    let session = MockSession::new().respond(users());
    let result = Select::new("users").execute(&session).await.unwrap();

    assert_eq!(result.len(), 2);
    let rows = result.all().unwrap();
    assert_eq!(rows[1].get("name"), Some(&Value::from("Bob")));
    assert_eq!(
        result.first_as::<User>().unwrap(),
        Some(User {
            id: 1,
            name: "Ada".to_owned()
        })
    );
    assert_eq!(result.scalar().unwrap(), Some(Value::Int(1)));
    assert_eq!(result.scalars_as::<i32>().unwrap(), vec![1, 2]);
    let names: Vec<String> = result
        .as_cls::<User>()
        .unwrap()
        .map(|user| user.unwrap().name)
        .collect();
    assert_eq!(names, vec!["Ada", "Bob"]);
}

#[tokio::test]
async fn test_zero_rows() {
    let empty = rows_result(vec![ColumnSpec::new("id", ColumnType::Int)], &[]).unwrap();
    let session = MockSession::new().respond(empty);
    let result = Select::new("users")
        .r#where("id = ?", (404,))
        .unwrap()
        .execute(&session)
        .await
        .unwrap();
    assert_eq!(result.first().unwrap(), None);
    assert_eq!(result.first_as::<User>().unwrap(), None);
    assert!(result.all().unwrap().is_empty());
    assert!(result.scalars().unwrap().is_empty());
}

#[tokio::test]
async fn test_conditional_write_not_applied_is_not_an_error() {
    let rejected = rows_result(
        vec![
            ColumnSpec::new("[applied]", ColumnType::Boolean),
            ColumnSpec::new("name", ColumnType::Text),
        ],
        &[vec![Value::Boolean(false), Value::from("Ada")]],
    )
    .unwrap();
    let session = MockSession::new().respond(rejected);
    let result = Update::new("users")
        .set("name", "Bob")
        .unwrap()
        .if_("name = ?", ("Eve",))
        .unwrap()
        .r#where("id = ?", (1,))
        .unwrap()
        .execute(&session)
        .await
        .unwrap();
    assert_eq!(result.was_applied().unwrap(), Some(false));
}

#[tokio::test]
async fn test_database_errors_surface_unchanged() {
    let error = DatabaseError::new(DatabaseError::INVALID, "Expected 4 or 0 byte int (8)");
    let session = MockSession::new().respond_with_error(error.clone());
    let err = Update::new("t")
        .set("a", 1i64)
        .unwrap()
        .r#where("id = ?", (1,))
        .unwrap()
        .execute(&session)
        .await
        .unwrap_err();
    assert_eq!(err, Error::Database(error));
}

#[tokio::test]
async fn test_builder_errors_never_reach_the_session() {
    let session = MockSession::new();
    assert!(Insert::new("t").execute(&session).await.is_err());
    assert!(session.requests().is_empty());
}

#[tokio::test]
async fn test_batch_and_raw_queries() {
    let session = MockSession::new().respond(users());
    let result = session
        .query("SELECT id, name FROM users WHERE id IN ?", (vec![1, 2],))
        .await
        .unwrap();
    assert_eq!(result.len(), 2);

    let mut batch = Batch::new(BatchType::Logged);
    Insert::new("t")
        .set("a", 1)
        .unwrap()
        .add_to_batch(&mut batch)
        .unwrap();
    batch
        .add_statement(Statement::from("DELETE FROM t WHERE a = ?"), (2,))
        .unwrap();
    session.run_batch(&batch).await.unwrap();

    let batches = session.batches();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].len(), 2);
    assert_eq!(batches[0].batch_type(), BatchType::Logged);
}

#[tokio::test]
async fn test_prepared_statements() {
    let session = MockSession::new().respond(users());
    let prepared = session
        .prepare_statement("SELECT id, name FROM users")
        .await
        .unwrap();
    let result = session.query(prepared.clone(), ()).await.unwrap();
    assert_eq!(result.len(), 2);
    assert_eq!(session.prepared(), vec!["SELECT id, name FROM users"]);
    assert_eq!(
        session.requests()[0].statement,
        Statement::Prepared(prepared)
    );
}
