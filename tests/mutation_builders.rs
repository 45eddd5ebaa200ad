//! Tests for INSERT, UPDATE and DELETE statement generation.
//!
//! This module tests:
//! - Column order and last-write-wins on repeated assignments
//! - Conditional clauses and their mutual exclusion
//! - Parameter order across SET, IF and WHERE clauses
//! - Counter, null and unset bindings

use scylla_query_rs::{
    Counter, Delete, Error, Insert, QueryBuilder, QueryBuilderError, Unset, Update, Value,
};

#[test]
fn test_insert_repeated_set_keeps_one_column() {
    let (text, values) = Insert::new("t")
        .set("x", 1)
        .unwrap()
        .set("x", 2)
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(text, "INSERT INTO t (x) VALUES (?)");
    assert_eq!(values, vec![Value::Int(2)]);
}

#[test]
fn test_insert_if_not_exists() {
    let (text, values) = Insert::new("users")
        .set("id", 1)
        .unwrap()
        .set_null("email")
        .set("nick", Unset)
        .unwrap()
        .if_not_exists()
        .build()
        .unwrap();
    assert_eq!(
        text,
        "INSERT INTO users (id, email, nick) VALUES (?, ?, ?) IF NOT EXISTS"
    );
    assert_eq!(values, vec![Value::Int(1), Value::Null, Value::Unset]);
}

#[test]
fn test_insert_rejects_counters() {
    assert_eq!(
        Insert::new("stats").set("hits", Counter(1)).unwrap_err(),
        Error::QueryBuilder(QueryBuilderError::CounterAssignment("hits".to_owned()))
    );
}

#[test]
fn test_update_values_follow_clause_order() {
    let (text, values) = Update::new("users")
        .r#where("id = ?", (9,))
        .unwrap()
        .if_("name = ?", ("old",))
        .unwrap()
        .set("name", "new")
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(text, "UPDATE users SET name = ? IF name = ? WHERE id = ?");
    assert_eq!(
        values,
        vec![Value::from("new"), Value::from("old"), Value::Int(9)]
    );
}

#[test]
fn test_update_without_where_builds() {
    let (text, _) = Update::new("t").set("a", 1).unwrap().build().unwrap();
    assert_eq!(text, "UPDATE t SET a = ?");
}

#[test]
fn test_update_counter_deltas() {
    let (text, values) = Update::new("stats")
        .inc("views", Counter(3))
        .unwrap()
        .dec("stock", Counter(1))
        .unwrap()
        .r#where("item = ?", ("pen",))
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(
        text,
        "UPDATE stats SET views = views + ?, stock = stock - ? WHERE item = ?"
    );
    assert_eq!(
        values,
        vec![Value::Counter(3), Value::Counter(1), Value::from("pen")]
    );
}

#[test]
fn test_delete_if_exists() {
    let (text, values) = Delete::new("t")
        .r#where("id = ?", [1])
        .unwrap()
        .if_exists()
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(text, "DELETE FROM t IF EXISTS WHERE id = ?");
    assert_eq!(values, vec![Value::Int(1)]);
}

#[test]
fn test_delete_columns_with_condition() {
    let (text, values) = Delete::new("t")
        .cols(["a", "b"])
        .r#where("id = ?", (1,))
        .unwrap()
        .if_("a = ?", (5,))
        .unwrap()
        .timestamp(42)
        .build()
        .unwrap();
    assert_eq!(
        text,
        "DELETE a, b FROM t USING TIMESTAMP 42 IF a = ? WHERE id = ?"
    );
    assert_eq!(values, vec![Value::Int(5), Value::Int(1)]);
}

#[test]
fn test_if_exists_and_custom_condition_conflict() {
    let conflict = Error::QueryBuilder(QueryBuilderError::ConflictingConditions);
    assert_eq!(
        Delete::new("t")
            .if_exists()
            .unwrap()
            .if_("a = ?", (1,))
            .unwrap_err(),
        conflict
    );
    assert_eq!(
        Update::new("t")
            .if_("a = ?", (1,))
            .unwrap()
            .if_exists()
            .unwrap_err(),
        conflict
    );
}

#[test]
fn test_builds_are_repeatable() {
    let insert = Insert::new("t").set("a", 1).unwrap().ttl(10);
    assert_eq!(insert.build().unwrap(), insert.build().unwrap());

    let update = Update::new("t")
        .set("a", 1)
        .unwrap()
        .r#where("id = ?", (2,))
        .unwrap();
    assert_eq!(update.build().unwrap(), update.build().unwrap());

    let delete = Delete::new("t").r#where("id = ?", (3,)).unwrap();
    assert_eq!(delete.build().unwrap(), delete.build().unwrap());
}
