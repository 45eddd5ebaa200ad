//! Tests for user-defined type binding and decoding.
//!
//! This module tests:
//! - Positional dumping in declaration order
//! - Nested UDTs, in both directions
//! - Field count mismatches raising binding errors

use scylla_query_rs::encoding::deserialize_value;
use scylla_query_rs::encoding::wire::serialize_cell;
use scylla_query_rs::{
    BindingError, ColumnType, QueryBuilder, ToCql, Update, UserDefinedType, Value, cql_udt,
    from_value, udt_value,
};
use serde::Deserialize;

cql_udt! {
    /// A postal address.
    #[derive(Debug, Clone, PartialEq, Deserialize)]
    pub struct Address as "address" {
        /// Street name.
        pub street: String,
        /// Postal code, unknown for some addresses.
        pub zip: Option<i32>,
    }
}

cql_udt! {
    /// A person with a nested address.
    #[derive(Debug, Clone, PartialEq, Deserialize)]
    pub struct Person as "person" {
        /// Identifier.
        pub id: i32,
        /// Display name.
        pub name: String,
        /// Home address.
        pub home: Address,
    }
}

fn person_type() -> ColumnType {
    let address = ColumnType::udt(
        "ks",
        "address",
        [("street", ColumnType::Text), ("zip", ColumnType::Int)],
    );
    ColumnType::udt(
        "ks",
        "person",
        [
            ("id", ColumnType::Int),
            ("name", ColumnType::Text),
            ("home", address),
        ],
    )
}

fn ada() -> Person {
    Person {
        name: "Ada".to_owned(),
        home: Address {
            zip: None,
            street: "Main".to_owned(),
        },
        id: 1,
    }
}

#[test]
fn test_fields_dump_in_declaration_order() {
    assert_eq!(
        ada().dump_udt().unwrap(),
        vec![
            Value::Int(1),
            Value::from("Ada"),
            Value::udt(
                "address",
                [("street", Value::from("Main")), ("zip", Value::Null)]
            ),
        ]
    );
    assert_eq!(Person::FIELD_NAMES, &["id", "name", "home"]);
}

#[test]
fn test_nested_udt_round_trip() {
    let value = ada().to_cql().unwrap();
    let cell = serialize_cell(&value).unwrap();
    let decoded = deserialize_value(cell.as_deref(), &person_type()).unwrap();
    assert_eq!(decoded, value);
    assert_eq!(from_value::<Person>(decoded).unwrap(), ada());
}

#[test]
fn test_udt_bound_as_parameter() {
    let (_, values) = Update::new("people")
        .set("home", ada().home)
        .unwrap()
        .r#where("id = ?", (1,))
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(values[0].type_name(), "udt");
}

struct Truncated;

impl UserDefinedType for Truncated {
    const TYPE_NAME: &'static str = "pair";
    const FIELD_NAMES: &'static [&'static str] = &["a", "b"];

    fn dump_udt(&self) -> Result<Vec<Value>, BindingError> {
        Ok(vec![Value::Int(1)])
    }
}

#[test]
fn test_field_count_mismatch() {
    assert_eq!(
        udt_value(&Truncated).unwrap_err(),
        BindingError::UdtFieldCount {
            type_name: "pair".to_owned(),
            expected: 2,
            got: 1,
        }
    );
}
