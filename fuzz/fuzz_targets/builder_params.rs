//! Statement parameter fuzzer.
//!
//! Builds a SELECT from arbitrary WHERE fragments and checks that the
//! statement has one parameter per placeholder, in fragment order.

use arbitrary::Arbitrary;
use honggfuzz::fuzz;
use scylla_query_rs::{Fragment, QueryBuilder, Select, Value};

#[derive(Debug, Arbitrary)]
struct Condition {
    column: u8,
    values: Vec<i32>,
}

fn main() {
    loop {
        fuzz!(|conditions: Vec<Condition>| {
            let mut select = Select::new("t");
            let mut expected = Vec::new();
            for condition in &conditions {
                let placeholders = vec!["?"; condition.values.len()].join(", ");
                let fragment = Fragment::new(
                    format!("c{} IN ({placeholders})", condition.column),
                    condition.values.clone(),
                )
                .unwrap();
                expected.extend(condition.values.iter().copied().map(Value::Int));
                select = select.where_fragment(fragment);
            }
            let (text, values) = select.build().unwrap();
            assert_eq!(text.matches('?').count(), values.len());
            assert_eq!(values, expected);
            assert_eq!(select.build().unwrap(), (text, values));
        });
    }
}
