//! Wire decoding fuzzer.
//!
//! Derives a column type from the input, decodes the remaining bytes as a
//! cell of that type, and checks that re-serializing the decoded value
//! decodes to the same value.

use arbitrary::{Arbitrary, Unstructured};
use honggfuzz::fuzz;
use scylla_query_rs::ColumnType;
use scylla_query_rs::testing::check_decode_fixpoint;

fn main() {
    loop {
        fuzz!(|data: &[u8]| {
            let mut input = Unstructured::new(data);
            let Ok(typ) = ColumnType::arbitrary(&mut input) else {
                return;
            };
            check_decode_fixpoint(&typ, input.take_rest());
        });
    }
}
