//! Builders for CQL statements.
//!
//! Each builder accumulates clauses through consuming setters and renders
//! the statement text with `?` placeholders plus the parameters in
//! placeholder order, through [`QueryBuilder::build`].

mod clauses;
mod delete_query;
mod fragment;
mod insert_query;
mod query_builder;
mod select_query;
mod update_query;

pub use clauses::Order;
pub use delete_query::Delete;
pub use fragment::{Fragment, Fragments};
pub use insert_query::Insert;
pub use query_builder::QueryBuilder;
pub use select_query::Select;
pub use update_query::Update;
