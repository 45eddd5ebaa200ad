//! Submodule defining statement fragments: a piece of CQL text with its parameters.

use crate::encoding::{BindValues, Value};
use crate::errors::BindingError;

#[derive(Debug, Clone, PartialEq, Eq)]
/// A CQL expression with `?` placeholders and the values bound to them, in order.
///
/// The expression is not validated; it is up to the caller to provide as
/// many values as there are placeholders.
pub struct Fragment {
    /// The expression text.
    expression: String,
    /// Values for the placeholders.
    values: Vec<Value>,
}

impl Fragment {
    /// Creates a new fragment.
    ///
    /// # Arguments
    ///
    /// * `expression` - The CQL expression, e.g. `"id = ?"`.
    /// * `values` - The values of its placeholders, e.g. `(1,)`.
    ///
    /// # Errors
    ///
    /// * `BindingError` - If a value cannot be bound.
    ///
    /// # Example
    ///
    /// ```
    /// use scylla_query_rs::{Fragment, Value};
    ///
    /// let fragment = Fragment::new("id IN (?, ?)", (1, 2)).unwrap();
    /// assert_eq!(fragment.expression(), "id IN (?, ?)");
    /// assert_eq!(fragment.values(), &[Value::Int(1), Value::Int(2)]);
    /// ```
    pub fn new(
        expression: impl Into<String>,
        values: impl BindValues,
    ) -> Result<Self, BindingError> {
        Ok(Self {
            expression: expression.into(),
            values: values.bind_values()?,
        })
    }

    /// Returns the expression text.
    #[inline]
    #[must_use]
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Returns the bound values.
    #[inline]
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Consumes self and returns the expression and its values.
    #[inline]
    #[must_use]
    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.expression, self.values)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// A list of fragments combined with `AND`.
pub struct Fragments {
    items: Vec<Fragment>,
}

impl Fragments {
    /// Creates an empty list.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a fragment.
    #[inline]
    pub fn push(&mut self, fragment: Fragment) {
        self.items.push(fragment);
    }

    /// Returns whether there are no fragments.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of fragments.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Iterates over the fragments in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Fragment> {
        self.items.iter()
    }

    /// Returns the expressions joined with ` AND `.
    #[must_use]
    pub fn text(&self) -> String {
        self.items
            .iter()
            .map(Fragment::expression)
            .collect::<Vec<_>>()
            .join(" AND ")
    }

    /// Iterates over the values of all fragments, in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.items.iter().flat_map(|fragment| fragment.values.iter())
    }
}

impl From<Fragment> for Fragments {
    fn from(fragment: Fragment) -> Self {
        Self {
            items: vec![fragment],
        }
    }
}

impl<'a> IntoIterator for &'a Fragments {
    type Item = &'a Fragment;
    type IntoIter = core::slice::Iter<'a, Fragment>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl FromIterator<Fragment> for Fragments {
    fn from_iter<I: IntoIterator<Item = Fragment>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

/// Joins the non-empty clauses of a statement with single spaces.
pub(crate) fn join_clauses<'a>(clauses: impl IntoIterator<Item = &'a str>) -> String {
    clauses
        .into_iter()
        .filter(|clause| !clause.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
