use std::collections::VecDeque;
use std::sync::Arc;

use crate::value::Value;

/// A read-only, ordered mapping from column name to [`Value`]
///
/// All rows of one result set share the same column specification.
#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl Row {
    pub fn new(columns: Arc<[String]>, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Look a value up by column name
    pub fn get(&self, column: &str) -> Option<&Value> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.values.get(idx)
    }

    /// Look a value up by position
    pub fn at(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A finite, ordered sequence of [`Row`]s produced by the transport
///
/// The sequence is consumed once: iterating yields each row by value and a
/// row handed out is never seen again. Paging, if any, is the transport's
/// concern; a `ResultSet` models the rows as delivered.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct ResultSet {
    columns: Arc<[String]>,
    rows: VecDeque<Row>,
}

impl ResultSet {
    /// Build a result set from a column specification and row values
    ///
    /// Every inner `Vec<Value>` becomes one [`Row`] sharing the column spec.
    pub fn new(
        columns: impl IntoIterator<Item = impl Into<String>>,
        rows: impl IntoIterator<Item = Vec<Value>>,
    ) -> Self {
        let columns: Arc<[String]> = columns.into_iter().map(Into::into).collect();
        let rows = rows
            .into_iter()
            .map(|values| Row::new(Arc::clone(&columns), values))
            .collect();
        Self { columns, rows }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows not yet consumed
    pub fn remaining(&self) -> usize {
        self.rows.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Iterator for ResultSet {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        self.rows.pop_front()
    }
}
