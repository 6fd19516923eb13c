//! Result-set reduction
//!
//! Reduces an already-delivered [`ResultSet`] to the shape the caller
//! declared: at most one row, a scalar, or an existence flag. Reduction only
//! reads the open row sequence; it never re-issues a query. A result set is
//! reduced at most once.

use colonnade_types::{ResultSet, Row, Value};

use crate::error::{Error, Result};

/// How many rows the caller expects the statement to produce
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowExpectation {
    /// Exactly zero or one row; a second row is a cardinality violation
    Single,
    /// The first row, ignoring any others
    First,
}

/// Reduce a result set to zero or one row
///
/// With [`RowExpectation::Single`] the sequence is probed one step past the
/// first row, and a second row fails with
/// [`Error::NotSingleResult`][crate::Error::NotSingleResult] carrying the
/// sequence as it stood. An empty result is `Ok(None)`, not an error.
pub fn single_row(mut rows: ResultSet, expectation: RowExpectation) -> Result<Option<Row>> {
    let Some(first) = rows.next() else {
        return Ok(None);
    };
    if expectation == RowExpectation::Single && rows.next().is_some() {
        return Err(Error::NotSingleResult { result_set: rows });
    }
    Ok(Some(first))
}

/// Reduce a result set to a scalar count
///
/// Reads the first column of the first row as a `bigint`; an empty result
/// counts as zero.
pub fn scalar_i64(rows: ResultSet) -> Result<i64> {
    match single_row(rows, RowExpectation::First)? {
        None => Ok(0),
        Some(row) => row
            .at(0)
            .and_then(Value::as_i64)
            .ok_or(Error::RowConversion {
                index: 0,
                expected: "bigint",
            }),
    }
}

/// Reduce a result set to an existence flag
pub fn exists(rows: ResultSet) -> Result<bool> {
    single_row(rows, RowExpectation::First).map(|row| row.is_some())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn rows(names: &[i64]) -> ResultSet {
        ResultSet::new(
            ["id"],
            names.iter().map(|id| vec![Value::BigInt(*id)]),
        )
    }

    #[test]
    fn empty_result_is_none_in_both_modes() {
        for expectation in [RowExpectation::Single, RowExpectation::First] {
            assert_eq!(single_row(rows(&[]), expectation).unwrap(), None);
        }
    }

    #[test]
    fn one_row_is_returned_in_both_modes() {
        for expectation in [RowExpectation::Single, RowExpectation::First] {
            let row = single_row(rows(&[7]), expectation).unwrap().unwrap();
            assert_eq!(row.get("id").and_then(Value::as_i64), Some(7));
        }
    }

    #[test]
    fn second_row_violates_single_expectation() {
        let err = single_row(rows(&[7, 8, 9]), RowExpectation::Single).unwrap_err();
        match err {
            Error::NotSingleResult { result_set } => {
                // first row and the probed second row were consumed
                assert_eq!(result_set.remaining(), 1);
            }
            other => panic!("expected NotSingleResult, got {other:?}"),
        }
    }

    #[test]
    fn first_expectation_ignores_extra_rows() {
        let row = single_row(rows(&[7, 8, 9]), RowExpectation::First)
            .unwrap()
            .unwrap();
        assert_eq!(row.get("id").and_then(Value::as_i64), Some(7));
    }

    #[test]
    fn scalar_reads_the_first_cell() {
        assert_eq!(scalar_i64(rows(&[42])).unwrap(), 42);
        assert_eq!(scalar_i64(rows(&[])).unwrap(), 0);

        let text = ResultSet::new(["count"], [vec![Value::from("not a number")]]);
        let err = scalar_i64(text).unwrap_err();
        assert!(matches!(
            err,
            Error::RowConversion {
                index: 0,
                expected: "bigint"
            }
        ));
    }

    #[test]
    fn exists_checks_for_any_row() {
        assert!(exists(rows(&[1, 2])).unwrap());
        assert!(!exists(rows(&[])).unwrap());
    }
}
