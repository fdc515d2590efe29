//! Stable ordering and top-N selection shared by every ranking.

use std::cmp::Ordering;

use summit_common::{Attribute, Direction, ResortTable};
use tracing::warn;

use crate::error::{RankerError, Result};

/// Extract one attribute column, rejecting holes and non-finite values.
pub(crate) fn attribute_column(table: &ResortTable, attribute: Attribute) -> Result<Vec<f64>> {
    let mut values = Vec::with_capacity(table.len());
    for row in table.rows() {
        let value = row
            .value(attribute)
            .ok_or(RankerError::MissingAttribute { attribute })?;
        if !value.is_finite() {
            return Err(RankerError::NonFiniteValue { attribute, id: row.id, value });
        }
        values.push(value);
    }
    Ok(values)
}

/// Indices of `values` in ranked order.
///
/// The sort is stable: equal values keep their input order, so rank
/// positions are always dense and distinct.
pub(crate) fn stable_order(values: &[f64], direction: Direction) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..values.len()).collect();
    match direction {
        Direction::Ascending => indices.sort_by(|&a, &b| {
            values[a].partial_cmp(&values[b]).unwrap_or(Ordering::Equal)
        }),
        Direction::Descending => indices.sort_by(|&a, &b| {
            values[b].partial_cmp(&values[a]).unwrap_or(Ordering::Equal)
        }),
    }
    indices
}

/// The leading entries of a ranking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopN<'a, T> {
    pub entries: &'a [T],
    /// The count the caller asked for.
    pub requested: usize,
    /// True when `requested` exceeded the ranking size and was clamped.
    pub clamped: bool,
}

impl<'a, T> TopN<'a, T> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'a, T> {
        self.entries.iter()
    }
}

/// First `n` entries of a ranking; `n` larger than the ranking is clamped
/// with a warning, `n == 0` is an error.
pub(crate) fn take_top<'a, T>(entries: &'a [T], n: usize, label: &str) -> Result<TopN<'a, T>> {
    if entries.is_empty() {
        return Err(RankerError::EmptyRanking);
    }
    if n < 1 {
        return Err(RankerError::InvalidCount { n });
    }
    let clamped = n > entries.len();
    if clamped {
        warn!(
            requested = n,
            available = entries.len(),
            "Top-{n} requested from {label} ranking with only {} resorts; returning all",
            entries.len()
        );
    }
    Ok(TopN {
        entries: &entries[..n.min(entries.len())],
        requested: n,
        clamped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stable_order_keeps_ties_in_input_order() {
        let values = [2.0, 5.0, 2.0, 5.0, 1.0];
        assert_eq!(stable_order(&values, Direction::Descending), vec![1, 3, 0, 2, 4]);
        assert_eq!(stable_order(&values, Direction::Ascending), vec![4, 0, 2, 1, 3]);
    }

    #[test]
    fn test_take_top_clamps() {
        let entries = [1, 2, 3];
        let top = take_top(&entries, 10, "test").unwrap();
        assert_eq!(top.entries, &[1, 2, 3]);
        assert!(top.clamped);
        assert_eq!(top.requested, 10);

        let top = take_top(&entries, 2, "test").unwrap();
        assert_eq!(top.entries, &[1, 2]);
        assert!(!top.clamped);
    }

    #[test]
    fn test_take_top_rejects_zero_and_empty() {
        let entries = [1, 2, 3];
        assert_eq!(take_top(&entries, 0, "test").unwrap_err(), RankerError::InvalidCount { n: 0 });

        let empty: [i32; 0] = [];
        assert_eq!(take_top(&empty, 3, "test").unwrap_err(), RankerError::EmptyRanking);
    }
}
