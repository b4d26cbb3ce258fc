//! Predicate builders for in-memory filtration.
//!
//! Note the deliberate asymmetry: a blank substring term selects everything,
//! a blank equality value selects nothing.

use crate::field::Accessor;
use crate::params::RangeFilterValues;

/// Boxed row predicate.
pub type Predicate<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

/// Case-insensitive "field contains term". Blank `term` matches every row.
#[must_use]
pub fn contains<T: 'static>(accessor: Accessor<T>, term: &str) -> Predicate<T> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return Box::new(|_| true);
    }
    Box::new(move |row| accessor(row).as_text().to_lowercase().contains(&term))
}

/// Case-insensitive "field equals value". Blank `value` matches no row.
#[must_use]
pub fn equals_ignore_case<T: 'static>(accessor: Accessor<T>, value: &str) -> Predicate<T> {
    let value = value.trim().to_lowercase();
    if value.is_empty() {
        return Box::new(|_| false);
    }
    Box::new(move |row| accessor(row).as_text().to_lowercase() == value)
}

/// Integer field within `range` (inclusive). Non-integer values never match.
#[must_use]
pub fn in_range<T: 'static>(accessor: Accessor<T>, range: RangeFilterValues) -> Predicate<T> {
    Box::new(move |row| accessor(row).as_i64().is_some_and(|v| range.contains(v)))
}
