//! Accumulated in-memory ordering.
//!
//! The first key added becomes the primary sort, later keys break ties
//! ("then by"). All keys are applied in a single stable sort, so rows that
//! compare equal on every key keep their input order.

use std::cmp::Ordering;
use std::fmt;

use crate::field::FieldMap;
use crate::{Error, SortDir};

type Comparator<T> = Box<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

#[must_use]
pub struct SortKeys<T> {
    keys: Vec<Comparator<T>>,
}

impl<T> Default for SortKeys<T> {
    fn default() -> Self {
        Self { keys: Vec::new() }
    }
}

impl<T> fmt::Debug for SortKeys<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortKeys")
            .field("keys", &self.keys.len())
            .finish()
    }
}

impl<T: 'static> SortKeys<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` once a primary key has been added.
    #[must_use]
    pub fn is_ordered(&self) -> bool {
        !self.keys.is_empty()
    }

    /// Add an ordering by the registered field `name`.
    ///
    /// A blank name leaves the keys untouched.
    ///
    /// # Errors
    /// Returns [`Error::UnknownOrderColumn`] if `name` is not registered.
    pub fn order_by(self, fields: &FieldMap<T>, name: &str, dir: SortDir) -> Result<Self, Error> {
        if name.trim().is_empty() {
            return Ok(self);
        }
        let accessor = fields.order_accessor(name)?;
        Ok(self.by(move |a, b| accessor(a).natural_cmp(&accessor(b)), dir))
    }

    /// Add a custom comparator, e.g. a case-insensitive override.
    pub fn by<F>(mut self, cmp: F, dir: SortDir) -> Self
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        self.keys.push(Box::new(move |a, b| dir.apply(cmp(a, b))));
        self
    }

    /// Sort `items` by all accumulated keys.
    #[must_use]
    pub fn apply(&self, mut items: Vec<T>) -> Vec<T> {
        if self.keys.is_empty() {
            return items;
        }
        items.sort_by(|a, b| {
            self.keys
                .iter()
                .map(|key| key(a, b))
                .find(|o| o.is_ne())
                .unwrap_or(Ordering::Equal)
        });
        items
    }
}

/// Order `items` by a single registered field.
///
/// # Errors
/// Returns [`Error::UnknownOrderColumn`] if `name` is not registered.
pub fn order_by<T: 'static>(
    items: Vec<T>,
    fields: &FieldMap<T>,
    name: &str,
    dir: SortDir,
) -> Result<Vec<T>, Error> {
    Ok(SortKeys::new().order_by(fields, name, dir)?.apply(items))
}
