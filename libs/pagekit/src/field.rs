//! Statically registered field accessors for in-memory paging.
//!
//! A [`FieldMap`] replaces runtime reflection: every output-field name a client
//! may filter or order by is registered once with a typed accessor and the
//! match semantics its filter uses. Lookups are by exact name, as produced by
//! the resolver normalization (`vendorName` -> `VendorName`).

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};

use crate::params::ColumnFilter;
use crate::pipeline::PageHooks;
use crate::{Error, SortDir, filter, ordering};

/// Typed view of one field of an entity.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue<'a> {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(Cow<'a, str>),
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
}

impl FieldValue<'_> {
    /// Textual form used for substring matching.
    #[must_use]
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            FieldValue::Null => Cow::Borrowed(""),
            FieldValue::Bool(b) => Cow::Owned(b.to_string()),
            FieldValue::Int(i) => Cow::Owned(i.to_string()),
            FieldValue::Float(f) => Cow::Owned(f.to_string()),
            FieldValue::Text(s) => Cow::Borrowed(s.as_ref()),
            FieldValue::Date(d) => Cow::Owned(d.to_string()),
            FieldValue::DateTime(dt) => Cow::Owned(dt.format("%Y-%m-%d %H:%M:%S").to_string()),
        }
    }

    /// Integer form used by range filters.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Natural ordering: text compares case-sensitively, floats use a total
    /// order, `Null` sorts first. Values of different kinds order by kind.
    #[must_use]
    pub fn natural_cmp(&self, other: &FieldValue<'_>) -> Ordering {
        use FieldValue as V;
        match (self, other) {
            (V::Null, V::Null) => Ordering::Equal,
            (V::Bool(a), V::Bool(b)) => a.cmp(b),
            (V::Int(a), V::Int(b)) => a.cmp(b),
            (V::Float(a), V::Float(b)) => a.total_cmp(b),
            (V::Text(a), V::Text(b)) => a.cmp(b),
            (V::Date(a), V::Date(b)) => a.cmp(b),
            (V::DateTime(a), V::DateTime(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            FieldValue::Null => 0,
            FieldValue::Bool(_) => 1,
            FieldValue::Int(_) => 2,
            FieldValue::Float(_) => 3,
            FieldValue::Text(_) => 4,
            FieldValue::Date(_) => 5,
            FieldValue::DateTime(_) => 6,
        }
    }
}

impl<'a> From<&'a str> for FieldValue<'a> {
    fn from(s: &'a str) -> Self {
        FieldValue::Text(Cow::Borrowed(s))
    }
}

impl<'a> From<&'a String> for FieldValue<'a> {
    fn from(s: &'a String) -> Self {
        FieldValue::Text(Cow::Borrowed(s.as_str()))
    }
}

impl From<i64> for FieldValue<'_> {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<DateTime<Utc>> for FieldValue<'_> {
    fn from(dt: DateTime<Utc>) -> Self {
        FieldValue::DateTime(dt)
    }
}

impl<'a, T> From<Option<T>> for FieldValue<'a>
where
    T: Into<FieldValue<'a>>,
{
    fn from(v: Option<T>) -> Self {
        v.map_or(FieldValue::Null, Into::into)
    }
}

/// Reads one field of `T`.
pub type Accessor<T> = for<'a> fn(&'a T) -> FieldValue<'a>;

/// How a column filter value is matched against a field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchMode {
    /// Case-insensitive substring; a blank value matches everything.
    Contains,
    /// Case-insensitive equality; a blank value matches nothing.
    Equals,
    /// `from;to` integer range, open bounds allowed.
    Range,
}

pub struct Field<T> {
    pub accessor: Accessor<T>,
    pub mode: MatchMode,
}

impl<T> Clone for Field<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Field<T> {}

impl<T> fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

/// Output-field name -> accessor registry for one entity type.
#[must_use]
pub struct FieldMap<T> {
    map: HashMap<String, Field<T>>,
}

impl<T> Default for FieldMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for FieldMap<T> {
    fn clone(&self) -> Self {
        Self {
            map: self.map.clone(),
        }
    }
}

impl<T> fmt::Debug for FieldMap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.map.keys().collect();
        names.sort();
        f.debug_struct("FieldMap").field("fields", &names).finish()
    }
}

impl<T> FieldMap<T> {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn insert(mut self, name: impl Into<String>, accessor: Accessor<T>, mode: MatchMode) -> Self {
        self.map.insert(name.into(), Field { accessor, mode });
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Field<T>> {
        self.map.get(name)
    }

    /// Accessor for ordering by `name`.
    ///
    /// # Errors
    /// Returns [`Error::UnknownOrderColumn`] if `name` is not registered.
    pub fn order_accessor(&self, name: &str) -> Result<Accessor<T>, Error> {
        self.get(name)
            .map(|f| f.accessor)
            .ok_or_else(|| Error::UnknownOrderColumn(name.to_owned()))
    }
}

impl<T: 'static> FieldMap<T> {
    /// Predicate for `filter`, dispatched on the registered match mode.
    ///
    /// # Errors
    /// Returns [`Error::UnknownFilterColumn`] if the filter names an
    /// unregistered field.
    pub fn predicate(&self, filter: &ColumnFilter) -> Result<filter::Predicate<T>, Error> {
        let field = self
            .get(filter.name())
            .ok_or_else(|| Error::UnknownFilterColumn(filter.name().to_owned()))?;
        Ok(match field.mode {
            MatchMode::Contains => filter::contains(field.accessor, filter.value()),
            MatchMode::Equals => filter::equals_ignore_case(field.accessor, filter.value()),
            MatchMode::Range => filter::in_range(field.accessor, filter.range_values()),
        })
    }

    /// Keep the items matching `filter`.
    ///
    /// # Errors
    /// Returns [`Error::UnknownFilterColumn`] if the filter names an
    /// unregistered field.
    pub fn apply_filter(&self, mut items: Vec<T>, filter: &ColumnFilter) -> Result<Vec<T>, Error> {
        let pred = self.predicate(filter)?;
        items.retain(|item| pred(item));
        Ok(items)
    }

    /// Order `items` by `name`; a blank name keeps the input order.
    ///
    /// # Errors
    /// Returns [`Error::UnknownOrderColumn`] if `name` is not registered.
    pub fn apply_order(&self, items: Vec<T>, name: &str, dir: SortDir) -> Result<Vec<T>, Error> {
        ordering::order_by(items, self, name, dir)
    }

    /// In-memory hooks whose filtration and ordering dispatch through this map.
    pub fn into_hooks<D: 'static, M>(self, mapping: M) -> PageHooks<Vec<T>, T, D>
    where
        T: Send + Sync,
        M: Fn(Vec<T>) -> Vec<D> + Send + Sync + 'static,
    {
        let fields = Arc::new(self);
        let for_order = Arc::clone(&fields);
        PageHooks::new(mapping)
            .filtration(move |items, f| fields.apply_filter(items, f))
            .ordering(move |items, name, dir| for_order.apply_order(items, name, dir))
    }
}
