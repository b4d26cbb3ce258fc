#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Paging, filtering and ordering engine.
//!
//! The crate turns untyped, string-keyed request parameters into a typed
//! [`PaginationParams`], applies per-entity hooks (includes, filtration,
//! ordering, mapping) and returns one page of results together with the
//! total number of matching rows.
//!
//! Two pipelines share the same hook contract:
//! - [`pipeline::paginate`] drives any [`PageStore`]: the filtered count and the
//!   ordered page are handed to the store as a single [`PageBatch`], so a store
//!   that supports it answers both with one round trip.
//! - [`memory::paginate_in_memory`] works over an already materialized `Vec`.
//!
//! # Example
//!
//! ```
//! use pagekit::{FieldMap, FieldValue, MatchMode, memory, resolver};
//!
//! #[derive(Clone)]
//! struct Product {
//!     name: &'static str,
//!     cost: i64,
//! }
//!
//! let fields = FieldMap::<Product>::new()
//!     .insert("Name", |p| FieldValue::from(p.name), MatchMode::Contains)
//!     .insert("Cost", |p| FieldValue::Int(p.cost), MatchMode::Range);
//!
//! let hooks = fields.clone().into_hooks(|rows: Vec<Product>| rows);
//!
//! let params = resolver::resolve_query_str("orderBy=cost&filteredByColumns=name&filteredByValues=o")
//!     .unwrap();
//! let items = vec![
//!     Product { name: "Second", cost: 20 },
//!     Product { name: "First", cost: 10 },
//!     Product { name: "Third", cost: 30 },
//! ];
//!
//! let page = memory::paginate_in_memory(items, &params, &hooks).unwrap();
//! assert_eq!(page.total_count, 1);
//! assert_eq!(page.list[0].name, "Second");
//! ```

pub mod error;
pub mod field;
pub mod filter;
pub mod memory;
pub mod ordering;
pub mod params;
pub mod pipeline;
pub mod resolver;
pub mod result;

pub use error::Error;
pub use field::{Accessor, Field, FieldMap, FieldValue, MatchMode};
pub use params::{ColumnFilter, PageSize, PageWindow, PaginationParams, RangeFilterValues};
pub use pipeline::{PageBatch, PageHooks, PageRows, PageStore, paginate, paginate_until_cancelled};
pub use resolver::ResolverConfig;
pub use result::PaginationResult;

/// Sort direction of an ordering step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum SortDir {
    #[default]
    #[serde(rename = "asc")]
    Asc,
    #[serde(rename = "desc")]
    Desc,
}

impl SortDir {
    /// Reverse the sort direction (Asc <-> Desc)
    #[must_use]
    pub fn reverse(self) -> Self {
        match self {
            SortDir::Asc => SortDir::Desc,
            SortDir::Desc => SortDir::Asc,
        }
    }

    /// Apply the direction to an ascending comparison result.
    #[must_use]
    pub fn apply(self, ord: std::cmp::Ordering) -> std::cmp::Ordering {
        match self {
            SortDir::Asc => ord,
            SortDir::Desc => ord.reverse(),
        }
    }
}

impl std::fmt::Display for SortDir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortDir::Asc => write!(f, "asc"),
            SortDir::Desc => write!(f, "desc"),
        }
    }
}
