#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! SeaORM storage boundary for [`pagekit`].
//!
//! - [`ColumnMap`] binds output-field names to SQL column expressions and
//!   turns column filters and `orderBy` into conditions and `ORDER BY` keys.
//! - [`SeaPageStore`] executes a [`pagekit::PageBatch`] as a single statement
//!   that returns the page rows together with the filtered total.
//! - [`Pager`] is the convenience entry point used by request handlers.

pub mod columns;
pub mod condition;
pub mod kind;
pub mod order;
pub mod pager;
pub mod store;

pub use columns::{ColumnMap, MappedColumn};
pub use kind::ColumnKind;
pub use pager::{Pager, fetch_page};
pub use store::{SeaPageStore, TOTAL_COUNT_COLUMN};
