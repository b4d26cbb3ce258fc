use serde::{Deserialize, Serialize};

/// One page of results plus the number of rows matching the filters.
///
/// Serializes as `{ "draw": .., "list": [..], "totalCount": .. }`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationResult<T> {
    /// Echo of the request's `draw`.
    pub draw: i64,
    pub list: Vec<T>,
    /// Filtered row count, independent of the page window.
    pub total_count: u64,
}

impl<T> PaginationResult<T> {
    #[must_use]
    pub fn new(draw: i64, list: Vec<T>, total_count: u64) -> Self {
        Self {
            draw,
            list,
            total_count,
        }
    }

    /// Convert the items, keeping `draw` and `total_count`.
    #[must_use]
    pub fn map_list<U, F>(self, f: F) -> PaginationResult<U>
    where
        F: FnMut(T) -> U,
    {
        PaginationResult {
            draw: self.draw,
            list: self.list.into_iter().map(f).collect(),
            total_count: self.total_count,
        }
    }
}
