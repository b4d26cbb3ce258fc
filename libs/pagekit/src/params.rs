//! Per-request value objects produced by the resolver.

use crate::SortDir;

/// Requested page size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageSize {
    /// At most this many rows per page (always >= 1).
    Limited(u64),
    /// No paging at all: the whole filtered sequence is one page.
    Unlimited,
}

impl PageSize {
    /// Wire value of the "no limit" sentinel.
    pub const UNLIMITED_SENTINEL: i64 = -1;

    /// Row limit, `None` when unlimited.
    #[must_use]
    pub fn limit(self) -> Option<u64> {
        match self {
            PageSize::Limited(n) => Some(n),
            PageSize::Unlimited => None,
        }
    }
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize::Limited(crate::resolver::DEFAULT_PAGE_SIZE)
    }
}

/// Skip/take window derived from page and page size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageWindow {
    pub offset: u64,
    pub limit: Option<u64>,
}

impl PageWindow {
    /// Window that returns everything.
    pub const ALL: PageWindow = PageWindow {
        offset: 0,
        limit: None,
    };

    /// Largest offset or limit a window carries. SQL drivers bind both as
    /// signed 64-bit integers.
    pub const MAX_BOUND: u64 = i64::MAX.unsigned_abs();

    /// Window for a 1-based page. Page 0 is treated as page 1.
    #[must_use]
    pub fn for_page(page: u64, size: PageSize) -> Self {
        match size {
            PageSize::Unlimited => Self::ALL,
            PageSize::Limited(n) => PageWindow {
                offset: page.saturating_sub(1).saturating_mul(n).min(Self::MAX_BOUND),
                limit: Some(n.min(Self::MAX_BOUND)),
            },
        }
    }

    /// Apply the window to an iterator.
    pub fn slice<I: Iterator>(self, iter: I) -> impl Iterator<Item = I::Item> {
        let skipped = iter.skip(usize::try_from(self.offset).unwrap_or(usize::MAX));
        match self.limit {
            Some(n) => skipped.take(usize::try_from(n).unwrap_or(usize::MAX)),
            None => skipped.take(usize::MAX),
        }
    }
}

/// Single named-column match condition supplied at request time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnFilter {
    name: String,
    value: String,
}

impl ColumnFilter {
    /// Build a filter from raw request input.
    ///
    /// The name gets its first character upper-cased so `vendorName` addresses
    /// the `VendorName` output field; the value is trimmed and lower-cased.
    #[must_use]
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: crate::resolver::first_char_to_upper(name),
            value: value.trim().to_lowercase(),
        }
    }

    /// Normalized output-field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Normalized (trimmed, lower-cased) filter value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// `true` when the value carries no search term.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }

    /// Interpret the value as a `from;to` range.
    #[must_use]
    pub fn range_values(&self) -> RangeFilterValues {
        RangeFilterValues::parse(&self.value)
    }
}

/// Inclusive integer bounds parsed from a `from;to` filter value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RangeFilterValues {
    pub from: i64,
    pub to: i64,
}

impl RangeFilterValues {
    /// Parse `from;to`. A missing or non-numeric side becomes an open bound
    /// (`i64::MIN` for `from`, `i64::MAX` for `to`) instead of an error.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut parts = raw.splitn(2, ';');
        let from = parts
            .next()
            .and_then(|s| s.trim().parse::<i64>().ok())
            .unwrap_or(i64::MIN);
        let to = parts
            .next()
            .and_then(|s| s.trim().parse::<i64>().ok())
            .unwrap_or(i64::MAX);
        Self { from, to }
    }

    #[must_use]
    pub fn contains(&self, value: i64) -> bool {
        (self.from..=self.to).contains(&value)
    }
}

/// Typed paging parameters for one request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaginationParams {
    /// Opaque client correlation token, echoed back unchanged.
    pub draw: i64,
    /// 1-based page number.
    pub page: u64,
    pub page_size: PageSize,
    /// Output-field name to order by; empty means "no ordering requested".
    pub order_by: String,
    pub ordering_direction: SortDir,
    pub filters: Vec<ColumnFilter>,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            draw: 1,
            page: 1,
            page_size: PageSize::default(),
            order_by: String::new(),
            ordering_direction: SortDir::Asc,
            filters: Vec::new(),
        }
    }
}

impl PaginationParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_draw(mut self, draw: i64) -> Self {
        self.draw = draw;
        self
    }

    #[must_use]
    pub fn with_page(mut self, page: u64, page_size: PageSize) -> Self {
        self.page = page.max(1);
        self.page_size = page_size;
        self
    }

    #[must_use]
    pub fn with_order(mut self, order_by: &str, dir: SortDir) -> Self {
        self.order_by = crate::resolver::first_char_to_upper(order_by);
        self.ordering_direction = dir;
        self
    }

    #[must_use]
    pub fn with_filter(mut self, name: &str, value: &str) -> Self {
        self.filters.push(ColumnFilter::new(name, value));
        self
    }

    /// Skip/take window for these parameters.
    #[must_use]
    pub fn window(&self) -> PageWindow {
        PageWindow::for_page(self.page, self.page_size)
    }
}
