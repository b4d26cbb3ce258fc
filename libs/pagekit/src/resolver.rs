//! Turns flat string key/value request parameters into [`PaginationParams`].
//!
//! Recognized keys (matched case-insensitively): `draw`, `page`, `pageSize`,
//! `orderBy`, `orderingDirection`, `filteredByColumns`, `filteredByValues`.
//! Anything else is ignored. Malformed scalar values fall back to defaults;
//! the only rejected input is a column list that does not pair up with the
//! value list.

use serde::{Deserialize, Serialize};

use crate::params::{ColumnFilter, PageSize, PaginationParams};
use crate::{Error, SortDir};

pub const DEFAULT_PAGE_SIZE: u64 = 10;

const DRAW: &str = "draw";
const PAGE: &str = "page";
const PAGE_SIZE: &str = "pageSize";
const ORDER_BY: &str = "orderBy";
const ORDERING_DIRECTION: &str = "orderingDirection";
const FILTERED_BY_COLUMNS: &str = "filteredByColumns";
const FILTERED_BY_VALUES: &str = "filteredByValues";

/// Resolver knobs, usually loaded as part of the service configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    /// Page size used when `pageSize` is absent or invalid.
    pub default_page_size: u64,
    /// Upper bound for `pageSize`; larger requests are clamped.
    pub max_page_size: Option<u64>,
    /// Whether `pageSize=-1` may request the whole filtered sequence.
    pub allow_unlimited: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: None,
            allow_unlimited: true,
        }
    }
}

impl ResolverConfig {
    fn page_size(&self, raw: Option<i64>) -> PageSize {
        let default = PageSize::Limited(self.default_page_size.max(1));
        match raw {
            Some(PageSize::UNLIMITED_SENTINEL) if self.allow_unlimited => PageSize::Unlimited,
            Some(n) => match u64::try_from(n) {
                Ok(0) | Err(_) => default,
                Ok(n) => PageSize::Limited(self.max_page_size.map_or(n, |max| n.min(max.max(1)))),
            },
            None => default,
        }
    }
}

/// Upper-case the first character, leaving the rest untouched.
/// Blank input becomes the empty string.
#[must_use]
pub fn first_char_to_upper(input: &str) -> String {
    if input.trim().is_empty() {
        return String::new();
    }
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

struct RawParams {
    pairs: Vec<(String, String)>,
}

impl RawParams {
    fn first(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// All values of a multi-valued key, comma-joined.
    fn joined(&self, key: &str) -> String {
        self.pairs
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }

    fn int(&self, key: &str) -> Option<i64> {
        self.first(key).and_then(|v| v.trim().parse().ok())
    }
}

fn split_list(raw: &str) -> Vec<&str> {
    raw.split(',').filter(|s| !s.is_empty()).collect()
}

/// Resolve parameters with the default [`ResolverConfig`].
///
/// # Errors
/// Returns [`Error::FilterArity`] when `filteredByColumns` and
/// `filteredByValues` have a different number of entries.
pub fn resolve<I, K, V>(pairs: I) -> Result<PaginationParams, Error>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    resolve_with(pairs, &ResolverConfig::default())
}

/// Resolve parameters from key/value pairs. Repeated keys model
/// multi-valued entries.
///
/// # Errors
/// Returns [`Error::FilterArity`] when `filteredByColumns` and
/// `filteredByValues` have a different number of entries.
pub fn resolve_with<I, K, V>(pairs: I, cfg: &ResolverConfig) -> Result<PaginationParams, Error>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let raw = RawParams {
        pairs: pairs
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_owned(), v.as_ref().to_owned()))
            .collect(),
    };

    let columns_raw = raw.joined(FILTERED_BY_COLUMNS);
    let values_raw = raw.joined(FILTERED_BY_VALUES);
    let columns = split_list(&columns_raw);
    let values = split_list(&values_raw);
    if columns.len() != values.len() {
        return Err(Error::FilterArity {
            columns: columns.len(),
            values: values.len(),
        });
    }

    let ordering_direction = if raw.first(ORDERING_DIRECTION) == Some("desc") {
        SortDir::Desc
    } else {
        SortDir::Asc
    };

    let params = PaginationParams {
        draw: raw.int(DRAW).unwrap_or(1),
        page: raw
            .int(PAGE)
            .and_then(|p| u64::try_from(p).ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1),
        page_size: cfg.page_size(raw.int(PAGE_SIZE)),
        order_by: first_char_to_upper(raw.first(ORDER_BY).unwrap_or_default()),
        ordering_direction,
        filters: columns
            .iter()
            .zip(&values)
            .map(|(column, value)| ColumnFilter::new(column, value))
            .collect(),
    };

    tracing::trace!(
        draw = params.draw,
        page = params.page,
        page_size = ?params.page_size,
        order_by = %params.order_by,
        dir = %params.ordering_direction,
        filters = params.filters.len(),
        "resolved pagination params"
    );

    Ok(params)
}

/// Resolve parameters from a raw URL query string (without the leading `?`).
///
/// # Errors
/// Same as [`resolve`].
pub fn resolve_query_str(query: &str) -> Result<PaginationParams, Error> {
    resolve_query_str_with(query, &ResolverConfig::default())
}

/// Resolve parameters from a raw URL query string using `cfg`.
///
/// # Errors
/// Same as [`resolve_with`].
pub fn resolve_query_str_with(query: &str, cfg: &ResolverConfig) -> Result<PaginationParams, Error> {
    resolve_with(url::form_urlencoded::parse(query.as_bytes()), cfg)
}
