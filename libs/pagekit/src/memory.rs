//! In-memory paging over an already materialized sequence.

use crate::params::PaginationParams;
use crate::pipeline::PageHooks;
use crate::result::PaginationResult;
use crate::Error;

/// Page `items` with the same hook contract as [`crate::paginate`].
///
/// `total_count` is the length after filtration, before the window is taken.
///
/// # Errors
/// Configuration errors returned by the filtration or ordering hooks.
pub fn paginate_in_memory<T, D>(
    items: Vec<T>,
    params: &PaginationParams,
    hooks: &PageHooks<Vec<T>, T, D>,
) -> Result<PaginationResult<D>, Error> {
    let included = hooks.include(items);
    let filtered = hooks.filter_all(included, &params.filters)?;
    let total = filtered.len() as u64;
    let ordered = hooks.order(filtered, &params.order_by, params.ordering_direction)?;

    let window = params.window();
    let page: Vec<T> = window.slice(ordered.into_iter()).collect();

    tracing::debug!(
        draw = params.draw,
        offset = window.offset,
        limit = ?window.limit,
        rows = page.len(),
        total,
        "in-memory page"
    );

    Ok(PaginationResult::new(params.draw, hooks.map(page), total))
}
