//! Deferred-source paging pipeline.
//!
//! The pipeline never reads rows itself. It shapes two deferred queries
//! (the filtered count and the ordered page) and hands both to a
//! [`PageStore`] in one [`PageBatch`]. How the store executes the pair is its
//! own business, but it must answer both from one physical request whenever
//! the backend allows it.

use std::fmt;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::params::{ColumnFilter, PageWindow, PaginationParams};
use crate::result::PaginationResult;
use crate::{Error, SortDir};

type IncludesFn<Q> = Box<dyn Fn(Q) -> Q + Send + Sync>;
type FiltrationFn<Q> = Box<dyn Fn(Q, &ColumnFilter) -> Result<Q, Error> + Send + Sync>;
type OrderingFn<Q> = Box<dyn Fn(Q, &str, SortDir) -> Result<Q, Error> + Send + Sync>;
type MappingFn<R, D> = Box<dyn Fn(Vec<R>) -> Vec<D> + Send + Sync>;

/// Per-entity strategy: how to shape the source, apply one filter, order and
/// convert rows to output items.
///
/// `Q` is the deferred query (or the materialized `Vec` for in-memory
/// paging), `R` the row type the store yields and `D` the output item.
pub struct PageHooks<Q, R, D> {
    includes: IncludesFn<Q>,
    filtration: FiltrationFn<Q>,
    ordering: OrderingFn<Q>,
    mapping: MappingFn<R, D>,
}

impl<Q, R, D> fmt::Debug for PageHooks<Q, R, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageHooks").finish_non_exhaustive()
    }
}

fn keep<Q>(query: Q) -> Q {
    query
}

fn no_filtration<Q>(query: Q, _: &ColumnFilter) -> Result<Q, Error> {
    Ok(query)
}

fn no_ordering<Q>(query: Q, _: &str, _: SortDir) -> Result<Q, Error> {
    Ok(query)
}

impl<Q: 'static, R: 'static, D: 'static> PageHooks<Q, R, D> {
    /// Hooks with identity includes, filtration and ordering.
    #[must_use]
    pub fn new<M>(mapping: M) -> Self
    where
        M: Fn(Vec<R>) -> Vec<D> + Send + Sync + 'static,
    {
        Self {
            includes: Box::new(keep::<Q>),
            filtration: Box::new(no_filtration::<Q>),
            ordering: Box::new(no_ordering::<Q>),
            mapping: Box::new(mapping),
        }
    }

    #[must_use]
    pub fn includes<F>(mut self, f: F) -> Self
    where
        F: Fn(Q) -> Q + Send + Sync + 'static,
    {
        self.includes = Box::new(f);
        self
    }

    /// Narrow the query by one filter. Called once per filter, in request
    /// order; the results are ANDed.
    #[must_use]
    pub fn filtration<F>(mut self, f: F) -> Self
    where
        F: Fn(Q, &ColumnFilter) -> Result<Q, Error> + Send + Sync + 'static,
    {
        self.filtration = Box::new(f);
        self
    }

    /// Order the query by a field name. The name is blank when the request
    /// asked for no ordering.
    #[must_use]
    pub fn ordering<F>(mut self, f: F) -> Self
    where
        F: Fn(Q, &str, SortDir) -> Result<Q, Error> + Send + Sync + 'static,
    {
        self.ordering = Box::new(f);
        self
    }
}

impl<Q: 'static, R: 'static> PageHooks<Q, R, R> {
    /// Hooks that change nothing and return rows as-is.
    #[must_use]
    pub fn identity() -> Self {
        Self::new(keep::<Vec<R>>)
    }
}

impl<Q, R, D> PageHooks<Q, R, D> {
    #[must_use]
    pub fn include(&self, query: Q) -> Q {
        (self.includes)(query)
    }

    /// Fold every filter into `query`.
    ///
    /// # Errors
    /// Propagates the first error returned by the filtration hook.
    pub fn filter_all(&self, query: Q, filters: &[ColumnFilter]) -> Result<Q, Error> {
        filters
            .iter()
            .try_fold(query, |q, f| (self.filtration)(q, f))
    }

    /// # Errors
    /// Propagates the error returned by the ordering hook.
    pub fn order(&self, query: Q, order_by: &str, dir: SortDir) -> Result<Q, Error> {
        (self.ordering)(query, order_by, dir)
    }

    #[must_use]
    pub fn map(&self, rows: Vec<R>) -> Vec<D> {
        (self.mapping)(rows)
    }
}

/// The two deferred sub-queries of one page request.
#[derive(Clone, Debug)]
pub struct PageBatch<Q> {
    /// Filtered, unordered query whose row count is the total.
    pub count: Q,
    /// Filtered and ordered query to window.
    pub page: Q,
    pub window: PageWindow,
}

/// Results of one [`PageBatch`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageRows<R> {
    pub rows: Vec<R>,
    pub total: u64,
}

/// Storage boundary executing a batched count + page request.
#[async_trait]
pub trait PageStore: Send + Sync {
    type Query: Clone + Send;
    type Row: Send;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Run both sub-queries of `batch`, ideally as one physical request.
    async fn execute(&self, batch: PageBatch<Self::Query>) -> Result<PageRows<Self::Row>, Self::Error>;
}

/// Compute one page of `source` against `store`.
///
/// Filter and ordering hooks run before the store is touched, so a request
/// naming an unknown column fails without any I/O. The store is called at
/// most once and its errors are never retried.
///
/// # Errors
/// Configuration errors from the hooks, or [`Error::Store`] wrapping the
/// store's own error.
pub async fn paginate<S, D>(
    store: &S,
    source: S::Query,
    params: &PaginationParams,
    hooks: &PageHooks<S::Query, S::Row, D>,
) -> Result<PaginationResult<D>, Error>
where
    S: PageStore + ?Sized,
{
    let included = hooks.include(source);
    let filtered = hooks.filter_all(included, &params.filters)?;
    let ordered = hooks.order(filtered.clone(), &params.order_by, params.ordering_direction)?;

    let window = params.window();
    tracing::debug!(
        draw = params.draw,
        offset = window.offset,
        limit = ?window.limit,
        filters = params.filters.len(),
        order_by = %params.order_by,
        "executing page batch"
    );

    let batch = PageBatch {
        count: filtered,
        page: ordered,
        window,
    };
    let PageRows { rows, total } = store.execute(batch).await.map_err(Error::store)?;

    tracing::debug!(draw = params.draw, rows = rows.len(), total, "page fetched");

    Ok(PaginationResult::new(params.draw, hooks.map(rows), total))
}

/// [`paginate`], abandoned with [`Error::Cancelled`] as soon as `cancel`
/// fires. A token that is already cancelled never reaches the store.
///
/// # Errors
/// Same as [`paginate`], plus [`Error::Cancelled`].
pub async fn paginate_until_cancelled<S, D>(
    store: &S,
    source: S::Query,
    params: &PaginationParams,
    hooks: &PageHooks<S::Query, S::Row, D>,
    cancel: &CancellationToken,
) -> Result<PaginationResult<D>, Error>
where
    S: PageStore + ?Sized,
{
    tokio::select! {
        biased;
        () = cancel.cancelled() => {
            tracing::debug!(draw = params.draw, "page request cancelled");
            Err(Error::Cancelled)
        }
        res = paginate(store, source, params, hooks) => res,
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_identity() {
        let hooks: PageHooks<Vec<u8>, u8, u8> = PageHooks::identity();
        let q = hooks.include(vec![3, 1, 2]);
        let q = hooks
            .filter_all(q, &[ColumnFilter::new("any", "thing")])
            .unwrap();
        let q = hooks.order(q, "Any", SortDir::Desc).unwrap();
        assert_eq!(hooks.map(q), vec![3, 1, 2]);
    }

    #[test]
    fn filters_fold_in_request_order() {
        let hooks: PageHooks<String, u8, u8> =
            PageHooks::identity().filtration(|mut q: String, f: &ColumnFilter| {
                q.push_str(f.name());
                Ok(q)
            });
        let filters = [ColumnFilter::new("a", "1"), ColumnFilter::new("b", "2")];
        assert_eq!(hooks.filter_all(String::new(), &filters).unwrap(), "AB");
    }

    #[test]
    fn first_filter_error_stops_the_fold() {
        let hooks: PageHooks<u32, u8, u8> = PageHooks::identity().filtration(|q, f| {
            if f.name() == "Bad" {
                Err(Error::UnknownFilterColumn(f.name().to_owned()))
            } else {
                Ok(q + 1)
            }
        });
        let filters = [
            ColumnFilter::new("ok", "1"),
            ColumnFilter::new("bad", "2"),
            ColumnFilter::new("ok", "3"),
        ];
        assert!(matches!(
            hooks.filter_all(0, &filters),
            Err(Error::UnknownFilterColumn(_))
        ));
    }

    struct Echo;

    #[async_trait]
    impl PageStore for Echo {
        type Query = Vec<u8>;
        type Row = u8;
        type Error = std::io::Error;

        async fn execute(&self, batch: PageBatch<Vec<u8>>) -> Result<PageRows<u8>, std::io::Error> {
            Ok(PageRows {
                total: batch.count.len() as u64,
                rows: batch.window.slice(batch.page.into_iter()).collect(),
            })
        }
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn logs_the_batch_shape() {
        let params = PaginationParams::new().with_draw(7);
        let page = paginate(&Echo, vec![1, 2, 3], &params, &PageHooks::identity())
            .await
            .unwrap();
        assert_eq!(page.total_count, 3);
        assert!(logs_contain("executing page batch"));
        assert!(logs_contain("draw=7"));
    }
}
