use std::ops::Deref;
use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use pagekit::{PaginationParams, ResolverConfig, resolver};

use super::problem::{Problem, paging_error_to_problem};

/// Axum extractor for the paging query parameters.
///
/// Resolves `draw`, `page`, `pageSize`, `orderBy`, `orderingDirection`,
/// `filteredByColumns` and `filteredByValues` with the [`ResolverConfig`]
/// held in the router state. Unpaired filter lists are rejected with 422.
///
/// ```ignore
/// async fn list(Pagination(params): Pagination) { /* use `params` */ }
/// ```
#[derive(Debug, Clone)]
pub struct Pagination(pub PaginationParams);

impl Pagination {
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> PaginationParams {
        self.0
    }
}

impl Deref for Pagination {
    type Target = PaginationParams;
    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for Pagination
where
    Arc<ResolverConfig>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Problem;

    #[allow(clippy::manual_async_fn)]
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl core::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let cfg = Arc::<ResolverConfig>::from_ref(state);
        async move {
            let query = parts.uri.query().unwrap_or_default();
            resolver::resolve_query_str_with(query, &cfg)
                .map(Pagination)
                .map_err(|e| paging_error_to_problem(&e, parts.uri.path()))
        }
    }
}
