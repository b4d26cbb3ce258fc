use axum::Json;
use axum::extract::State;
use axum::http::Uri;
use pagekit::PaginationResult;
use tracing::info;

use super::AppState;
use super::extract::Pagination;
use super::problem::{Problem, paging_error_to_problem};
use crate::query::ProductDto;

pub(super) async fn list_products(
    State(state): State<AppState>,
    uri: Uri,
    Pagination(params): Pagination,
) -> Result<Json<PaginationResult<ProductDto>>, Problem> {
    info!(
        page = params.page,
        order_by = %params.order_by,
        filters = params.filters.len(),
        "Listing products"
    );

    let page = state
        .products
        .get_page(&params, &state.shutdown)
        .await
        .map_err(|e| paging_error_to_problem(&e, uri.path()))?;

    info!(
        returned = page.list.len(),
        total = page.total_count,
        "Products listed"
    );
    Ok(Json(page))
}
