//! HTTP surface: `GET /products/all`.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::FromRef;
use axum::http::{HeaderName, StatusCode};
use axum::routing::get;
use pagekit::ResolverConfig;
use sea_orm::DatabaseConnection;
use tokio_util::sync::CancellationToken;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::query::ProductsQuery;

pub mod extract;
mod handlers;
pub mod problem;

pub use extract::Pagination;
pub use problem::{APPLICATION_PROBLEM_JSON, Problem, paging_error_to_problem};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone)]
pub struct AppState {
    pub products: Arc<ProductsQuery>,
    pub pagination: Arc<ResolverConfig>,
    /// Fired on shutdown; in-flight page queries stop with 503.
    pub shutdown: CancellationToken,
}

impl AppState {
    #[must_use]
    pub fn new(db: DatabaseConnection, pagination: ResolverConfig, shutdown: CancellationToken) -> Self {
        Self {
            products: Arc::new(ProductsQuery::new(db)),
            pagination: Arc::new(pagination),
            shutdown,
        }
    }
}

impl FromRef<AppState> for Arc<ResolverConfig> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.pagination)
    }
}

/// Routes plus middleware. Requests pass the request-id layers first, then
/// tracing, then the timeout.
#[must_use]
pub fn router(state: AppState, request_timeout: Duration) -> Router {
    let x_request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .route("/products/all", get(handlers::list_products))
        .with_state(state)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::GATEWAY_TIMEOUT,
            request_timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
        .layer(SetRequestIdLayer::new(x_request_id, MakeRequestUuid))
}
