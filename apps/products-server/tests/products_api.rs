#![allow(clippy::unwrap_used, clippy::expect_used)]

//! End-to-end tests for `GET /products/all` against the seeded in-memory
//! catalogue, sent through the real router with `tower::ServiceExt::oneshot`.

use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use pagekit::{PaginationResult, ResolverConfig};
use products_server::api::{APPLICATION_PROBLEM_JSON, REQUEST_ID_HEADER};
use products_server::config::DatabaseConfig;
use products_server::query::ProductDto;
use products_server::{AppState, db, router};
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

async fn app_with(pagination: ResolverConfig, shutdown: CancellationToken) -> Router {
    let conn = db::connect(&DatabaseConfig::default()).await.unwrap();
    db::prepare(&conn).await.unwrap();
    router(AppState::new(conn, pagination, shutdown), Duration::from_secs(5))
}

async fn app() -> Router {
    app_with(ResolverConfig::default(), CancellationToken::new()).await
}

async fn send(app: &Router, query: &str) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri(format!("/products/all?{query}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

async fn page(app: &Router, query: &str) -> PaginationResult<ProductDto> {
    let response = send(app, query).await;
    assert_eq!(response.status(), StatusCode::OK, "query: {query}");
    serde_json::from_value(json(response).await).unwrap()
}

fn names(page: &PaginationResult<ProductDto>) -> Vec<&str> {
    page.list.iter().map(|p| p.name.as_str()).collect()
}

#[tokio::test]
async fn no_query_returns_everything() {
    let app = app().await;
    let result = page(&app, "").await;
    assert_eq!(result.total_count, 3);
    assert_eq!(result.list.len(), 3);
    assert_eq!(result.draw, 1);
}

#[tokio::test]
async fn filter_complete_match() {
    let app = app().await;
    let result = page(&app, "filteredByColumns=vendorName&filteredByValues=TestVendor2").await;
    assert_eq!(result.list.len(), 1);
    assert_eq!(result.list[0].vendor_name, "TestVendor2");
    assert_eq!(result.list[0].name, "Third");
}

#[tokio::test]
async fn filter_partial_match() {
    let app = app().await;
    let result = page(&app, "filteredByColumns=vendorName&filteredByValues=Vendor").await;
    assert_eq!(result.total_count, 3);
}

#[tokio::test]
async fn filter_no_match() {
    let app = app().await;
    let result = page(&app, "filteredByColumns=vendorName&filteredByValues=Bendor").await;
    assert!(result.list.is_empty());
    assert_eq!(result.total_count, 0);
}

#[tokio::test]
async fn invalid_filter_column_is_rejected() {
    let app = app().await;
    let response = send(&app, "filteredByColumns=invalid&filteredByValues=TestVendor2").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        APPLICATION_PROBLEM_JSON
    );
    let problem = json(response).await;
    assert_eq!(problem["status"], 422);
    assert_eq!(problem["code"], "pagination.unknown_filter_column");
    assert_eq!(problem["instance"], "/products/all");
    assert_eq!(problem["errors"][0]["field"], "filteredByColumns");
}

#[tokio::test]
async fn invalid_order_column_is_rejected() {
    let app = app().await;
    let response = send(&app, "orderBy=weight").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json(response).await["code"], "pagination.unknown_order_column");
}

#[tokio::test]
async fn unpaired_filters_are_rejected() {
    let app = app().await;
    let response = send(&app, "filteredByColumns=name,cost&filteredByValues=First").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json(response).await["code"], "pagination.filter_arity");
}

#[tokio::test]
async fn ordering_descending() {
    let app = app().await;
    let result = page(&app, "orderBy=name&orderingDirection=desc").await;
    assert_eq!(names(&result), ["Third", "Second", "First"]);
}

#[tokio::test]
async fn page_size_and_page() {
    let app = app().await;
    let result = page(&app, "pageSize=1&page=2&orderBy=name").await;
    assert_eq!(names(&result), ["Second"]);
    assert_eq!(result.total_count, 3);
}

#[tokio::test]
async fn complex_query() {
    let app = app().await;
    let result = page(
        &app,
        "pageSize=3&page=1&orderBy=name&orderingDirection=desc&filteredByColumns=vendorName&filteredByValues=TestVendor1",
    )
    .await;
    assert_eq!(result.total_count, 2);
    assert_eq!(names(&result), ["Second", "First"]);
}

#[tokio::test]
async fn draw_is_returned_unchanged() {
    let app = app().await;
    let result = page(&app, "draw=5&pageSize=1&page=2").await;
    assert_eq!(result.draw, 5);
}

#[tokio::test]
async fn cost_range_and_expiration_substring() {
    let app = app().await;
    let result = page(&app, "filteredByColumns=cost&filteredByValues=50;300&orderBy=cost").await;
    assert_eq!(names(&result), ["First", "Second"]);

    let result = page(&app, "filteredByColumns=cost&filteredByValues=200;").await;
    assert_eq!(names(&result), ["Second"]);

    let result = page(&app, "filteredByColumns=expirationDate&filteredByValues=2023").await;
    assert_eq!(names(&result), ["Third"]);
}

#[tokio::test]
async fn vendor_name_ordering_then_paging() {
    let app = app().await;
    let result = page(&app, "orderBy=vendorName&orderingDirection=desc&pageSize=1").await;
    assert_eq!(names(&result), ["Third"]);
    assert_eq!(result.total_count, 3);
}

#[tokio::test]
async fn dto_is_camel_case() {
    let app = app().await;
    let body = json(send(&app, "filteredByColumns=name&filteredByValues=first").await).await;
    let first = &body["list"][0];
    assert_eq!(first["id"], 1);
    assert_eq!(first["vendorName"], "TestVendor1");
    assert_eq!(first["expirationDate"], "2022-01-10T00:00:00");
    assert_eq!(first["cost"], 100);
    assert_eq!(body["totalCount"], 1);
}

#[tokio::test]
async fn max_page_size_is_enforced() {
    let cfg = ResolverConfig {
        max_page_size: Some(2),
        allow_unlimited: false,
        ..ResolverConfig::default()
    };
    let app = app_with(cfg, CancellationToken::new()).await;

    let result = page(&app, "pageSize=50").await;
    assert_eq!(result.list.len(), 2);
    assert_eq!(result.total_count, 3);

    // Unlimited is disabled, so -1 falls back to the default page size.
    let result = page(&app, "pageSize=-1").await;
    assert_eq!(result.list.len(), 3);
}

#[tokio::test]
async fn shutdown_cancels_requests() {
    let token = CancellationToken::new();
    token.cancel();
    let app = app_with(ResolverConfig::default(), token).await;

    let response = send(&app, "").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json(response).await["code"], "pagination.cancelled");
}

#[tokio::test]
async fn request_id_is_propagated() {
    let app = app().await;
    let response = send(&app, "").await;
    assert!(response.headers().contains_key(REQUEST_ID_HEADER));
}
