//! RFC 9457 problem responses and the mapping from paging errors.

use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub const APPLICATION_PROBLEM_JSON: &str = "application/problem+json";

#[allow(clippy::trivially_copy_pass_by_ref)] // serde requires &T signature
fn serialize_status_code<S>(status: &StatusCode, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u16(status.as_u16())
}

fn deserialize_status_code<'de, D>(deserializer: D) -> Result<StatusCode, D::Error>
where
    D: Deserializer<'de>,
{
    let code = u16::deserialize(deserializer)?;
    StatusCode::from_u16(code).map_err(serde::de::Error::custom)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[must_use]
pub struct Problem {
    #[serde(rename = "type")]
    pub type_url: String,
    pub title: String,
    #[serde(
        serialize_with = "serialize_status_code",
        deserialize_with = "deserialize_status_code"
    )]
    pub status: StatusCode,
    pub detail: String,
    /// Request path the problem occurred on.
    pub instance: String,
    /// Machine-readable code, e.g. `pagination.unknown_filter_column`.
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<Violation>>,
}

/// The request parameter a 422 problem is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

impl Problem {
    pub fn new(status: StatusCode, title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            type_url: "about:blank".to_owned(),
            title: title.into(),
            status,
            detail: detail.into(),
            instance: String::new(),
            code: String::new(),
            trace_id: None,
            errors: None,
        }
    }

    pub fn with_instance(mut self, uri: impl Into<String>) -> Self {
        self.instance = uri.into();
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    pub fn with_violation(mut self, field: &str, message: impl Into<String>) -> Self {
        self.errors.get_or_insert_with(Vec::new).push(Violation {
            field: field.to_owned(),
            message: message.into(),
        });
        self
    }
}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        let status = self.status;
        let mut resp = axum::Json(self).into_response();
        *resp.status_mut() = status;
        resp.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(APPLICATION_PROBLEM_JSON),
        );
        resp
    }
}

fn current_trace_id() -> Option<String> {
    tracing::Span::current()
        .id()
        .map(|id| id.into_u64().to_string())
}

/// Map a paging error to the problem returned for `instance`.
///
/// Rejected requests become 422 with the offending parameter named,
/// cancellation during shutdown becomes 503. Store failures are logged and
/// answered with a generic 500 so driver details never reach clients.
pub fn paging_error_to_problem(err: &pagekit::Error, instance: &str) -> Problem {
    use pagekit::Error as PE;

    let problem = match err {
        PE::UnknownFilterColumn(_) => unprocessable("pagination.unknown_filter_column", err)
            .with_violation("filteredByColumns", err.to_string()),
        PE::UnknownOrderColumn(_) => unprocessable("pagination.unknown_order_column", err)
            .with_violation("orderBy", err.to_string()),
        PE::FilterArity { .. } => unprocessable("pagination.filter_arity", err)
            .with_violation("filteredByValues", err.to_string()),
        PE::Cancelled => Problem::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "Service Unavailable",
            "The server is shutting down",
        )
        .with_code("pagination.cancelled"),
        PE::Store(e) => {
            tracing::error!(error = %e, instance, "Unexpected database error while paging");
            Problem::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
                "An internal database error occurred",
            )
            .with_code("pagination.store")
        }
    };

    let problem = problem.with_instance(instance);
    match current_trace_id() {
        Some(tid) => problem.with_trace_id(tid),
        None => problem,
    }
}

fn unprocessable(code: &str, err: &pagekit::Error) -> Problem {
    Problem::new(
        StatusCode::UNPROCESSABLE_ENTITY,
        "Unprocessable Entity",
        err.to_string(),
    )
    .with_code(code)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("disk I/O error: /var/lib/products.db")]
    struct DiskError;

    #[test]
    fn problem_into_response_sets_status_and_content_type() {
        let resp = Problem::new(StatusCode::UNPROCESSABLE_ENTITY, "Unprocessable Entity", "x")
            .into_response();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let ct = resp
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        assert_eq!(ct, APPLICATION_PROBLEM_JSON);
    }

    #[test]
    fn status_serializes_as_number() {
        let p = Problem::new(StatusCode::SERVICE_UNAVAILABLE, "Service Unavailable", "bye");
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["status"], 503);
        assert_eq!(json["type"], "about:blank");
        assert!(json.get("errors").is_none());
    }

    #[test]
    fn configuration_errors_are_422() {
        let err = pagekit::Error::UnknownFilterColumn("Invalid".to_owned());
        let p = paging_error_to_problem(&err, "/products/all");
        assert_eq!(p.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(p.code, "pagination.unknown_filter_column");
        assert_eq!(p.instance, "/products/all");
        assert!(p.detail.contains("Invalid"));
        let errors = p.errors.unwrap();
        assert_eq!(errors[0].field, "filteredByColumns");

        let err = pagekit::Error::FilterArity {
            columns: 2,
            values: 1,
        };
        assert_eq!(
            paging_error_to_problem(&err, "/").errors.unwrap()[0].field,
            "filteredByValues"
        );
    }

    #[test]
    fn store_errors_hide_details() {
        let err = pagekit::Error::store(DiskError);
        let p = paging_error_to_problem(&err, "/products/all");
        assert_eq!(p.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!p.detail.contains("/var/lib"));
        assert!(p.errors.is_none());
    }

    #[test]
    fn cancellation_is_503() {
        let p = paging_error_to_problem(&pagekit::Error::Cancelled, "/products/all");
        assert_eq!(p.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(p.code, "pagination.cancelled");
    }
}
