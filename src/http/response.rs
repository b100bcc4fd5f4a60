//! Outcome to HTTP response mapping.
//!
//! - `Success` → 200 with the JSON report
//! - `BadRequest` → 400 with the message as body
//! - `ServiceUnavailable` → 503, empty body
//! - `InternalError` → 500, empty body

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::report::ReportOutcome;

impl IntoResponse for ReportOutcome {
    fn into_response(self) -> Response {
        match self {
            ReportOutcome::Success(result) => (StatusCode::OK, Json(result)).into_response(),
            ReportOutcome::BadRequest(message) => (StatusCode::BAD_REQUEST, message).into_response(),
            ReportOutcome::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE.into_response(),
            ReportOutcome::InternalError => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}
