//! Maps [`EngineError`] to the external `{message, details?}` response body
//! and HTTP status.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

use crate::error::EngineError;

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl IntoResponse for EngineError {
    fn into_response(self) -> Response {
        let (status, details) = match &self {
            EngineError::Validation { kind, .. } => {
                (StatusCode::BAD_REQUEST, Some(json!({ "code": kind.code() })))
            }
            EngineError::NotFound(_) => (StatusCode::NOT_FOUND, None),
            EngineError::Conflict { kind, .. } => {
                (StatusCode::CONFLICT, Some(json!({ "code": kind.code() })))
            }
            EngineError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, None),
        };

        let body = ErrorBody {
            message: self.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}
