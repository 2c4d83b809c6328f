use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

pub const MISSING_FIELDS: &str = "Missing required fields";

/// Every failure a handler can answer with. Rendered as `{"error": <message>}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{}", MISSING_FIELDS)]
    InvalidInput,
    #[error("Not found")]
    NotFound,
    /// Write failed and was rolled back; the message is passed through as is.
    #[error("{0}")]
    Persistence(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput | ApiError::Persistence(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
