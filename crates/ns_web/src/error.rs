use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ns_core::Error;
use serde_json::json;
use tracing::error;

pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred";

/// Maps pipeline errors onto HTTP status codes and `{"error": ..}` bodies.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            Error::Validation(_) | Error::Extraction(_) | Error::Generation(_) => StatusCode::BAD_REQUEST,
            Error::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        if self.0.is_user_facing() {
            self.0.to_string()
        } else {
            UNEXPECTED_ERROR.to_string()
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR && !self.0.is_user_facing() {
            error!("💥 Unexpected error: {}", self.0);
        }
        (status, Json(json!({ "error": self.message() }))).into_response()
    }
}
