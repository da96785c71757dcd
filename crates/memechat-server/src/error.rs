//! Maps chat failures onto HTTP status codes and the `{error}` body.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use memechat_core::ChatError;
use memechat_provider::ProviderError;
use memechat_schema::ErrorBody;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::InvalidInput => ApiError::new(StatusCode::BAD_REQUEST, err.to_string()),
            ChatError::Upstream(ProviderError::RateLimited(_)) => ApiError::new(
                StatusCode::TOO_MANY_REQUESTS,
                "Rate limit exceeded. Please try again later.",
            ),
            ChatError::Upstream(ProviderError::Unavailable(_)) => ApiError::new(
                StatusCode::SERVICE_UNAVAILABLE,
                "Service unavailable. Please try again later.",
            ),
            ChatError::Upstream(ProviderError::Status { status, message }) => {
                let status =
                    StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                ApiError::new(status, message)
            }
            other => ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Something went wrong: {other}"),
            ),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::new(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, "{}", self.message);
        }
        (self.status, Json(ErrorBody::new(self.message))).into_response()
    }
}
