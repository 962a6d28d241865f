use atlas_derive::api_model;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::borrow::Cow;
use tracing::{debug, error};

/// Body returned for every unclassified failure; details stay in the logs.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Body returned when a request body is not valid JSON for the endpoint.
pub const INVALID_BODY_MESSAGE: &str = "Invalid request body";

/// JSON error envelope: `{"error": "..."}`.
#[api_model]
pub struct ErrorBody {
    pub error: String,
}

/// The single place where failures become HTTP responses.
///
/// `BadRequest` and `NotFound` carry a client-facing message; `Internal` is logged
/// and answered with [`INTERNAL_ERROR_MESSAGE`].
#[atlas_derive::atlas_error]
pub enum ApiError {
    #[error("{message}")]
    BadRequest { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("{message}")]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl ApiError {
    pub fn bad_request(message: impl Into<Cow<'static, str>>) -> Self {
        Self::BadRequest { message: message.into(), context: None }
    }

    pub fn not_found(message: impl Into<Cow<'static, str>>) -> Self {
        Self::NotFound { message: message.into(), context: None }
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!(reason = %rejection.body_text(), "Rejected request body");
        Self::bad_request(INVALID_BODY_MESSAGE)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::BadRequest { message, .. } | Self::NotFound { message, .. } => message,
            internal @ Self::Internal { .. } => {
                error!(error = %internal, "Request failed");
                Cow::Borrowed(INTERNAL_ERROR_MESSAGE)
            }
        };

        (status, Json(ErrorBody { error: message.into_owned() })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_of(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        (status, serde_json::from_slice(&bytes).expect("json body"))
    }

    #[tokio::test]
    async fn client_errors_keep_their_message() {
        let (status, body) = body_of(ApiError::bad_request("Country name cannot be empty.")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::json!({ "error": "Country name cannot be empty." }));

        let (status, body) = body_of(ApiError::not_found("Country not found")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Country not found");
    }

    #[tokio::test]
    async fn internal_errors_are_masked() {
        let err = ApiError::from("connection refused by 10.0.0.3:8000");
        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, serde_json::json!({ "error": INTERNAL_ERROR_MESSAGE }));
    }
}
