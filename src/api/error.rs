//--------------------------------------------------------------------------------------------------
// ENUMS
//--------------------------------------------------------------------------------------------------
// | Name            | Description                                      | Key Methods         |
// |-----------------|--------------------------------------------------|---------------------|
// | ApiError        | Error types for the API                          | from, into_response |
//--------------------------------------------------------------------------------------------------

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::domain::services::similarity::GatewayError;

/// Type alias for Result with ApiError
pub type ApiResult<T> = Result<T, ApiError>;

/// API-specific error types
#[derive(Error, Debug, Clone)]
pub enum ApiError {
    /// The requested resource was not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The content service could not be read
    #[error("Bad gateway: {0}")]
    BadGateway(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
        };

        let body = Json(json!({
            "error": {
                "message": error_message,
                "code": status.as_u16()
            }
        }));

        (status, body).into_response()
    }
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::NotFound(_) => Self::NotFound(err.to_string()),
            GatewayError::Upstream(_) | GatewayError::Decode(_) => Self::BadGateway(err.to_string()),
        }
    }
}
