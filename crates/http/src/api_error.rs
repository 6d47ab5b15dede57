//! Typed API error for HTTP handlers.
//!
//! Converts domain errors into HTTP responses with a JSON body and status code.
//! Handlers return `Result<Json<T>, ApiError>`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use onyx_ext_render::RenderError;
use onyx_ext_service::ServiceError;
use onyx_ext_storage::StorageError;
use onyx_ext_upstream::UpstreamError;

/// API error with HTTP status code and human-readable message.
///
/// Converts to JSON response: `{"error": "message"}`.
///
/// `Internal` variant logs the real error server-side and returns
/// a static message to the client.
#[derive(Debug)]
pub enum ApiError {
    /// 400 Bad Request: malformed query parameters or chart input.
    BadRequest(String),
    /// 401 Unauthorized: missing or rejected session cookie.
    Unauthorized(String),
    /// 403 Forbidden: authenticated but lacking the permission.
    Forbidden(String),
    /// 404 Not Found: missing, or owned by someone else.
    NotFound(String),
    /// 409 Conflict: the resource already exists.
    Conflict(String),
    /// 422 Unprocessable Entity: payload parsed but failed validation.
    UnprocessableEntity(String),
    /// 502 Bad Gateway: Onyx, Loki or the LLM failed.
    BadGateway(String),
    /// 500 Internal Server Error. Details logged, not exposed.
    Internal(anyhow::Error),
    /// 503 Service Unavailable: required backend not configured.
    ServiceUnavailable(String),
}

impl ApiError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::BadGateway(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::BadRequest(msg)
            | Self::Unauthorized(msg)
            | Self::Forbidden(msg)
            | Self::NotFound(msg)
            | Self::Conflict(msg)
            | Self::UnprocessableEntity(msg)
            | Self::BadGateway(msg)
            | Self::ServiceUnavailable(msg) => msg,
            Self::Internal(err) => {
                tracing::error!(error = ?err, "internal server error");
                "internal server error".to_owned()
            },
        };
        let body = serde_json::json!({"error": message});
        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

impl From<UpstreamError> for ApiError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Unauthorized => Self::Unauthorized("session rejected by Onyx".to_owned()),
            other => {
                tracing::warn!(error = %other, "upstream call failed");
                Self::BadGateway(other.to_string())
            },
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Storage(StorageError::NotFound { entity, id }) => {
                Self::NotFound(format!("{entity} '{id}' not found"))
            },
            ServiceError::Storage(ref e) if e.is_duplicate() => Self::Conflict(err.to_string()),
            ServiceError::Storage(StorageError::InvalidReference(msg)) => {
                Self::UnprocessableEntity(format!("invalid reference: {msg}"))
            },
            ServiceError::InvalidInput(msg) => Self::UnprocessableEntity(msg),
            ServiceError::Forbidden(msg) => Self::Forbidden(msg),
            ServiceError::NotConfigured(msg) => Self::ServiceUnavailable(msg),
            ServiceError::Upstream(e) => e.into(),
            ServiceError::Llm(e) => {
                tracing::warn!(error = %e, "LLM call failed");
                Self::BadGateway(format!("llm: {e}"))
            },
            ServiceError::Render(RenderError::InvalidChart(msg)) => Self::BadRequest(msg),
            _ => Self::Internal(err.into()),
        }
    }
}
