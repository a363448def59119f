use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::polymarket::UpstreamError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized")]
    Unauthorized,

    /// Upstream answered with a non-2xx status; the status is passed through.
    #[error("{service} API error: {}", status.as_u16())]
    Upstream {
        service: &'static str,
        status: StatusCode,
    },

    /// Transport or decode failure talking to an upstream.
    #[error("Failed to fetch {0}")]
    Fetch(&'static str),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Collapse an upstream failure into the proxy error envelope for `resource`.
    pub fn from_upstream(service: &'static str, resource: &'static str, err: UpstreamError) -> Self {
        match err {
            UpstreamError::Status(status) => AppError::Upstream { service, status },
            other => {
                tracing::error!(resource, error = %other, "Upstream request failed");
                AppError::Fetch(resource)
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Upstream { status, .. } => *status,
            AppError::Fetch(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let message = match &self {
            AppError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Internal(e.into())
    }
}
