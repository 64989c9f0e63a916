//! API error envelope.
//!
//! # Invariants
//! - Every failure renders as `{"status":"error","message":...}`.
//! - Client mistakes map to `400`; everything else maps to `500`.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use clinic_core::{error_code, RepoError};
use log::{error, warn};
use serde_json::json;
use std::fmt::{Display, Formatter};

/// Failure returned by any route handler.
#[derive(Debug)]
pub enum ApiError {
    /// Core data-access failure.
    Repo(RepoError),
    /// Request body could not be decoded.
    BadRequest(String),
    /// Blocking task panicked or was cancelled.
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Repo(err) if err.is_client_error() => StatusCode::BAD_REQUEST,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Repo(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::Repo(err) => error_code(err),
            Self::BadRequest(_) => "bad_request",
            Self::Internal(_) => "internal",
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::BadRequest(message) | Self::Internal(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::BadRequest(_) | Self::Internal(_) => None,
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        Self::BadRequest(value.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(
                "event=http_error module=http status={} error_code={}",
                status.as_u16(),
                self.code()
            );
        } else {
            warn!(
                "event=http_error module=http status={} error_code={}",
                status.as_u16(),
                self.code()
            );
        }

        let body = json!({ "status": "error", "message": self.to_string() });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinic_core::ValidationError;

    #[test]
    fn client_errors_map_to_bad_request() {
        let err = ApiError::from(RepoError::from(ValidationError::EmptyField("name")));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);

        let err = ApiError::from(RepoError::ReferenceNotFound {
            table: "patients",
            id: 3,
        });
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "reference_not_found");
    }

    #[test]
    fn other_failures_map_to_server_error() {
        let err = ApiError::from(RepoError::MissingRequiredTable("billing"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let err = ApiError::Internal("task cancelled".to_string());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "task cancelled");
    }
}
