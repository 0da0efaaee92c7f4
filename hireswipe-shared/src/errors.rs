use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::types::ApiErrorResponse;

/// Application error codes following the pattern E{range}{sequence}
///
/// Ranges:
/// - E0xxx: Shared/infrastructure errors
/// - E1xxx: Identity errors
/// - E2xxx: Swipe errors
/// - E3xxx: Match errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Shared (E0xxx)
    InternalError,
    ValidationError,
    Unauthorized,
    Forbidden,
    ServiceUnavailable,
    BadRequest,

    // Identity (E1xxx)
    TokenExpired,
    TokenInvalid,
    NotAnEmployer,
    NotAnApplicant,

    // Swipe (E2xxx)
    InvalidSwipeType,
    AlreadySwiped,
    ApplicantNotFound,
    EmployerNotFound,
    JobPostingNotFound,
    InvalidPagination,

    // Match (E3xxx)
    MatchNotFound,
}

impl ErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            // Shared
            Self::InternalError => "E0001",
            Self::ValidationError => "E0002",
            Self::Unauthorized => "E0004",
            Self::Forbidden => "E0005",
            Self::ServiceUnavailable => "E0007",
            Self::BadRequest => "E0008",

            // Identity
            Self::TokenExpired => "E1004",
            Self::TokenInvalid => "E1005",
            Self::NotAnEmployer => "E1101",
            Self::NotAnApplicant => "E1102",

            // Swipe
            Self::InvalidSwipeType => "E2001",
            Self::AlreadySwiped => "E2002",
            Self::ApplicantNotFound => "E2003",
            Self::EmployerNotFound => "E2004",
            Self::JobPostingNotFound => "E2005",
            Self::InvalidPagination => "E2006",

            // Match
            Self::MatchNotFound => "E3004",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InternalError | Self::ServiceUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ValidationError | Self::BadRequest | Self::InvalidSwipeType
            | Self::InvalidPagination => StatusCode::BAD_REQUEST,
            Self::ApplicantNotFound | Self::EmployerNotFound
            | Self::JobPostingNotFound | Self::MatchNotFound => StatusCode::NOT_FOUND,
            Self::Unauthorized | Self::TokenExpired | Self::TokenInvalid
            | Self::NotAnEmployer | Self::NotAnApplicant => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::AlreadySwiped => StatusCode::CONFLICT,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Known {
        code: ErrorCode,
        message: String,
        details: Option<serde_json::Value>,
    },

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Known {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(code: ErrorCode, message: impl Into<String>, details: serde_json::Value) -> Self {
        Self::Known {
            code,
            message: message.into(),
            details: Some(details),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BadRequest, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Error code carried by this error, as rendered to clients.
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Known { code, .. } => *code,
            AppError::Internal(_) => ErrorCode::InternalError,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match &self {
            AppError::Known { code, message, details } => {
                let status = code.status_code();
                if status.is_server_error() {
                    tracing::error!(code = code.code(), error = %message, "request failed");
                }
                let mut resp = ApiErrorResponse::new(code.code(), message);
                if let Some(d) = details {
                    resp = resp.with_details(d.clone());
                }
                (status, resp)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorResponse::new("E0001", "internal server error"),
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(err: AppError) -> serde_json::Value {
        let response = err.into_response();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn known_error_renders_code_and_message() {
        let value = body_json(AppError::new(ErrorCode::AlreadySwiped, "already swiped")).await;

        assert_eq!(value["success"], false);
        assert_eq!(value["error"]["code"], "E2002");
        assert_eq!(value["error"]["message"], "already swiped");
        assert!(value["error"].get("details").is_none());
    }

    #[tokio::test]
    async fn details_are_included_when_present() {
        let err = AppError::with_details(
            ErrorCode::ValidationError,
            "bad page",
            serde_json::json!({ "field": "page" }),
        );
        let value = body_json(err).await;
        assert_eq!(value["error"]["details"]["field"], "page");
    }

    #[test]
    fn taxonomy_maps_to_distinct_statuses() {
        assert_eq!(ErrorCode::NotAnEmployer.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ErrorCode::InvalidSwipeType.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::AlreadySwiped.status_code(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::ApplicantNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::InternalError.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn internal_errors_hide_their_cause() {
        let response = AppError::Internal(anyhow::anyhow!("pool exhausted")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
