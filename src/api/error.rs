use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::{ApiResponse, ReviewEligibilityDto};
use crate::domain::WatchingStatus;
use crate::services::WatchingStateError;

#[derive(Debug)]
pub enum ApiError {
    DatabaseError(String),

    ValidationError(String),

    ReviewNotAllowed {
        message: String,
        current: WatchingStatus,
    },

    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::ValidationError(msg) => write!(f, "Validation error: {msg}"),
            Self::ReviewNotAllowed { message, .. } => write!(f, "Review not allowed: {message}"),
            Self::InternalError(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            Self::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            Self::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::ReviewNotAllowed { message, current } => {
                let body = ReviewEligibilityDto::denied(message, current);
                return (StatusCode::BAD_REQUEST, Json(body)).into_response();
            }
            Self::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ApiResponse::<()>::error(error_message);
        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::InternalError(err.to_string())
    }
}

impl From<WatchingStateError> for ApiError {
    fn from(err: WatchingStateError) -> Self {
        match err {
            WatchingStateError::InvalidArgument(msg) => Self::ValidationError(msg),
            WatchingStateError::ReviewNotAllowed(denied) => Self::ReviewNotAllowed {
                message: denied.to_string(),
                current: denied.current,
            },
            WatchingStateError::Database(msg) => Self::DatabaseError(msg),
        }
    }
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::watching::ReviewNotAllowed;

    #[test]
    fn invalid_argument_maps_to_bad_request() {
        let err: ApiError = WatchingStateError::invalid("Series with ID 9 does not exist").into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn review_not_allowed_maps_to_bad_request() {
        let err: ApiError = WatchingStateError::from(ReviewNotAllowed {
            current: WatchingStatus::InProgress,
        })
        .into();
        assert!(matches!(
            err,
            ApiError::ReviewNotAllowed {
                current: WatchingStatus::InProgress,
                ..
            }
        ));
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn database_errors_are_masked() {
        let err: ApiError = WatchingStateError::Database("disk I/O error".into()).into();
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
