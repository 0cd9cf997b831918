use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::auth::validate::ValidationError;

/// Every failure a handler can surface, mapped to one HTTP response.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Incorrect password")]
    IncorrectPassword,

    #[error("{0}")]
    NotFound(String),

    #[error("Authentication token is missing")]
    AuthMissing,

    #[error("Invalid token format")]
    AuthInvalidFormat,

    #[error("Token has expired")]
    AuthExpired,

    #[error("Invalid token")]
    AuthInvalid,

    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            // The wire contract maps duplicate email to 400, not 409.
            ApiError::Validation(_) | ApiError::Conflict(_) | ApiError::IncorrectPassword => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::AuthMissing | ApiError::AuthInvalidFormat | ApiError::AuthExpired => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::AuthInvalid => StatusCode::FORBIDDEN,
            ApiError::Internal(source) => {
                tracing::error!(error = %source, "internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ErrorBody {
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("User not found".into()),
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
                ApiError::Conflict("Email already exists, please use a different email".into())
            }
            other => ApiError::Internal(other.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_400() {
        let res = ApiError::Validation("Invalid email format".into()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn conflict_maps_to_400() {
        let res = ApiError::Conflict("Email already exists".into()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_maps_to_404() {
        let res = ApiError::NotFound("User not found".into()).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn auth_errors_map_to_401_and_403() {
        assert_eq!(
            ApiError::AuthMissing.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::AuthInvalidFormat.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::AuthExpired.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::AuthInvalid.into_response().status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn internal_maps_to_500() {
        let res = ApiError::Internal(anyhow::anyhow!("boom")).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
