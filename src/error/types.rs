/**
 * Error Taxonomy
 *
 * One enum covers every failure a request handler can return:
 *
 * - `Validation` - missing or malformed required fields (400)
 * - `Auth` - missing, invalid, or expired bearer token (401)
 * - `NotFound` - a referenced user/recipe/item is absent (404)
 * - `Conflict` - duplicate email on registration (409)
 * - `InvalidOperation` - self-referential actions such as self-follow (400)
 * - `Database` / `Internal` - unexpected persistence failures (500)
 *
 * Database errors keep their source for logging but are rendered with a
 * generic message so internals never leak into response bodies.
 */

use axum::http::StatusCode;
use thiserror::Error;

/// Error type returned by all request handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed required fields
    #[error("{0}")]
    Validation(String),

    /// Missing, invalid, or expired credentials
    #[error("{0}")]
    Auth(String),

    /// Referenced entity does not exist
    #[error("{0}")]
    NotFound(String),

    /// Uniqueness violation (e.g. duplicate email)
    #[error("{0}")]
    Conflict(String),

    /// Structurally valid request that is not allowed (e.g. self-follow)
    #[error("{0}")]
    InvalidOperation(String),

    /// Persistence failure
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Any other unexpected failure
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidOperation(_) => StatusCode::BAD_REQUEST,
            Self::Auth(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code included in the response body
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Auth(_) => "auth",
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::InvalidOperation(_) => "invalid_operation",
            Self::Database(_) | Self::Internal(_) => "internal",
        }
    }

    /// Message rendered into the response body.
    ///
    /// Internal failures get a generic message; the underlying cause is
    /// logged at the conversion site instead.
    pub fn public_message(&self) -> String {
        match self {
            Self::Database(_) | Self::Internal(_) => "internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(
            ApiError::validation("missing field").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::auth("unauthorized").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::not_found("recipe not found").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::conflict("email exists").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::invalid_operation("cannot follow yourself").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::internal("boom").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_stable_codes() {
        assert_eq!(ApiError::validation("x").code(), "validation");
        assert_eq!(ApiError::auth("x").code(), "auth");
        assert_eq!(ApiError::not_found("x").code(), "not_found");
        assert_eq!(ApiError::conflict("x").code(), "conflict");
        assert_eq!(ApiError::invalid_operation("x").code(), "invalid_operation");
        assert_eq!(ApiError::internal("x").code(), "internal");
    }

    #[test]
    fn test_internal_message_is_generic() {
        let err = ApiError::internal("connection pool exhausted");
        assert_eq!(err.public_message(), "internal server error");

        let err = ApiError::Database(sqlx::Error::RowNotFound);
        assert_eq!(err.public_message(), "internal server error");
    }

    #[test]
    fn test_client_errors_keep_their_message() {
        let err = ApiError::not_found("Recipe not found");
        assert_eq!(err.public_message(), "Recipe not found");
    }

    #[test]
    fn test_from_sqlx_error() {
        let err: ApiError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, ApiError::Database(_)));
    }
}
