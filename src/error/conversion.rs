/**
 * Error-to-Response Conversion
 *
 * Implements `IntoResponse` for `ApiError` so handlers can return
 * `Result<Json<T>, ApiError>` and have failures rendered uniformly as
 * `{"error": message, "code": code}` with the mapped status.
 */

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::types::ApiError;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Server-side failures are logged with full detail; everything
        // else is expected client behavior and logged at debug.
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("request failed: {:?}", self);
        } else {
            tracing::debug!("request rejected: {}", self);
        }

        let body = Json(json!({
            "error": self.public_message(),
            "code": self.code(),
        }));

        (status, body).into_response()
    }
}

impl From<bcrypt::BcryptError> for ApiError {
    fn from(err: bcrypt::BcryptError) -> Self {
        ApiError::internal(format!("password hashing failed: {err}"))
    }
}

impl From<jsonwebtoken::errors::Error> for ApiError {
    fn from(_: jsonwebtoken::errors::Error) -> Self {
        ApiError::auth("Unauthorized")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_status() {
        let response = ApiError::not_found("Recipe not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = ApiError::conflict("Email already exists").into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_jwt_error_maps_to_auth() {
        let err = jsonwebtoken::decode::<serde_json::Value>(
            "not.a.token",
            &jsonwebtoken::DecodingKey::from_secret(b"secret"),
            &jsonwebtoken::Validation::default(),
        )
        .unwrap_err();

        let api_err: ApiError = err.into();
        assert_eq!(api_err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(api_err.code(), "auth");
    }
}
