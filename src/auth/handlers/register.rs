/**
 * Registration Handler
 *
 * POST /api/users/register
 *
 * 1. Validate name, email, and password
 * 2. Reject duplicate emails with 409
 * 3. Hash the password with bcrypt
 * 4. Insert the user and return the public projection with 201
 *
 * Passwords are hashed with `DEFAULT_COST` and never serialized back.
 */

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use bcrypt::{hash, DEFAULT_COST};
use sqlx::PgPool;

use crate::auth::handlers::types::RegisterRequest;
use crate::error::ApiError;
use crate::users::db::{create_user, get_user_by_email, User};

/// Validate registration fields. Mirrors the login contract: a basic
/// email shape check and a minimum password length.
pub fn validate_registration(name: &str, email: &str, password: &str) -> Result<(), ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::validation("Name is required"));
    }
    if email.trim().is_empty() || !email.contains('@') {
        return Err(ApiError::validation("A valid email is required"));
    }
    if password.len() < 6 {
        return Err(ApiError::validation(
            "Password must be at least 6 characters",
        ));
    }
    Ok(())
}

/// Register a new user.
pub async fn register(
    State(pool): State<PgPool>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    validate_registration(&request.name, &request.email, &request.password)?;

    let email = request.email.trim().to_lowercase();
    tracing::info!(email = %email, "registration request");

    if get_user_by_email(&pool, &email).await?.is_some() {
        return Err(ApiError::conflict("Email already registered"));
    }

    let password_hash = hash(&request.password, DEFAULT_COST)?;
    let user = create_user(&pool, request.name.trim(), &email, &password_hash).await?;

    tracing::info!(user_id = %user.id, "user registered");
    Ok((StatusCode::CREATED, Json(user)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_blank_name() {
        assert!(validate_registration("  ", "a@b.com", "secret1").is_err());
    }

    #[test]
    fn test_rejects_malformed_email() {
        assert!(validate_registration("Asha", "not-an-email", "secret1").is_err());
        assert!(validate_registration("Asha", "", "secret1").is_err());
    }

    #[test]
    fn test_rejects_short_password() {
        assert!(validate_registration("Asha", "a@b.com", "short").is_err());
    }

    #[test]
    fn test_accepts_valid_fields() {
        assert!(validate_registration("Asha", "asha@example.com", "secret1").is_ok());
    }
}
