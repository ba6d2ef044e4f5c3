/**
 * Login Handler
 *
 * POST /api/users/login
 *
 * Verifies the email and password and returns a JWT plus the user row.
 * Unknown email and wrong password both return the same 401 so the
 * response cannot be used to enumerate accounts.
 */

use axum::extract::State;
use axum::Json;
use bcrypt::verify;
use sqlx::PgPool;

use crate::auth::handlers::types::{AuthResponse, LoginRequest};
use crate::auth::tokens::create_token;
use crate::error::ApiError;
use crate::users::db::get_user_by_email;

/// Authenticate a user and issue a token.
pub async fn login(
    State(pool): State<PgPool>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let email = request.email.trim().to_lowercase();
    tracing::info!(email = %email, "login request");

    let user = get_user_by_email(&pool, &email)
        .await?
        .ok_or_else(|| ApiError::auth("Invalid credentials"))?;

    if !verify(&request.password, &user.password_hash)? {
        tracing::warn!(email = %email, "failed login attempt");
        return Err(ApiError::auth("Invalid credentials"));
    }

    let token = create_token(user.id)?;
    tracing::info!(user_id = %user.id, "user logged in");

    Ok(Json(AuthResponse { token, user }))
}
