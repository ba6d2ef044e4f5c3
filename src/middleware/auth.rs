/**
 * Authentication Middleware
 *
 * Protects routes that require a signed-in user:
 *
 * 1. Extracts the JWT from the `Authorization: Bearer <token>` header
 * 2. Verifies the token signature and expiry
 * 3. Loads the full user row for the token's subject
 * 4. Attaches the user to request extensions for handlers
 *
 * Any failure yields 401 with the standard error body. The `AuthUser`
 * extractor reuses the user stashed by the middleware when present, and
 * authenticates from scratch otherwise, so handlers on mixed
 * public/protected paths can demand authentication directly.
 */

use axum::{
    extract::{FromRequestParts, Request, State},
    http::header::AUTHORIZATION,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::tokens::verify_token;
use crate::error::ApiError;
use crate::server::state::AppState;
use crate::users::db::{get_user_by_id, User};

/// The authenticated caller, resolved from the bearer token.
#[derive(Clone, Debug)]
pub struct AuthUser(pub User);

/// Resolve the `Authorization` header to a live user row.
pub async fn authenticate(pool: &PgPool, headers: &HeaderMap) -> Result<User, ApiError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            tracing::debug!("Missing Authorization header");
            ApiError::auth("Unauthorized")
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        tracing::debug!("Invalid Authorization header format");
        ApiError::auth("Unauthorized")
    })?;

    let claims = verify_token(token).map_err(|e| {
        tracing::debug!("Invalid token: {:?}", e);
        ApiError::auth("Unauthorized")
    })?;

    let user_id = Uuid::parse_str(&claims.sub).map_err(|e| {
        tracing::warn!("Malformed user id in token: {:?}", e);
        ApiError::auth("Unauthorized")
    })?;

    get_user_by_id(pool, user_id).await?.ok_or_else(|| {
        tracing::debug!("Token subject {} no longer exists", user_id);
        ApiError::auth("Unauthorized")
    })
}

/// Bearer-token authentication middleware.
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = authenticate(&app_state.pool, request.headers()).await?;
    request.extensions_mut().insert(AuthUser(user));
    Ok(next.run(request).await)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let user = authenticate(&state.pool, &parts.headers).await?;
        Ok(AuthUser(user))
    }
}
