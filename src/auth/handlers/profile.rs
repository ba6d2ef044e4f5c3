/**
 * Profile Handlers
 *
 * - `GET /api/users/{user_id}` - public profile with follow lists
 * - `PUT /api/users/profile` - update name and/or phone
 * - `POST /api/users/profile-image` - update the profile image URI
 * - `PUT /api/users/update-expo-token` - store the push token
 */

use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::handlers::types::{ExpoTokenRequest, ProfileImageRequest, UpdateProfileRequest};
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::users::db::{
    self, get_profile, update_expo_token, update_profile, update_profile_image, User, UserProfile,
};

/// Public profile lookup. Never includes the password hash.
pub async fn get_user_profile(
    State(pool): State<PgPool>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserProfile>, ApiError> {
    get_profile(&pool, user_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("User not found"))
}

/// Update the caller's name and/or phone.
pub async fn update_user_profile(
    State(pool): State<PgPool>,
    AuthUser(user): AuthUser,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<User>, ApiError> {
    if request.name.is_none() && request.phone.is_none() {
        return Err(ApiError::validation("Nothing to update"));
    }

    update_profile(
        &pool,
        user.id,
        request.name.as_deref(),
        request.phone.as_deref(),
    )
    .await?
    .map(Json)
    .ok_or_else(|| ApiError::not_found("User not found"))
}

/// Replace the caller's profile image URI.
pub async fn update_user_profile_image(
    State(pool): State<PgPool>,
    AuthUser(user): AuthUser,
    Json(request): Json<ProfileImageRequest>,
) -> Result<Json<User>, ApiError> {
    let image = request
        .image_uri
        .ok_or_else(|| ApiError::validation("Image URI is required"))?;

    update_profile_image(&pool, user.id, &image)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("User not found"))
}

/// Store the caller's Expo push token.
pub async fn update_user_expo_token(
    State(pool): State<PgPool>,
    AuthUser(user): AuthUser,
    Json(request): Json<ExpoTokenRequest>,
) -> Result<Json<Value>, ApiError> {
    let token = request
        .expo_token
        .ok_or_else(|| ApiError::validation("Expo token is required"))?;

    update_expo_token(&pool, user.id, &token).await?;
    tracing::debug!(user_id = %user.id, "expo token updated");

    Ok(Json(json!({ "message": "Expo token updated" })))
}

/// The caller's own profile.
pub async fn get_me(
    State(pool): State<PgPool>,
    AuthUser(user): AuthUser,
) -> Result<Json<UserProfile>, ApiError> {
    db::get_profile(&pool, user.id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("User not found"))
}
