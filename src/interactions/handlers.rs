/**
 * Interaction Handlers
 *
 * - `POST /api/recipes/{id}/like` - toggle like
 * - `POST /api/recipes/{id}/save` - toggle save
 * - `POST /api/recipes/{id}/review` - add a review
 * - `POST /api/recipes/made-it` - mark a recipe as cooked
 * - `POST /api/users/follow/{author_id}` - toggle follow
 *
 * All routes require authentication.
 */

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::ApiError;
use crate::interactions::service;
use crate::interactions::service::NewReview;
use crate::middleware::auth::AuthUser;
use crate::recipes::db::Recipe;
use crate::server::state::AppState;
use crate::users::db::UserProfile;

/// Toggle the caller's like on a recipe.
pub async fn like_recipe(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(recipe_id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let outcome = service::like_or_unlike(&state.pool, &state.push, &user, recipe_id).await?;

    let message = if outcome.liked {
        "Recipe liked"
    } else {
        "Recipe unliked"
    };

    Ok(Json(json!({
        "message": message,
        "liked": outcome.liked,
        "likes": outcome.likes,
        "likedRecipes": outcome.liked_recipes,
    })))
}

/// Toggle the caller's save on a recipe.
pub async fn save_recipe(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(recipe_id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let outcome = service::save_or_unsave(&state.pool, &user, recipe_id).await?;

    Ok(Json(json!({
        "message": "Updated",
        "saved": outcome.saved,
        "savesCount": outcome.saves_count,
        "savedRecipes": outcome.saved_recipes,
    })))
}

/// Add a review to a recipe.
pub async fn review_recipe(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(recipe_id): Path<Uuid>,
    Json(review): Json<NewReview>,
) -> Result<Json<Recipe>, ApiError> {
    let recipe =
        service::add_review(&state.pool, &state.push, &user, recipe_id, &review).await?;
    Ok(Json(recipe))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MadeItRequest {
    pub recipe_id: Uuid,
}

/// Mark a recipe as cooked by the caller.
pub async fn mark_made_it(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(body): Json<MadeItRequest>,
) -> Result<Json<Recipe>, ApiError> {
    let recipe = service::mark_made_it(&state.pool, &user, body.recipe_id).await?;
    Ok(Json(recipe))
}

/// Toggle the caller's follow on another user.
pub async fn follow_user(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(author_id): Path<Uuid>,
) -> Result<Json<UserProfile>, ApiError> {
    let profile =
        service::follow_or_unfollow(&state.pool, &state.push, &user, author_id).await?;
    Ok(Json(profile))
}
