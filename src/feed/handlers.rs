/**
 * Feed Handlers
 *
 * - `GET /api/recipes/search` - paginated title/category search
 * - `GET /api/recipes/week` - top 5 by likes
 * - `GET /api/recipes/popular` - classifier-selected recipes
 * - `POST /api/recipes/suggest` - rank recipes by ingredient overlap
 * - `GET /api/recipes/saved|liked|made-it` - the caller's collections
 * - `GET /api/category/{category}` - paginated category listing
 */

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use sqlx::PgPool;

use crate::error::ApiError;
use crate::feed::service;
use crate::feed::service::{Page, SuggestedRecipe};
use crate::middleware::auth::AuthUser;
use crate::recipes::db::Recipe;

const DEFAULT_PAGE_SIZE: i64 = 10;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub category: String,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SuggestRequest {
    pub ingredients: Option<Vec<String>>,
}

/// Search recipes by title substring and/or category.
pub async fn search_recipes(
    State(pool): State<PgPool>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Page>, ApiError> {
    let page = service::search(
        &pool,
        &params.q,
        &params.category,
        params.page.unwrap_or(1),
        params.limit.unwrap_or(DEFAULT_PAGE_SIZE),
    )
    .await?;
    Ok(Json(page))
}

/// The five most-liked recipes.
pub async fn get_recipes_of_the_week(
    State(pool): State<PgPool>,
) -> Result<Json<Vec<Recipe>>, ApiError> {
    Ok(Json(service::recipes_of_the_week(&pool).await?))
}

/// Recipes passing the popularity rules.
pub async fn get_popular_recipes(
    State(pool): State<PgPool>,
) -> Result<Json<Vec<Recipe>>, ApiError> {
    Ok(Json(service::popular_recipes(&pool).await?))
}

/// Rank recipes by how many of the caller's ingredients they use.
pub async fn suggest_recipes(
    State(pool): State<PgPool>,
    Json(body): Json<SuggestRequest>,
) -> Result<Json<Vec<SuggestedRecipe>>, ApiError> {
    let ingredients = body
        .ingredients
        .ok_or_else(|| ApiError::validation("Ingredients list is required"))?;

    Ok(Json(service::suggested_recipes(&pool, &ingredients).await?))
}

/// The caller's saved recipes. Empty list when none.
pub async fn get_saved_recipes(
    State(pool): State<PgPool>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<Recipe>>, ApiError> {
    Ok(Json(service::saved_recipes(&pool, user.id).await?))
}

/// The caller's liked recipes. Empty list when none.
pub async fn get_liked_recipes(
    State(pool): State<PgPool>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<Recipe>>, ApiError> {
    Ok(Json(service::liked_recipes(&pool, user.id).await?))
}

/// The recipes the caller has cooked. Empty list when none.
pub async fn get_made_it_recipes(
    State(pool): State<PgPool>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<Recipe>>, ApiError> {
    Ok(Json(service::made_it_recipes(&pool, user.id).await?))
}

/// Paginated listing for one category.
pub async fn get_category_recipes(
    State(pool): State<PgPool>,
    Path(category): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page>, ApiError> {
    let page = service::category_recipes(
        &pool,
        &category,
        params.page.unwrap_or(1),
        params.limit.unwrap_or(DEFAULT_PAGE_SIZE),
    )
    .await?;
    Ok(Json(page))
}
