/**
 * Meal Plan Handlers
 *
 * - `GET /api/mealplan` - the caller's plan (404 if never saved)
 * - `POST /api/mealplan` - save the whole plan
 *
 * Both routes require authentication.
 */

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;
use sqlx::PgPool;

use crate::error::ApiError;
use crate::mealplans::db::{get_plan, upsert_plan, MealPlan};
use crate::middleware::auth::AuthUser;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavePlanRequest {
    pub week_start: Option<String>,
    pub meals: Option<Value>,
}

/// The caller's meal plan.
pub async fn get_meal_plan(
    State(pool): State<PgPool>,
    AuthUser(user): AuthUser,
) -> Result<Json<MealPlan>, ApiError> {
    get_plan(&pool, user.id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Meal plan not found"))
}

/// Save (insert or replace) the caller's meal plan.
pub async fn save_meal_plan(
    State(pool): State<PgPool>,
    AuthUser(user): AuthUser,
    Json(request): Json<SavePlanRequest>,
) -> Result<Json<MealPlan>, ApiError> {
    let week_start = request
        .week_start
        .ok_or_else(|| ApiError::validation("Week start is required"))?;
    let meals = request
        .meals
        .ok_or_else(|| ApiError::validation("Meals are required"))?;

    let plan = upsert_plan(&pool, user.id, &week_start, &meals).await?;
    Ok(Json(plan))
}
