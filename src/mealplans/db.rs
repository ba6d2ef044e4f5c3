/**
 * Meal Plan Model and Database Operations
 *
 * Each user has at most one plan: a week start marker plus a JSON map of
 * day to {breakfast, lunch, dinner} recipe references. Saves replace the
 * whole document, keyed on the user.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MealPlan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub week_start: String,
    /// Day name to meal-slot map, stored as JSONB
    pub meals: Json<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The user's plan, if any.
pub async fn get_plan(pool: &PgPool, user_id: Uuid) -> Result<Option<MealPlan>, sqlx::Error> {
    sqlx::query_as::<_, MealPlan>(
        r#"
        SELECT id, user_id, week_start, meals, created_at, updated_at
        FROM meal_plans
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Insert or replace the user's plan.
pub async fn upsert_plan(
    pool: &PgPool,
    user_id: Uuid,
    week_start: &str,
    meals: &Value,
) -> Result<MealPlan, sqlx::Error> {
    let now = Utc::now();

    sqlx::query_as::<_, MealPlan>(
        r#"
        INSERT INTO meal_plans (id, user_id, week_start, meals, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $5)
        ON CONFLICT (user_id) DO UPDATE
        SET week_start = EXCLUDED.week_start,
            meals = EXCLUDED.meals,
            updated_at = EXCLUDED.updated_at
        RETURNING id, user_id, week_start, meals, created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(week_start)
    .bind(Json(meals.clone()))
    .bind(now)
    .fetch_one(pool)
    .await
}
