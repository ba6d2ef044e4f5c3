/**
 * Recipe CRUD Handlers
 *
 * - `POST /api/recipes` - create (auth)
 * - `GET /api/recipes` - list all (public)
 * - `GET /api/recipes/{id}` - fetch one (public)
 * - `PUT /api/recipes/{id}` - update own recipe (auth)
 * - `DELETE /api/recipes/{id}` - delete own recipe (auth)
 *
 * Updates and deletes are restricted to the recipe's author.
 */

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::recipes::db::{
    delete_recipe, get_recipe, insert_recipe, list_all, update_recipe, NewRecipe, Recipe,
    RecipeUpdate,
};

fn validate_new_recipe(new: &NewRecipe) -> Result<(), ApiError> {
    if new.title.trim().is_empty()
        || new.description.trim().is_empty()
        || new.instructions.trim().is_empty()
        || new.ingredients.is_empty()
    {
        return Err(ApiError::validation("Missing required fields"));
    }
    if new.ingredients.iter().any(|i| i.name.trim().is_empty()) {
        return Err(ApiError::validation("Ingredient names must not be empty"));
    }
    Ok(())
}

/// Create a recipe authored by the caller.
pub async fn add_recipe(
    State(pool): State<PgPool>,
    AuthUser(user): AuthUser,
    Json(new): Json<NewRecipe>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    validate_new_recipe(&new)?;

    let recipe = insert_recipe(&pool, user.id, &user.name, &user.image, &new).await?;
    tracing::info!("Recipe {} created by {}", recipe.id, user.id);

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Recipe created successfully", "recipe": recipe })),
    ))
}

/// List all recipes, newest first.
pub async fn get_all(State(pool): State<PgPool>) -> Result<Json<Vec<Recipe>>, ApiError> {
    let recipes = list_all(&pool).await?;
    Ok(Json(recipes))
}

/// Fetch a single recipe.
pub async fn get_one(
    State(pool): State<PgPool>,
    Path(id): Path<Uuid>,
) -> Result<Json<Recipe>, ApiError> {
    let recipe = get_recipe(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Recipe not found"))?;
    Ok(Json(recipe))
}

/// Update a recipe the caller authored.
pub async fn update(
    State(pool): State<PgPool>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<RecipeUpdate>,
) -> Result<Json<Recipe>, ApiError> {
    let existing = get_recipe(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Recipe not found"))?;
    if existing.user != user.id {
        return Err(ApiError::invalid_operation(
            "Only the author can update this recipe",
        ));
    }

    let recipe = update_recipe(&pool, id, &body)
        .await?
        .ok_or_else(|| ApiError::not_found("Recipe not found"))?;
    Ok(Json(recipe))
}

/// Delete a recipe the caller authored.
pub async fn delete_one(
    State(pool): State<PgPool>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let existing = get_recipe(&pool, id)
        .await?
        .ok_or_else(|| ApiError::not_found("Recipe not found"))?;
    if existing.user != user.id {
        return Err(ApiError::invalid_operation(
            "Only the author can delete this recipe",
        ));
    }

    delete_recipe(&pool, id).await?;
    tracing::info!("Recipe {} deleted by {}", id, user.id);
    Ok(Json(json!({ "message": "Recipe deleted" })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipes::db::Ingredient;

    fn valid_recipe() -> NewRecipe {
        serde_json::from_value(serde_json::json!({
            "title": "Dal",
            "description": "Simple lentil dal",
            "ingredients": [{"name": "lentils", "quantity": "1 cup"}],
            "instructions": "Boil the lentils.",
            "category": "dinner",
            "level": "easy"
        }))
        .unwrap()
    }

    #[test]
    fn test_valid_recipe_passes() {
        assert!(validate_new_recipe(&valid_recipe()).is_ok());
    }

    #[test]
    fn test_blank_title_rejected() {
        let mut new = valid_recipe();
        new.title = "   ".to_string();
        assert!(validate_new_recipe(&new).is_err());
    }

    #[test]
    fn test_empty_ingredients_rejected() {
        let mut new = valid_recipe();
        new.ingredients.clear();
        assert!(validate_new_recipe(&new).is_err());
    }

    #[test]
    fn test_unnamed_ingredient_rejected() {
        let mut new = valid_recipe();
        new.ingredients.push(Ingredient {
            name: "".to_string(),
            quantity: "2".to_string(),
        });
        assert!(validate_new_recipe(&new).is_err());
    }
}
