/**
 * Grocery List Handlers
 *
 * - `GET /api/grocery` - the caller's list
 * - `POST /api/grocery/item` - add items (merging duplicates)
 * - `PATCH /api/grocery/item` - update one item
 * - `DELETE /api/grocery/item/{item_id}` - remove one item
 *
 * All routes require authentication.
 */

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiError;
use crate::grocery::db::{
    add_item, delete_item, list_items, update_item, GroceryItem, GroceryItemUpdate, NewGroceryItem,
};
use crate::middleware::auth::AuthUser;

#[derive(Debug, Deserialize)]
pub struct AddItemsRequest {
    pub items: Option<Vec<NewGroceryItem>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemRequest {
    pub item_id: Uuid,
    #[serde(flatten)]
    pub updates: GroceryItemUpdate,
}

/// The caller's grocery list. Empty list when none.
pub async fn get_grocery_list(
    State(pool): State<PgPool>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<GroceryItem>>, ApiError> {
    Ok(Json(list_items(&pool, user.id).await?))
}

/// Add items to the caller's list, merging duplicates, and return the
/// updated list.
pub async fn add_grocery_items(
    State(pool): State<PgPool>,
    AuthUser(user): AuthUser,
    Json(request): Json<AddItemsRequest>,
) -> Result<(StatusCode, Json<Vec<GroceryItem>>), ApiError> {
    let items = request
        .items
        .ok_or_else(|| ApiError::validation("Items array is required"))?;

    for item in &items {
        if item.name.trim().is_empty() {
            return Err(ApiError::validation("Item name must not be empty"));
        }
    }

    for item in &items {
        add_item(&pool, user.id, item).await?;
    }

    let list = list_items(&pool, user.id).await?;
    Ok((StatusCode::CREATED, Json(list)))
}

/// Update one of the caller's items.
pub async fn update_grocery_item(
    State(pool): State<PgPool>,
    AuthUser(user): AuthUser,
    Json(request): Json<UpdateItemRequest>,
) -> Result<Json<Vec<GroceryItem>>, ApiError> {
    let updated = update_item(&pool, user.id, request.item_id, &request.updates).await?;
    if !updated {
        return Err(ApiError::not_found("Grocery item not found"));
    }

    Ok(Json(list_items(&pool, user.id).await?))
}

/// Delete one of the caller's items.
pub async fn delete_grocery_item(
    State(pool): State<PgPool>,
    AuthUser(user): AuthUser,
    Path(item_id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let deleted = delete_item(&pool, user.id, item_id).await?;
    if !deleted {
        return Err(ApiError::not_found("Grocery item not found"));
    }

    Ok(Json(json!({ "message": "Item deleted" })))
}
