/**
 * Grocery List Model and Database Operations
 *
 * Items are per-user rows. Adding an item that matches an existing one
 * (same name ignoring case, same source recipe) merges instead of
 * duplicating: numeric quantities are summed, anything else keeps the
 * existing quantity.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct GroceryItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub quantity: String,
    pub category: Option<String>,
    pub recipe_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Fields accepted when adding an item.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGroceryItem {
    pub name: String,
    #[serde(default)]
    pub quantity: String,
    pub category: Option<String>,
    pub recipe_id: Option<Uuid>,
}

/// Partial update for an existing item.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroceryItemUpdate {
    pub name: Option<String>,
    pub quantity: Option<String>,
    pub category: Option<String>,
}

/// Merge two quantity strings. Both numeric means sum; otherwise the
/// existing quantity wins (units like "2 cups" are not arithmetic).
pub fn merge_quantities(existing: &str, incoming: &str) -> String {
    match (
        existing.trim().parse::<f64>(),
        incoming.trim().parse::<f64>(),
    ) {
        (Ok(a), Ok(b)) => {
            let sum = a + b;
            if sum.fract() == 0.0 {
                format!("{}", sum as i64)
            } else {
                format!("{sum}")
            }
        }
        _ => existing.to_string(),
    }
}

/// All of a user's items, oldest first.
pub async fn list_items(pool: &PgPool, user_id: Uuid) -> Result<Vec<GroceryItem>, sqlx::Error> {
    sqlx::query_as::<_, GroceryItem>(
        r#"
        SELECT id, user_id, name, quantity, category, recipe_id, created_at
        FROM grocery_items
        WHERE user_id = $1
        ORDER BY created_at, id
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Add one item, merging into an existing row when the name (case
/// insensitive) and source recipe both match.
pub async fn add_item(
    pool: &PgPool,
    user_id: Uuid,
    item: &NewGroceryItem,
) -> Result<(), sqlx::Error> {
    let existing = sqlx::query_as::<_, GroceryItem>(
        r#"
        SELECT id, user_id, name, quantity, category, recipe_id, created_at
        FROM grocery_items
        WHERE user_id = $1
          AND LOWER(name) = LOWER($2)
          AND recipe_id IS NOT DISTINCT FROM $3
        "#,
    )
    .bind(user_id)
    .bind(item.name.trim())
    .bind(item.recipe_id)
    .fetch_optional(pool)
    .await?;

    match existing {
        Some(row) => {
            let merged = merge_quantities(&row.quantity, &item.quantity);
            sqlx::query("UPDATE grocery_items SET quantity = $2 WHERE id = $1")
                .bind(row.id)
                .bind(merged)
                .execute(pool)
                .await?;
        }
        None => {
            sqlx::query(
                r#"
                INSERT INTO grocery_items (id, user_id, name, quantity, category, recipe_id, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(item.name.trim())
            .bind(item.quantity.trim())
            .bind(item.category.as_deref())
            .bind(item.recipe_id)
            .bind(Utc::now())
            .execute(pool)
            .await?;
        }
    }

    Ok(())
}

/// Update one of the user's items; returns `false` if it isn't theirs.
pub async fn update_item(
    pool: &PgPool,
    user_id: Uuid,
    item_id: Uuid,
    updates: &GroceryItemUpdate,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE grocery_items
        SET name = COALESCE($3, name),
            quantity = COALESCE($4, quantity),
            category = COALESCE($5, category)
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(item_id)
    .bind(user_id)
    .bind(updates.name.as_deref())
    .bind(updates.quantity.as_deref())
    .bind(updates.category.as_deref())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Delete one of the user's items; returns `false` if it isn't theirs.
pub async fn delete_item(pool: &PgPool, user_id: Uuid, item_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM grocery_items WHERE id = $1 AND user_id = $2")
        .bind(item_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() == 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_sums_numeric_quantities() {
        assert_eq!(merge_quantities("2", "3"), "5");
        assert_eq!(merge_quantities("1.5", "1"), "2.5");
        assert_eq!(merge_quantities(" 4 ", "2"), "6");
    }

    #[test]
    fn test_merge_keeps_existing_for_non_numeric() {
        assert_eq!(merge_quantities("2 cups", "1 cup"), "2 cups");
        assert_eq!(merge_quantities("a pinch", "2"), "a pinch");
        assert_eq!(merge_quantities("3", "a dash"), "3");
    }

    #[test]
    fn test_merge_integer_sum_has_no_decimal_point() {
        assert_eq!(merge_quantities("1.5", "0.5"), "2");
    }
}
