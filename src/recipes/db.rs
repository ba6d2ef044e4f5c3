/**
 * Recipe Model and Database Operations
 *
 * A recipe is one row plus an ordered ingredient list and a review list
 * in side tables. The `likes` and `saves_count` columns are caches of
 * the corresponding edge tables, maintained by the interaction service
 * in the same transaction as the edge mutation and repairable with
 * `reconcile_counters`.
 *
 * Author name/image are denormalized snapshots taken at creation time,
 * as are reviewer name/image on reviews; neither is re-synced when a
 * user later edits their profile.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use uuid::Uuid;

/// Meal category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
    Dessert,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
            Self::Snack => "snack",
            Self::Dessert => "dessert",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "breakfast" => Some(Self::Breakfast),
            "lunch" => Some(Self::Lunch),
            "dinner" => Some(Self::Dinner),
            "snack" => Some(Self::Snack),
            "dessert" => Some(Self::Dessert),
            _ => None,
        }
    }
}

/// Difficulty level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Easy,
    Medium,
    Hard,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }
}

/// One entry in a recipe's ordered ingredient list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    #[serde(default)]
    pub quantity: String,
}

/// A review with the reviewer's name/image snapshotted at write time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub user: Uuid,
    pub rating: i32,
    pub comment: String,
    pub user_name: String,
    pub user_image: String,
    pub created_at: DateTime<Utc>,
}

/// Full recipe as served by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: Uuid,
    /// Author user id
    pub user: Uuid,
    pub author_name: String,
    pub author_image: String,
    pub title: String,
    pub description: String,
    pub ingredients: Vec<Ingredient>,
    pub instructions: String,
    pub image: String,
    pub category: Category,
    pub level: Level,
    pub likes: i32,
    pub saves_count: i32,
    pub calories: i32,
    pub cook_time: i32,
    pub servings: i32,
    pub is_vegetarian: bool,
    pub reviews: Vec<Review>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Scalar columns of a recipe row, before ingredients/reviews are joined.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RecipeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub author_name: String,
    pub author_image: String,
    pub title: String,
    pub description: String,
    pub instructions: String,
    pub image: String,
    pub category: String,
    pub level: String,
    pub likes: i32,
    pub saves_count: i32,
    pub calories: i32,
    pub cook_time: i32,
    pub servings: i32,
    pub is_vegetarian: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub const RECIPE_COLUMNS: &str = "id, user_id, author_name, author_image, title, description, \
     instructions, image, category, level, likes, saves_count, calories, cook_time, servings, \
     is_vegetarian, created_at, updated_at";

/// `RECIPE_COLUMNS` qualified with a table alias, for joined queries
/// where bare column names would be ambiguous.
pub fn recipe_columns_prefixed(alias: &str) -> String {
    RECIPE_COLUMNS
        .split(", ")
        .map(|col| format!("{alias}.{}", col.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Fields accepted when creating a recipe.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecipe {
    pub title: String,
    pub description: String,
    pub ingredients: Vec<Ingredient>,
    pub instructions: String,
    #[serde(default)]
    pub image: String,
    pub category: Category,
    pub level: Level,
    #[serde(default)]
    pub calories: i32,
    #[serde(default)]
    pub cook_time: i32,
    #[serde(default = "default_servings")]
    pub servings: i32,
    #[serde(default)]
    pub is_vegetarian: bool,
}

fn default_servings() -> i32 {
    1
}

/// Partial update of a recipe's content fields.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub ingredients: Option<Vec<Ingredient>>,
    pub instructions: Option<String>,
    pub image: Option<String>,
    pub category: Option<Category>,
    pub level: Option<Level>,
    pub calories: Option<i32>,
    pub cook_time: Option<i32>,
    pub servings: Option<i32>,
    pub is_vegetarian: Option<bool>,
}

impl RecipeRow {
    fn into_recipe(self, ingredients: Vec<Ingredient>, reviews: Vec<Review>) -> Recipe {
        Recipe {
            id: self.id,
            user: self.user_id,
            author_name: self.author_name,
            author_image: self.author_image,
            title: self.title,
            description: self.description,
            ingredients,
            instructions: self.instructions,
            image: self.image,
            category: Category::from_str(&self.category).unwrap_or(Category::Dinner),
            level: Level::from_str(&self.level).unwrap_or(Level::Easy),
            likes: self.likes,
            saves_count: self.saves_count,
            calories: self.calories,
            cook_time: self.cook_time,
            servings: self.servings,
            is_vegetarian: self.is_vegetarian,
            reviews,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Join ingredient and review lists onto a batch of recipe rows,
/// preserving the row order.
pub async fn assemble_recipes(
    pool: &PgPool,
    rows: Vec<RecipeRow>,
) -> Result<Vec<Recipe>, sqlx::Error> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();

    let ingredient_rows = sqlx::query(
        r#"
        SELECT recipe_id, name, quantity
        FROM recipe_ingredients
        WHERE recipe_id = ANY($1)
        ORDER BY recipe_id, position
        "#,
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    let mut ingredients: HashMap<Uuid, Vec<Ingredient>> = HashMap::new();
    for row in ingredient_rows {
        ingredients
            .entry(row.get("recipe_id"))
            .or_default()
            .push(Ingredient {
                name: row.get("name"),
                quantity: row.get("quantity"),
            });
    }

    let review_rows = sqlx::query(
        r#"
        SELECT id, recipe_id, user_id, rating, comment, user_name, user_image, created_at
        FROM reviews
        WHERE recipe_id = ANY($1)
        ORDER BY recipe_id, created_at
        "#,
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    let mut reviews: HashMap<Uuid, Vec<Review>> = HashMap::new();
    for row in review_rows {
        reviews
            .entry(row.get("recipe_id"))
            .or_default()
            .push(Review {
                id: row.get("id"),
                user: row.get("user_id"),
                rating: row.get("rating"),
                comment: row.get("comment"),
                user_name: row.get("user_name"),
                user_image: row.get("user_image"),
                created_at: row.get("created_at"),
            });
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let id = row.id;
            row.into_recipe(
                ingredients.remove(&id).unwrap_or_default(),
                reviews.remove(&id).unwrap_or_default(),
            )
        })
        .collect())
}

/// Create a recipe with its ingredient list, snapshotting the author's
/// name and image.
pub async fn insert_recipe(
    pool: &PgPool,
    author_id: Uuid,
    author_name: &str,
    author_image: &str,
    new: &NewRecipe,
) -> Result<Recipe, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let mut tx = pool.begin().await?;

    let row = sqlx::query_as::<_, RecipeRow>(&format!(
        r#"
        INSERT INTO recipes
            (id, user_id, author_name, author_image, title, description, instructions, image,
             category, level, calories, cook_time, servings, is_vegetarian, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $15)
        RETURNING {RECIPE_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(author_id)
    .bind(author_name)
    .bind(author_image)
    .bind(&new.title)
    .bind(&new.description)
    .bind(&new.instructions)
    .bind(&new.image)
    .bind(new.category.as_str())
    .bind(new.level.as_str())
    .bind(new.calories)
    .bind(new.cook_time)
    .bind(new.servings)
    .bind(new.is_vegetarian)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    for (position, ingredient) in new.ingredients.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO recipe_ingredients (recipe_id, position, name, quantity)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(id)
        .bind(position as i32)
        .bind(&ingredient.name)
        .bind(&ingredient.quantity)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    Ok(row.into_recipe(new.ingredients.clone(), Vec::new()))
}

/// Fetch just the scalar row, without joining ingredients or reviews.
pub async fn get_recipe_row(pool: &PgPool, id: Uuid) -> Result<Option<RecipeRow>, sqlx::Error> {
    sqlx::query_as::<_, RecipeRow>(&format!(
        "SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Fetch one recipe with ingredients and reviews.
pub async fn get_recipe(pool: &PgPool, id: Uuid) -> Result<Option<Recipe>, sqlx::Error> {
    let row = sqlx::query_as::<_, RecipeRow>(&format!(
        "SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    Ok(assemble_recipes(pool, vec![row]).await?.into_iter().next())
}

/// All recipes, newest first.
pub async fn list_all(pool: &PgPool) -> Result<Vec<Recipe>, sqlx::Error> {
    let rows = sqlx::query_as::<_, RecipeRow>(&format!(
        "SELECT {RECIPE_COLUMNS} FROM recipes ORDER BY created_at DESC, id"
    ))
    .fetch_all(pool)
    .await?;

    assemble_recipes(pool, rows).await
}

/// Apply a partial update; fields left as `None` are unchanged. When the
/// ingredient list is present it replaces the old one wholesale.
pub async fn update_recipe(
    pool: &PgPool,
    id: Uuid,
    update: &RecipeUpdate,
) -> Result<Option<Recipe>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let row = sqlx::query_as::<_, RecipeRow>(&format!(
        r#"
        UPDATE recipes
        SET title = COALESCE($2, title),
            description = COALESCE($3, description),
            instructions = COALESCE($4, instructions),
            image = COALESCE($5, image),
            category = COALESCE($6, category),
            level = COALESCE($7, level),
            calories = COALESCE($8, calories),
            cook_time = COALESCE($9, cook_time),
            servings = COALESCE($10, servings),
            is_vegetarian = COALESCE($11, is_vegetarian),
            updated_at = $12
        WHERE id = $1
        RETURNING {RECIPE_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(update.title.as_deref())
    .bind(update.description.as_deref())
    .bind(update.instructions.as_deref())
    .bind(update.image.as_deref())
    .bind(update.category.map(|c| c.as_str()))
    .bind(update.level.map(|l| l.as_str()))
    .bind(update.calories)
    .bind(update.cook_time)
    .bind(update.servings)
    .bind(update.is_vegetarian)
    .bind(Utc::now())
    .fetch_optional(&mut *tx)
    .await?;

    let Some(row) = row else {
        tx.rollback().await?;
        return Ok(None);
    };

    if let Some(ingredients) = &update.ingredients {
        sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        for (position, ingredient) in ingredients.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO recipe_ingredients (recipe_id, position, name, quantity)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(id)
            .bind(position as i32)
            .bind(&ingredient.name)
            .bind(&ingredient.quantity)
            .execute(&mut *tx)
            .await?;
        }
    }

    tx.commit().await?;

    Ok(assemble_recipes(pool, vec![row]).await?.into_iter().next())
}

/// Delete a recipe. Returns `true` if a row was removed.
pub async fn delete_recipe(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() == 1)
}

/// Recompute the cached `likes` and `saves_count` columns from the edge
/// tables. Maintenance operation: the toggles keep the caches in step
/// transactionally, so this only repairs drift after manual intervention
/// or a partial restore.
pub async fn reconcile_counters(pool: &PgPool) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE recipes r
        SET likes = (SELECT COUNT(*) FROM recipe_likes l WHERE l.recipe_id = r.id),
            saves_count = (SELECT COUNT(*) FROM recipe_saves s WHERE s.recipe_id = r.id)
        WHERE likes <> (SELECT COUNT(*) FROM recipe_likes l WHERE l.recipe_id = r.id)
           OR saves_count <> (SELECT COUNT(*) FROM recipe_saves s WHERE s.recipe_id = r.id)
        "#,
    )
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trip() {
        for category in [
            Category::Breakfast,
            Category::Lunch,
            Category::Dinner,
            Category::Snack,
            Category::Dessert,
        ] {
            assert_eq!(Category::from_str(category.as_str()), Some(category));
        }
        // Case-normalized, matching the API's lowercased category filters.
        assert_eq!(Category::from_str("Dessert"), Some(Category::Dessert));
        assert_eq!(Category::from_str("brunch"), None);
    }

    #[test]
    fn test_level_round_trip() {
        for level in [Level::Easy, Level::Medium, Level::Hard] {
            assert_eq!(Level::from_str(level.as_str()), Some(level));
        }
        assert_eq!(Level::from_str("impossible"), None);
    }

    #[test]
    fn test_new_recipe_defaults() {
        let new: NewRecipe = serde_json::from_value(serde_json::json!({
            "title": "Dal",
            "description": "Simple lentil dal",
            "ingredients": [{"name": "lentils", "quantity": "1 cup"}],
            "instructions": "Boil the lentils.",
            "category": "dinner",
            "level": "easy"
        }))
        .unwrap();

        assert_eq!(new.servings, 1);
        assert_eq!(new.calories, 0);
        assert_eq!(new.cook_time, 0);
        assert!(!new.is_vegetarian);
        assert_eq!(new.image, "");
    }

    #[test]
    fn test_recipe_serializes_camel_case() {
        let row = RecipeRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            author_name: "Asha".to_string(),
            author_image: String::new(),
            title: "Dal".to_string(),
            description: "Simple".to_string(),
            instructions: "Boil".to_string(),
            image: String::new(),
            category: "dinner".to_string(),
            level: "easy".to_string(),
            likes: 3,
            saves_count: 2,
            calories: 0,
            cook_time: 20,
            servings: 2,
            is_vegetarian: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let recipe = row.into_recipe(vec![], vec![]);
        let json = serde_json::to_value(&recipe).unwrap();

        assert_eq!(json["savesCount"], 2);
        assert_eq!(json["cookTime"], 20);
        assert_eq!(json["isVegetarian"], true);
        assert_eq!(json["authorName"], "Asha");
        assert_eq!(json["category"], "dinner");
    }
}
