/**
 * Feed/Aggregation Service
 *
 * Derives read-optimized views without mutating state:
 *
 * - paginated search and category listings
 * - recipes of the week (top 5 by likes)
 * - popular recipes (rule-based classifier)
 * - ingredient-based suggestions (set-overlap scoring)
 * - per-user collections (saved / liked / made-it joins)
 *
 * Ranked views use a documented deterministic tie-break: likes or match
 * percentage first, then newest `created_at`, then id. Empty per-user
 * collections are empty lists, never errors.
 */

use serde::Serialize;
use sqlx::PgPool;
use std::collections::HashSet;
use uuid::Uuid;

use crate::recipes::db::{
    assemble_recipes, list_all, recipe_columns_prefixed, Ingredient, Recipe, RecipeRow,
    RECIPE_COLUMNS,
};

/// One page of recipes plus the pagination envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub recipes: Vec<Recipe>,
    pub total: i64,
    pub current_page: i64,
    pub total_pages: i64,
}

/// A recipe annotated with its ingredient-match percentage.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestedRecipe {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub match_percentage: i32,
}

/// `ceil(total / limit)`, with a zero or negative limit yielding zero.
pub fn total_pages(total: i64, limit: i64) -> i64 {
    if limit <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}

/// Offset for a 1-based page; pages below 1 clamp to the first page.
pub fn page_offset(page: i64, limit: i64) -> i64 {
    (page.max(1) - 1) * limit.max(0)
}

/// Mean rating, 0.0 when there are no reviews.
pub fn average_rating(ratings: &[i32]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    ratings.iter().map(|r| *r as f64).sum::<f64>() / ratings.len() as f64
}

/// Rule-based popularity classifier: popular iff likes >= 10, or
/// saves >= 5, or at least 3 reviews averaging 4.5 and up.
pub fn is_popular(likes: i32, saves_count: i32, review_count: usize, avg_rating: f64) -> bool {
    likes >= 10 || saves_count >= 5 || (review_count >= 3 && avg_rating >= 4.5)
}

/// Escape `ILIKE` metacharacters so a search for "100%" matches the
/// literal text instead of turning into a wildcard.
pub fn escape_like(q: &str) -> String {
    q.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Lowercase and trim an ingredient name for matching.
pub fn normalize_ingredient(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Percentage (rounded to the nearest integer) of a recipe's ingredients
/// present in the available set.
pub fn match_percentage(available: &HashSet<String>, ingredients: &[Ingredient]) -> i32 {
    if ingredients.is_empty() {
        return 0;
    }
    let matched = ingredients
        .iter()
        .filter(|i| available.contains(&normalize_ingredient(&i.name)))
        .count();
    ((matched as f64 / ingredients.len() as f64) * 100.0).round() as i32
}

/// Paginated title/category search.
///
/// `q` is a case-insensitive substring match on the title; `category` is
/// an exact match after lowercasing. A page past the end is an empty
/// list, not an error.
pub async fn search(
    pool: &PgPool,
    q: &str,
    category: &str,
    page: i64,
    limit: i64,
) -> Result<Page, sqlx::Error> {
    let category = category.trim().to_lowercase();
    let pattern = format!("%{}%", escape_like(q.trim()));

    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM recipes
        WHERE ($1 = '%%' OR title ILIKE $1)
          AND ($2 = '' OR category = $2)
        "#,
    )
    .bind(&pattern)
    .bind(&category)
    .fetch_one(pool)
    .await?;

    let rows = sqlx::query_as::<_, RecipeRow>(&format!(
        r#"
        SELECT {RECIPE_COLUMNS} FROM recipes
        WHERE ($1 = '%%' OR title ILIKE $1)
          AND ($2 = '' OR category = $2)
        ORDER BY created_at DESC, id
        LIMIT $3 OFFSET $4
        "#
    ))
    .bind(&pattern)
    .bind(&category)
    .bind(limit.max(0))
    .bind(page_offset(page, limit))
    .fetch_all(pool)
    .await?;

    Ok(Page {
        recipes: assemble_recipes(pool, rows).await?,
        total,
        current_page: page.max(1),
        total_pages: total_pages(total, limit),
    })
}

/// Top 5 recipes by like count; ties go to the newest, then by id.
pub async fn recipes_of_the_week(pool: &PgPool) -> Result<Vec<Recipe>, sqlx::Error> {
    let rows = sqlx::query_as::<_, RecipeRow>(&format!(
        "SELECT {RECIPE_COLUMNS} FROM recipes ORDER BY likes DESC, created_at DESC, id LIMIT 5"
    ))
    .fetch_all(pool)
    .await?;

    assemble_recipes(pool, rows).await
}

/// All recipes passing the popularity classifier.
///
/// Evaluated over the full set in application memory; fine at this
/// scale, and the classifier stays a plain testable function.
pub async fn popular_recipes(pool: &PgPool) -> Result<Vec<Recipe>, sqlx::Error> {
    let recipes = list_all(pool).await?;

    Ok(recipes
        .into_iter()
        .filter(|recipe| {
            let ratings: Vec<i32> = recipe.reviews.iter().map(|r| r.rating).collect();
            is_popular(
                recipe.likes,
                recipe.saves_count,
                ratings.len(),
                average_rating(&ratings),
            )
        })
        .collect())
}

/// Score every recipe against the available ingredients, drop zero
/// matches, and rank by match percentage.
pub async fn suggested_recipes(
    pool: &PgPool,
    available_ingredients: &[String],
) -> Result<Vec<SuggestedRecipe>, sqlx::Error> {
    let available: HashSet<String> = available_ingredients
        .iter()
        .map(|i| normalize_ingredient(i))
        .collect();

    let recipes = list_all(pool).await?;

    let mut suggestions: Vec<SuggestedRecipe> = recipes
        .into_iter()
        .filter_map(|recipe| {
            let pct = match_percentage(&available, &recipe.ingredients);
            (pct > 0).then_some(SuggestedRecipe {
                recipe,
                match_percentage: pct,
            })
        })
        .collect();

    suggestions.sort_by(|a, b| {
        b.match_percentage
            .cmp(&a.match_percentage)
            .then(b.recipe.created_at.cmp(&a.recipe.created_at))
            .then(a.recipe.id.cmp(&b.recipe.id))
    });

    Ok(suggestions)
}

async fn collection(
    pool: &PgPool,
    edge_table: &str,
    user_id: Uuid,
) -> Result<Vec<Recipe>, sqlx::Error> {
    let columns = recipe_columns_prefixed("r");
    let rows = sqlx::query_as::<_, RecipeRow>(&format!(
        r#"
        SELECT {columns}
        FROM recipes r
        JOIN {edge_table} e ON e.recipe_id = r.id
        WHERE e.user_id = $1
        ORDER BY e.created_at
        "#
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    assemble_recipes(pool, rows).await
}

/// Recipes the user has saved, in save order.
pub async fn saved_recipes(pool: &PgPool, user_id: Uuid) -> Result<Vec<Recipe>, sqlx::Error> {
    collection(pool, "recipe_saves", user_id).await
}

/// Recipes the user has liked, in like order.
pub async fn liked_recipes(pool: &PgPool, user_id: Uuid) -> Result<Vec<Recipe>, sqlx::Error> {
    collection(pool, "recipe_likes", user_id).await
}

/// Recipes the user has marked as made, in marking order.
pub async fn made_it_recipes(pool: &PgPool, user_id: Uuid) -> Result<Vec<Recipe>, sqlx::Error> {
    collection(pool, "recipe_made_it", user_id).await
}

/// Paginated listing for one category (exact match, lowercased).
pub async fn category_recipes(
    pool: &PgPool,
    category: &str,
    page: i64,
    limit: i64,
) -> Result<Page, sqlx::Error> {
    search(pool, "", category, page, limit).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ingredients(names: &[&str]) -> Vec<Ingredient> {
        names
            .iter()
            .map(|n| Ingredient {
                name: n.to_string(),
                quantity: String::new(),
            })
            .collect()
    }

    fn available(names: &[&str]) -> HashSet<String> {
        names.iter().map(|n| normalize_ingredient(n)).collect()
    }

    #[test]
    fn test_total_pages_is_ceiling() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(25, 10), 3);
        assert_eq!(total_pages(5, 0), 0);
    }

    #[test]
    fn test_page_offset() {
        assert_eq!(page_offset(1, 10), 0);
        assert_eq!(page_offset(3, 10), 20);
        // Pages below one clamp to the first page.
        assert_eq!(page_offset(0, 10), 0);
        assert_eq!(page_offset(-2, 10), 0);
    }

    #[test]
    fn test_average_rating_empty_is_zero() {
        assert_eq!(average_rating(&[]), 0.0);
        assert_eq!(average_rating(&[5, 5, 5]), 5.0);
        assert_eq!(average_rating(&[4, 5]), 4.5);
    }

    #[test]
    fn test_popular_by_likes_threshold() {
        assert!(is_popular(10, 0, 0, 0.0));
        assert!(!is_popular(9, 0, 0, 0.0));
    }

    #[test]
    fn test_popular_by_saves_threshold() {
        assert!(is_popular(0, 5, 0, 0.0));
        assert!(!is_popular(0, 4, 0, 0.0));
    }

    #[test]
    fn test_popular_by_reviews_needs_count_and_average() {
        // Three 5-star reviews: popular via the review path.
        assert!(is_popular(0, 0, 3, 5.0));
        // Two perfect reviews are not enough.
        assert!(!is_popular(0, 0, 2, 5.0));
        // Enough reviews but the average is below the bar.
        assert!(!is_popular(0, 0, 3, 4.4));
        assert!(is_popular(0, 0, 3, 4.5));
    }

    #[test]
    fn test_match_percentage_normalizes_case_and_whitespace() {
        let recipe = ingredients(&["flour", "sugar", "egg"]);
        let have = available(&[" Flour ", "EGG"]);
        // 2 of 3 -> 66.7 -> rounds to 67.
        assert_eq!(match_percentage(&have, &recipe), 67);
    }

    #[test]
    fn test_match_percentage_zero_overlap() {
        let recipe = ingredients(&["flour", "sugar"]);
        let have = available(&["tofu"]);
        assert_eq!(match_percentage(&have, &recipe), 0);
    }

    #[test]
    fn test_match_percentage_full_overlap() {
        let recipe = ingredients(&["Flour", "Sugar"]);
        let have = available(&["flour", "sugar", "butter"]);
        assert_eq!(match_percentage(&have, &recipe), 100);
    }

    #[test]
    fn test_match_percentage_empty_recipe_is_zero() {
        let have = available(&["flour"]);
        assert_eq!(match_percentage(&have, &[]), 0);
    }

    #[test]
    fn test_escape_like_neutralizes_wildcards() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("mac_and_cheese"), "mac\\_and\\_cheese");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
        // Plain text passes through untouched.
        assert_eq!(escape_like("dal"), "dal");
    }

    #[test]
    fn test_match_percentage_rounds_half_up() {
        // 1 of 8 -> 12.5 -> rounds away from zero to 13.
        let recipe = ingredients(&["a", "b", "c", "d", "e", "f", "g", "h"]);
        let have = available(&["a"]);
        assert_eq!(match_percentage(&have, &recipe), 13);
    }
}
