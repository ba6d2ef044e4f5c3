/**
 * Interaction Service
 *
 * Toggles per-user relationships to recipes and users while keeping the
 * denormalized counters consistent and emitting notifications exactly
 * once per genuine new signal.
 *
 * # Consistency
 *
 * Each toggle runs the set mutation and the counter update in one
 * transaction, so the edge table (canonical) and the cached counter can
 * never be observed out of step. Counters move with atomic
 * `SET c = c + 1` / `GREATEST(c - 1, 0)` updates, never read-modify-write
 * of the whole row, so concurrent requests cannot lose updates. Edge
 * inserts are `ON CONFLICT DO NOTHING` with the counter gated on the
 * insert taking effect, so a duplicate toggle racing on the pair primary
 * key degrades to a no-op instead of an error.
 *
 * # Notifications
 *
 * A notification fires only on the transition into the positive state
 * (liked, followed, reviewed) and only when the recipient is a different
 * user than the actor. Un-like and un-follow never notify. Dispatch is
 * best-effort and happens after the transaction commits.
 */

use chrono::Utc;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiError;
use crate::feed::service::saved_recipes;
use crate::notifications::db::{NotificationKind, ResourceRef};
use crate::notifications::dispatch::{dispatch, Signal};
use crate::notifications::push::PushClient;
use crate::recipes::db::{get_recipe, get_recipe_row, Recipe, RecipeRow};
use crate::users::db::{add_follow, get_profile, get_user_by_id, remove_follow, User, UserProfile};

/// Result of a like toggle.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeOutcome {
    /// Whether the recipe is liked after the toggle
    pub liked: bool,
    /// The recipe's like count after the toggle
    pub likes: i32,
    /// The user's liked-recipe ids after the toggle
    pub liked_recipes: Vec<Uuid>,
}

/// Result of a save toggle.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveOutcome {
    pub saved: bool,
    pub saves_count: i32,
    /// The user's saved recipes after the toggle, fully populated
    pub saved_recipes: Vec<Recipe>,
}

/// Fields accepted when adding a review.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub rating: i32,
    pub comment: String,
    /// Display name override; defaults to the reviewer's profile name
    pub user_name: Option<String>,
    pub user_image: Option<String>,
}

async fn require_recipe(pool: &PgPool, recipe_id: Uuid) -> Result<RecipeRow, ApiError> {
    get_recipe_row(pool, recipe_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Recipe not found"))
}

/// Toggle the caller's like on a recipe.
pub async fn like_or_unlike(
    pool: &PgPool,
    push: &PushClient,
    user: &User,
    recipe_id: Uuid,
) -> Result<LikeOutcome, ApiError> {
    let recipe = require_recipe(pool, recipe_id).await?;

    let mut tx = pool.begin().await?;

    let removed = sqlx::query("DELETE FROM recipe_likes WHERE user_id = $1 AND recipe_id = $2")
        .bind(user.id)
        .bind(recipe_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    let (liked, newly_liked, likes) = if removed == 1 {
        let likes: i32 = sqlx::query_scalar(
            "UPDATE recipes SET likes = GREATEST(likes - 1, 0) WHERE id = $1 RETURNING likes",
        )
        .bind(recipe_id)
        .fetch_one(&mut *tx)
        .await?;
        (false, false, likes)
    } else {
        // A concurrent toggle may have inserted the edge between our
        // DELETE and here; only the request that created the edge moves
        // the counter and notifies.
        let inserted = sqlx::query(
            r#"
            INSERT INTO recipe_likes (user_id, recipe_id, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, recipe_id) DO NOTHING
            "#,
        )
        .bind(user.id)
        .bind(recipe_id)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let likes: i32 = if inserted == 1 {
            sqlx::query_scalar("UPDATE recipes SET likes = likes + 1 WHERE id = $1 RETURNING likes")
                .bind(recipe_id)
                .fetch_one(&mut *tx)
                .await?
        } else {
            sqlx::query_scalar("SELECT likes FROM recipes WHERE id = $1")
                .bind(recipe_id)
                .fetch_one(&mut *tx)
                .await?
        };
        (true, inserted == 1, likes)
    };

    tx.commit().await?;

    if newly_liked && recipe.user_id != user.id {
        if let Some(author) = get_user_by_id(pool, recipe.user_id).await? {
            dispatch(
                pool,
                push,
                Signal {
                    recipient: &author,
                    sender: user,
                    kind: NotificationKind::Like,
                    message: format!("{} liked your recipe", user.name),
                    resource: Some(ResourceRef::Recipe(recipe_id)),
                    push_title: "Your recipe was liked ❤️".to_string(),
                    push_body: format!("{} liked your recipe \"{}\"", user.name, recipe.title),
                },
            )
            .await;
        }
    }

    let liked_recipes: Vec<Uuid> = sqlx::query_scalar(
        "SELECT recipe_id FROM recipe_likes WHERE user_id = $1 ORDER BY created_at",
    )
    .bind(user.id)
    .fetch_all(pool)
    .await?;

    Ok(LikeOutcome {
        liked,
        likes,
        liked_recipes,
    })
}

/// Toggle the caller's save on a recipe. No notification either way.
pub async fn save_or_unsave(
    pool: &PgPool,
    user: &User,
    recipe_id: Uuid,
) -> Result<SaveOutcome, ApiError> {
    require_recipe(pool, recipe_id).await?;

    let mut tx = pool.begin().await?;

    let removed = sqlx::query("DELETE FROM recipe_saves WHERE user_id = $1 AND recipe_id = $2")
        .bind(user.id)
        .bind(recipe_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    let (saved, saves_count) = if removed == 1 {
        // Clamped at zero: a stale cache can never push the count negative.
        let count: i32 = sqlx::query_scalar(
            "UPDATE recipes SET saves_count = GREATEST(saves_count - 1, 0) WHERE id = $1 RETURNING saves_count",
        )
        .bind(recipe_id)
        .fetch_one(&mut *tx)
        .await?;
        (false, count)
    } else {
        let inserted = sqlx::query(
            r#"
            INSERT INTO recipe_saves (user_id, recipe_id, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, recipe_id) DO NOTHING
            "#,
        )
        .bind(user.id)
        .bind(recipe_id)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let count: i32 = if inserted == 1 {
            sqlx::query_scalar(
                "UPDATE recipes SET saves_count = saves_count + 1 WHERE id = $1 RETURNING saves_count",
            )
            .bind(recipe_id)
            .fetch_one(&mut *tx)
            .await?
        } else {
            sqlx::query_scalar("SELECT saves_count FROM recipes WHERE id = $1")
                .bind(recipe_id)
                .fetch_one(&mut *tx)
                .await?
        };
        (true, count)
    };

    tx.commit().await?;

    let saved_list = saved_recipes(pool, user.id).await?;

    Ok(SaveOutcome {
        saved,
        saves_count,
        saved_recipes: saved_list,
    })
}

/// Append a review to a recipe, snapshotting the reviewer's name/image.
pub async fn add_review(
    pool: &PgPool,
    push: &PushClient,
    user: &User,
    recipe_id: Uuid,
    review: &NewReview,
) -> Result<Recipe, ApiError> {
    if !(1..=5).contains(&review.rating) {
        return Err(ApiError::validation("Rating must be between 1 and 5"));
    }
    if review.comment.trim().is_empty() {
        return Err(ApiError::validation("Comment must not be empty"));
    }

    let recipe = require_recipe(pool, recipe_id).await?;

    let user_name = review.user_name.as_deref().unwrap_or(&user.name);
    let user_image = review.user_image.as_deref().unwrap_or(&user.image);

    sqlx::query(
        r#"
        INSERT INTO reviews (id, recipe_id, user_id, rating, comment, user_name, user_image, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(recipe_id)
    .bind(user.id)
    .bind(review.rating)
    .bind(review.comment.trim())
    .bind(user_name)
    .bind(user_image)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    if recipe.user_id != user.id {
        if let Some(author) = get_user_by_id(pool, recipe.user_id).await? {
            dispatch(
                pool,
                push,
                Signal {
                    recipient: &author,
                    sender: user,
                    kind: NotificationKind::Comment,
                    message: format!("{} commented on your recipe", user.name),
                    resource: Some(ResourceRef::Recipe(recipe_id)),
                    push_title: "New Comment 💬".to_string(),
                    push_body: format!(
                        "{} commented on your recipe \"{}\"",
                        user.name, recipe.title
                    ),
                },
            )
            .await;
        }
    }

    get_recipe(pool, recipe_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Recipe not found"))
}

/// Toggle the follow relationship between the caller and another user.
///
/// The edge table stores one row per relationship, so the follower's
/// "following" view and the author's "followers" view can never diverge.
pub async fn follow_or_unfollow(
    pool: &PgPool,
    push: &PushClient,
    user: &User,
    author_id: Uuid,
) -> Result<UserProfile, ApiError> {
    if user.id == author_id {
        return Err(ApiError::invalid_operation("You cannot follow yourself"));
    }

    let author = get_user_by_id(pool, author_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let unfollowed = remove_follow(pool, user.id, author_id).await?;

    if !unfollowed {
        // add_follow reports whether the edge was newly created, so a
        // concurrent duplicate toggle cannot double-notify.
        let followed = add_follow(pool, user.id, author_id).await?;
        if followed {
            dispatch(
                pool,
                push,
                Signal {
                    recipient: &author,
                    sender: user,
                    kind: NotificationKind::Follow,
                    message: format!("{} started following you", user.name),
                    resource: None,
                    push_title: "New Follower".to_string(),
                    push_body: format!("{} started following you", user.name),
                },
            )
            .await;
        }
    }

    get_profile(pool, user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))
}

/// Record that the caller cooked a recipe. Append-only and idempotent;
/// there is no way to un-mark through this operation.
pub async fn mark_made_it(
    pool: &PgPool,
    user: &User,
    recipe_id: Uuid,
) -> Result<Recipe, ApiError> {
    require_recipe(pool, recipe_id).await?;

    sqlx::query(
        r#"
        INSERT INTO recipe_made_it (user_id, recipe_id, created_at)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id, recipe_id) DO NOTHING
        "#,
    )
    .bind(user.id)
    .bind(recipe_id)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    get_recipe(pool, recipe_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Recipe not found"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_rating_bounds() {
        for rating in [0, 6, -1] {
            let review = NewReview {
                rating,
                comment: "Great".to_string(),
                user_name: None,
                user_image: None,
            };
            assert!(!(1..=5).contains(&review.rating), "rating {rating}");
        }
        for rating in 1..=5 {
            assert!((1..=5).contains(&rating));
        }
    }

    #[test]
    fn test_outcome_shapes_are_camel_case() {
        let outcome = LikeOutcome {
            liked: true,
            likes: 4,
            liked_recipes: vec![],
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert!(json.get("likedRecipes").is_some());

        let outcome = SaveOutcome {
            saved: false,
            saves_count: 0,
            saved_recipes: vec![],
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert!(json.get("savesCount").is_some());
        assert!(json.get("savedRecipes").is_some());
    }
}
