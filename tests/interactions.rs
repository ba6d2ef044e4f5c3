/**
 * Interaction invariants, end to end against a live database.
 *
 * These tests cover the behavior that only shows up with real rows:
 * toggles returning counters to their origin, the saves floor at zero,
 * follow symmetry, duplicate edge inserts degrading to no-ops, and
 * notifications firing once per genuine new signal.
 *
 * They need PostgreSQL: point DATABASE_URL at a scratch database to run
 * them. Without it each test returns early and reports nothing.
 */

use sqlx::PgPool;
use uuid::Uuid;

use tastebud::interactions::service;
use tastebud::notifications::push::PushClient;
use tastebud::recipes::db::{insert_recipe, NewRecipe, Recipe};
use tastebud::users::db::{create_user, follower_ids, following_ids, User};

async fn test_pool() -> Option<PgPool> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let pool = PgPool::connect(&url).await.ok()?;
    sqlx::migrate!().run(&pool).await.ok()?;
    Some(pool)
}

/// Push client pointed at a closed port; delivery failures are swallowed
/// by design, so notifications still persist.
fn push_stub() -> PushClient {
    PushClient::new("http://127.0.0.1:9/push".to_string())
}

async fn new_user(pool: &PgPool, name: &str) -> User {
    let email = format!("{name}-{}@example.com", Uuid::new_v4());
    create_user(pool, name, &email, "$2b$12$not-a-real-hash")
        .await
        .unwrap()
}

async fn new_recipe(pool: &PgPool, author: &User) -> Recipe {
    let new: NewRecipe = serde_json::from_value(serde_json::json!({
        "title": "Dal",
        "description": "Simple lentil dal",
        "ingredients": [{"name": "lentils", "quantity": "1 cup"}],
        "instructions": "Boil the lentils.",
        "category": "dinner",
        "level": "easy"
    }))
    .unwrap();
    insert_recipe(pool, author.id, &author.name, &author.image, &new)
        .await
        .unwrap()
}

async fn notification_count(pool: &PgPool, recipient: Uuid, kind: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE recipient_id = $1 AND kind = $2")
        .bind(recipient)
        .bind(kind)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_like_toggle_returns_counter_to_origin() {
    let Some(pool) = test_pool().await else { return };
    let push = push_stub();
    let author = new_user(&pool, "author").await;
    let fan = new_user(&pool, "fan").await;
    let recipe = new_recipe(&pool, &author).await;

    let first = service::like_or_unlike(&pool, &push, &fan, recipe.id)
        .await
        .unwrap();
    assert!(first.liked);
    assert_eq!(first.likes, 1);
    assert!(first.liked_recipes.contains(&recipe.id));

    let second = service::like_or_unlike(&pool, &push, &fan, recipe.id)
        .await
        .unwrap();
    assert!(!second.liked);
    assert_eq!(second.likes, 0);
    assert!(!second.liked_recipes.contains(&recipe.id));

    let third = service::like_or_unlike(&pool, &push, &fan, recipe.id)
        .await
        .unwrap();
    assert!(third.liked);
    assert_eq!(third.likes, 1);
}

#[tokio::test]
async fn test_duplicate_like_edge_insert_is_a_no_op() {
    let Some(pool) = test_pool().await else { return };
    let author = new_user(&pool, "author").await;
    let fan = new_user(&pool, "fan").await;
    let recipe = new_recipe(&pool, &author).await;

    // The same statement the toggle runs: when two requests race past
    // their DELETEs, the second insert must not error or move counters.
    let insert = r#"
        INSERT INTO recipe_likes (user_id, recipe_id, created_at)
        VALUES ($1, $2, NOW())
        ON CONFLICT (user_id, recipe_id) DO NOTHING
    "#;

    let first = sqlx::query(insert)
        .bind(fan.id)
        .bind(recipe.id)
        .execute(&pool)
        .await
        .unwrap();
    assert_eq!(first.rows_affected(), 1);

    let second = sqlx::query(insert)
        .bind(fan.id)
        .bind(recipe.id)
        .execute(&pool)
        .await
        .unwrap();
    assert_eq!(second.rows_affected(), 0);
}

#[tokio::test]
async fn test_saves_count_is_clamped_at_zero() {
    let Some(pool) = test_pool().await else { return };
    let author = new_user(&pool, "author").await;
    let fan = new_user(&pool, "fan").await;
    let recipe = new_recipe(&pool, &author).await;

    let saved = service::save_or_unsave(&pool, &fan, recipe.id)
        .await
        .unwrap();
    assert!(saved.saved);
    assert_eq!(saved.saves_count, 1);

    // Simulate counter drift so the decrement would go below zero.
    sqlx::query("UPDATE recipes SET saves_count = 0 WHERE id = $1")
        .bind(recipe.id)
        .execute(&pool)
        .await
        .unwrap();

    let unsaved = service::save_or_unsave(&pool, &fan, recipe.id)
        .await
        .unwrap();
    assert!(!unsaved.saved);
    assert_eq!(unsaved.saves_count, 0);
}

#[tokio::test]
async fn test_follow_mirrors_both_directions() {
    let Some(pool) = test_pool().await else { return };
    let push = push_stub();
    let fan = new_user(&pool, "fan").await;
    let author = new_user(&pool, "author").await;

    let profile = service::follow_or_unfollow(&pool, &push, &fan, author.id)
        .await
        .unwrap();
    assert!(profile.following.contains(&author.id));
    assert!(following_ids(&pool, fan.id).await.unwrap().contains(&author.id));
    assert!(follower_ids(&pool, author.id).await.unwrap().contains(&fan.id));

    let profile = service::follow_or_unfollow(&pool, &push, &fan, author.id)
        .await
        .unwrap();
    assert!(!profile.following.contains(&author.id));
    assert!(following_ids(&pool, fan.id).await.unwrap().is_empty());
    assert!(follower_ids(&pool, author.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_self_follow_is_rejected() {
    let Some(pool) = test_pool().await else { return };
    let push = push_stub();
    let user = new_user(&pool, "loner").await;

    let result = service::follow_or_unfollow(&pool, &push, &user, user.id).await;
    assert!(result.is_err());
    assert!(follower_ids(&pool, user.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_notifications_fire_once_per_new_signal() {
    let Some(pool) = test_pool().await else { return };
    let push = push_stub();
    let author = new_user(&pool, "author").await;
    let fan = new_user(&pool, "fan").await;
    let recipe = new_recipe(&pool, &author).await;

    // Like then unlike: one like notification, none for the removal.
    service::like_or_unlike(&pool, &push, &fan, recipe.id)
        .await
        .unwrap();
    service::like_or_unlike(&pool, &push, &fan, recipe.id)
        .await
        .unwrap();
    assert_eq!(notification_count(&pool, author.id, "like").await, 1);

    // Follow then unfollow behaves the same way.
    service::follow_or_unfollow(&pool, &push, &fan, author.id)
        .await
        .unwrap();
    service::follow_or_unfollow(&pool, &push, &fan, author.id)
        .await
        .unwrap();
    assert_eq!(notification_count(&pool, author.id, "follow").await, 1);
}

#[tokio::test]
async fn test_liking_own_recipe_emits_no_notification() {
    let Some(pool) = test_pool().await else { return };
    let push = push_stub();
    let author = new_user(&pool, "author").await;
    let recipe = new_recipe(&pool, &author).await;

    let outcome = service::like_or_unlike(&pool, &push, &author, recipe.id)
        .await
        .unwrap();
    assert!(outcome.liked);
    assert_eq!(notification_count(&pool, author.id, "like").await, 0);
}
