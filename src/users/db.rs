/**
 * User Model and Database Operations
 *
 * User rows plus the follow edge table. A single `follows` row encodes
 * both directions of the relationship (the follower's "following" entry
 * and the followed user's "followers" entry), so the two sides can never
 * drift apart.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// User row. The password hash is never serialized into responses.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub image: String,
    pub phone: String,
    #[serde(rename = "expoToken")]
    pub expo_token: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Public projection of a user with recomputed follow counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image: String,
    pub phone: String,
    pub followers: Vec<Uuid>,
    pub following: Vec<Uuid>,
    pub followers_count: i64,
    pub following_count: i64,
}

const USER_COLUMNS: &str =
    "id, name, email, password_hash, image, phone, expo_token, created_at, updated_at";

/// Create a new user with a hashed password.
pub async fn create_user(
    pool: &PgPool,
    name: &str,
    email: &str,
    password_hash: &str,
) -> Result<User, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let user = sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO users (id, name, email, password_hash, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $5)
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

/// Get user by email.
pub async fn get_user_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
        .bind(email)
        .fetch_optional(pool)
        .await
}

/// Get user by ID.
pub async fn get_user_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Update name and/or phone; fields left as `None` are unchanged.
pub async fn update_profile(
    pool: &PgPool,
    id: Uuid,
    name: Option<&str>,
    phone: Option<&str>,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users
        SET name = COALESCE($2, name),
            phone = COALESCE($3, phone),
            updated_at = $4
        WHERE id = $1
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(name)
    .bind(phone)
    .bind(Utc::now())
    .fetch_optional(pool)
    .await
}

/// Update the profile image URI.
pub async fn update_profile_image(
    pool: &PgPool,
    id: Uuid,
    image: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users
        SET image = $2, updated_at = $3
        WHERE id = $1
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(image)
    .bind(Utc::now())
    .fetch_optional(pool)
    .await
}

/// Store the push token used by the notification dispatcher.
pub async fn update_expo_token(
    pool: &PgPool,
    id: Uuid,
    expo_token: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET expo_token = $2, updated_at = $3 WHERE id = $1")
        .bind(id)
        .bind(expo_token)
        .bind(Utc::now())
        .execute(pool)
        .await?;
    Ok(())
}

/// Add a follow edge. Returns `true` if the edge was newly created.
pub async fn add_follow(pool: &PgPool, follower: Uuid, followed: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO follows (follower_id, followed_id, created_at)
        VALUES ($1, $2, $3)
        ON CONFLICT (follower_id, followed_id) DO NOTHING
        "#,
    )
    .bind(follower)
    .bind(followed)
    .bind(Utc::now())
    .execute(pool)
    .await?;
    Ok(result.rows_affected() == 1)
}

/// Remove a follow edge. Returns `true` if an edge was removed.
pub async fn remove_follow(
    pool: &PgPool,
    follower: Uuid,
    followed: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND followed_id = $2")
        .bind(follower)
        .bind(followed)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() == 1)
}

/// Users following `user_id`.
pub async fn follower_ids(pool: &PgPool, user_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT follower_id FROM follows WHERE followed_id = $1 ORDER BY created_at",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Users that `user_id` follows.
pub async fn following_ids(pool: &PgPool, user_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT followed_id FROM follows WHERE follower_id = $1 ORDER BY created_at",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Public profile projection with follower/following lists and counts.
pub async fn get_profile(pool: &PgPool, id: Uuid) -> Result<Option<UserProfile>, sqlx::Error> {
    let Some(user) = get_user_by_id(pool, id).await? else {
        return Ok(None);
    };

    let followers = follower_ids(pool, id).await?;
    let following = following_ids(pool, id).await?;

    Ok(Some(UserProfile {
        id: user.id,
        name: user.name,
        email: user.email,
        image: user.image,
        phone: user.phone,
        followers_count: followers.len() as i64,
        following_count: following.len() as i64,
        followers,
        following,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_never_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            password_hash: "$2b$10$secret".to_string(),
            image: String::new(),
            phone: String::new(),
            expo_token: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["email"], "asha@example.com");
    }

    #[test]
    fn test_profile_uses_camel_case() {
        let profile = UserProfile {
            id: Uuid::new_v4(),
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            image: String::new(),
            phone: String::new(),
            followers: vec![],
            following: vec![],
            followers_count: 0,
            following_count: 0,
        };

        let json = serde_json::to_value(&profile).unwrap();
        assert!(json.get("followersCount").is_some());
        assert!(json.get("followingCount").is_some());
    }
}
