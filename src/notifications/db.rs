/**
 * Notification Model and Database Operations
 *
 * A notification records a new positive social signal (follow, like,
 * comment) for a recipient. The optional polymorphic reference to the
 * triggering resource is a tagged pair (`resource_kind`, `resource_id`)
 * closed over the entity kinds the app knows about.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Kind of social signal that produced a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Follow,
    Like,
    Comment,
    Mention,
    Custom,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Follow => "follow",
            Self::Like => "like",
            Self::Comment => "comment",
            Self::Mention => "mention",
            Self::Custom => "custom",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "follow" => Some(Self::Follow),
            "like" => Some(Self::Like),
            "comment" => Some(Self::Comment),
            "mention" => Some(Self::Mention),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }
}

/// Tagged reference to the resource that triggered a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum ResourceRef {
    Recipe(Uuid),
    Review(Uuid),
    User(Uuid),
}

impl ResourceRef {
    pub fn kind_str(&self) -> &'static str {
        match self {
            Self::Recipe(_) => "recipes",
            Self::Review(_) => "reviews",
            Self::User(_) => "users",
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            Self::Recipe(id) | Self::Review(id) | Self::User(id) => *id,
        }
    }

    fn from_parts(kind: &str, id: Uuid) -> Option<Self> {
        match kind {
            "recipes" => Some(Self::Recipe(id)),
            "reviews" => Some(Self::Review(id)),
            "users" => Some(Self::User(id)),
            _ => None,
        }
    }
}

/// A notification joined with its sender's denormalized name/image.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationView {
    pub id: Uuid,
    pub recipient: Uuid,
    pub sender: Option<Uuid>,
    pub kind: NotificationKind,
    pub message: String,
    pub read: bool,
    pub resource: Option<ResourceRef>,
    pub created_at: DateTime<Utc>,
    pub sender_name: Option<String>,
    pub sender_image: Option<String>,
}

/// Insert a notification row.
pub async fn insert_notification(
    pool: &PgPool,
    recipient: Uuid,
    sender: Uuid,
    kind: NotificationKind,
    message: &str,
    resource: Option<ResourceRef>,
) -> Result<Uuid, sqlx::Error> {
    let id = Uuid::new_v4();

    sqlx::query(
        r#"
        INSERT INTO notifications
            (id, recipient_id, sender_id, kind, message, read, resource_kind, resource_id, created_at)
        VALUES ($1, $2, $3, $4, $5, FALSE, $6, $7, $8)
        "#,
    )
    .bind(id)
    .bind(recipient)
    .bind(sender)
    .bind(kind.as_str())
    .bind(message)
    .bind(resource.map(|r| r.kind_str()))
    .bind(resource.map(|r| r.id()))
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(id)
}

/// Most recent notifications for a recipient (capped at 50), each joined
/// with the sender's current name and image.
pub async fn list_for_recipient(
    pool: &PgPool,
    recipient: Uuid,
) -> Result<Vec<NotificationView>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT n.id, n.recipient_id, n.sender_id, n.kind, n.message, n.read,
               n.resource_kind, n.resource_id, n.created_at,
               u.name AS sender_name, u.image AS sender_image
        FROM notifications n
        LEFT JOIN users u ON u.id = n.sender_id
        WHERE n.recipient_id = $1
        ORDER BY n.created_at DESC
        LIMIT 50
        "#,
    )
    .bind(recipient)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let kind: String = row.get("kind");
            let resource_kind: Option<String> = row.get("resource_kind");
            let resource_id: Option<Uuid> = row.get("resource_id");

            NotificationView {
                id: row.get("id"),
                recipient: row.get("recipient_id"),
                sender: row.get("sender_id"),
                kind: NotificationKind::from_str(&kind).unwrap_or(NotificationKind::Custom),
                message: row.get("message"),
                read: row.get("read"),
                resource: resource_kind
                    .zip(resource_id)
                    .and_then(|(k, id)| ResourceRef::from_parts(&k, id)),
                created_at: row.get("created_at"),
                sender_name: row.get("sender_name"),
                sender_image: row.get("sender_image"),
            }
        })
        .collect())
}

/// Mark all of a recipient's unread notifications as read.
pub async fn mark_all_read(pool: &PgPool, recipient: Uuid) -> Result<u64, sqlx::Error> {
    let result =
        sqlx::query("UPDATE notifications SET read = TRUE WHERE recipient_id = $1 AND read = FALSE")
            .bind(recipient)
            .execute(pool)
            .await?;
    Ok(result.rows_affected())
}

/// Delete one of the recipient's notifications. Returns `true` if a row
/// was removed; deleting someone else's notification is a no-op.
pub async fn delete_for_recipient(
    pool: &PgPool,
    id: Uuid,
    recipient: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM notifications WHERE id = $1 AND recipient_id = $2")
        .bind(id)
        .bind(recipient)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() == 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trip() {
        for kind in [
            NotificationKind::Follow,
            NotificationKind::Like,
            NotificationKind::Comment,
            NotificationKind::Mention,
            NotificationKind::Custom,
        ] {
            assert_eq!(NotificationKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(NotificationKind::from_str("poke"), None);
    }

    #[test]
    fn test_resource_ref_tagging() {
        let id = Uuid::new_v4();
        let resource = ResourceRef::Recipe(id);
        assert_eq!(resource.kind_str(), "recipes");
        assert_eq!(resource.id(), id);
        assert_eq!(ResourceRef::from_parts("recipes", id), Some(resource));
        assert_eq!(ResourceRef::from_parts("posts", id), None);
    }

    #[test]
    fn test_resource_ref_serializes_tagged() {
        let id = Uuid::new_v4();
        let json = serde_json::to_value(ResourceRef::Review(id)).unwrap();
        assert_eq!(json["kind"], "review");
        assert_eq!(json["id"], id.to_string());
    }
}
