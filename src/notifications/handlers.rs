/**
 * Notification API Handlers
 *
 * - `GET /api/notifications` - caller's notifications, newest first
 * - `PUT /api/notifications/markAllRead` - mark all unread as read
 * - `DELETE /api/notifications/{id}` - delete one of the caller's rows
 *
 * All routes require authentication.
 */

use axum::extract::{Path, State};
use axum::Json;
use serde_json::{json, Value};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::notifications::db::{
    delete_for_recipient, list_for_recipient, mark_all_read, NotificationView,
};

/// List the caller's notifications.
pub async fn get_notifications(
    State(pool): State<PgPool>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<NotificationView>>, ApiError> {
    let notifications = list_for_recipient(&pool, user.id).await?;
    Ok(Json(notifications))
}

/// Mark all of the caller's notifications as read.
pub async fn mark_all_as_read(
    State(pool): State<PgPool>,
    AuthUser(user): AuthUser,
) -> Result<Json<Value>, ApiError> {
    let updated = mark_all_read(&pool, user.id).await?;
    tracing::debug!("Marked {} notifications read for {}", updated, user.id);
    Ok(Json(json!({ "message": "All notifications marked as read" })))
}

/// Delete a single notification belonging to the caller.
pub async fn delete_notification(
    State(pool): State<PgPool>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    if !delete_for_recipient(&pool, id, user.id).await? {
        return Err(ApiError::not_found("Notification not found"));
    }
    Ok(Json(json!({ "message": "Notification deleted" })))
}
