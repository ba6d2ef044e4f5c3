/**
 * Notification Dispatcher
 *
 * Turns a new social signal (follow, like, comment) into a persisted
 * notification plus a best-effort push message. Callers invoke this
 * after their primary mutation has committed; nothing here can fail the
 * request. The notification insert is awaited but its error swallowed;
 * the push call runs on a spawned task so delivery latency never blocks
 * the response.
 */

use sqlx::PgPool;

use crate::notifications::db::{insert_notification, NotificationKind, ResourceRef};
use crate::notifications::push::PushClient;
use crate::users::db::User;

/// A new social signal to record and deliver.
pub struct Signal<'a> {
    /// User receiving the notification
    pub recipient: &'a User,
    /// User whose action produced it
    pub sender: &'a User,
    pub kind: NotificationKind,
    /// In-app notification message
    pub message: String,
    /// Triggering resource, if any
    pub resource: Option<ResourceRef>,
    /// Push title/body shown on the device
    pub push_title: String,
    pub push_body: String,
}

/// Record the signal and fire the push message.
///
/// Skips the push when the recipient has no registered device token.
pub async fn dispatch(pool: &PgPool, push: &PushClient, signal: Signal<'_>) {
    if let Err(e) = insert_notification(
        pool,
        signal.recipient.id,
        signal.sender.id,
        signal.kind,
        &signal.message,
        signal.resource,
    )
    .await
    {
        tracing::warn!(
            "Failed to persist {} notification for {}: {}",
            signal.kind.as_str(),
            signal.recipient.id,
            e
        );
    }

    let Some(expo_token) = signal.recipient.expo_token.clone() else {
        tracing::debug!("Recipient {} has no push token", signal.recipient.id);
        return;
    };

    let push = push.clone();
    let title = signal.push_title;
    let body = signal.push_body;
    tokio::spawn(async move {
        push.send(&expo_token, &title, &body).await;
    });
}
