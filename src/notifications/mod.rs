//! Notification records, best-effort dispatch, and the notification API.

pub mod db;
pub mod dispatch;
pub mod handlers;
pub mod push;
