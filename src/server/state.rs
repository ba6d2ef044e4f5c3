/**
 * Application State
 *
 * `AppState` is the central state container handed to the axum router.
 * It holds the database connection pool and the push client; both are
 * cheaply cloneable handles.
 *
 * The `FromRef` implementations let handlers extract just the piece of
 * state they need (`State<PgPool>` or `State<PushClient>`) instead of
 * the whole `AppState`, following axum's recommended pattern.
 */

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::notifications::push::PushClient;

/// Shared state for all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    /// Outbound push gateway client
    pub push: PushClient,
}

impl FromRef<AppState> for PgPool {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.pool.clone()
    }
}

impl FromRef<AppState> for PushClient {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.push.clone()
    }
}
