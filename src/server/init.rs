/**
 * Server Initialization
 *
 * Builds the application: connects to the database, constructs the push
 * client, and assembles the router with all routes and middleware.
 */

use axum::Router;

use crate::notifications::push::PushClient;
use crate::routes::router::create_router;
use crate::server::config::{init_database, push_gateway_url};
use crate::server::state::AppState;

/// Create and configure the axum application.
pub async fn create_app() -> Result<Router, sqlx::Error> {
    let pool = init_database().await?;

    let push = PushClient::new(push_gateway_url());
    tracing::info!("Push client configured for {}", push.gateway_url());

    let app_state = AppState { pool, push };

    Ok(create_router(app_state))
}
