/**
 * Router Configuration
 *
 * Combines the public and protected route groups into the application
 * router and attaches the shared layers (request tracing, CORS) and the
 * JSON 404 fallback.
 */

use axum::http::StatusCode;
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::routes::api_routes::{protected_routes, public_routes};
use crate::server::state::AppState;

/// Create the application router with all routes and layers.
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .merge(public_routes())
        .merge(protected_routes(app_state.clone()))
        .fallback(|| async {
            (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Not found", "code": "not_found" })),
            )
        })
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
