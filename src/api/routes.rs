//! API Routes
//!
//! Configures the Axum router with all listing endpoints.

use axum::{
    routing::{delete, get},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    api_test_handler, clear_cache_handler, health_handler, mls_property_handler,
    property_handler, search_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /properties` - Search active listings
/// - `GET /properties/:listing_key` - Listing detail by listing key
/// - `GET /mls/:mls_id` - Listing detail by MLS number
/// - `GET /diagnostics/api-test` - Provider connectivity self-test
/// - `GET /cache/stats` - Cache statistics
/// - `DELETE /cache` - Drop every cached entry
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin, the listing widgets are embedded cross-site
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/properties", get(search_handler))
        .route("/properties/:listing_key", get(property_handler))
        .route("/mls/:mls_id", get(mls_property_handler))
        .route("/diagnostics/api-test", get(api_test_handler))
        .route("/cache/stats", get(stats_handler))
        .route("/cache", delete(clear_cache_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
