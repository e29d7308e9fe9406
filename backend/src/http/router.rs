//! Router configuration for the HTTP API.
//!
//! Sets up routes and middleware (CORS, compression, tracing).

use axum::{routing::get, Router};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // Read-only API consumed by a browser dashboard
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        .route("/trends", get(handlers::get_trends))
        .route("/distributions", get(handlers::get_distributions))
        .route("/breakdowns", get(handlers::get_breakdowns))
        .route("/records", get(handlers::get_records));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
