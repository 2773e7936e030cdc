//! PaintFlow persistence server.
//!
//! Stores drawings behind a small JSON API:
//!
//! ```text
//! GET    /api/health
//! GET    /api/drawings          newest first, without previews
//! POST   /api/drawings          { title?, data: { shapes }, imageDataUrl? } -> 201
//! GET    /api/drawings/{id}
//! PUT    /api/drawings/{id}     same body as POST
//! DELETE /api/drawings/{id}
//! ```
//!
//! Errors are returned as `{ "error": "..." }`.

pub mod config;
pub mod error;
pub mod handlers;

pub use config::ServerConfig;
pub use error::ApiError;
pub use handlers::AppState;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn router(state: AppState, body_limit: usize) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route(
            "/api/drawings",
            get(handlers::list_drawings).post(handlers::create_drawing),
        )
        .route(
            "/api/drawings/{id}",
            get(handlers::get_drawing)
                .put(handlers::update_drawing)
                .delete(handlers::delete_drawing),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
