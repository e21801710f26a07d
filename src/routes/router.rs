use crate::middleware::request_id_middleware;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::health;
use super::helpers::MAX_BODY_BYTES;
use super::movie_handlers;
use super::AppState;

/// Create application router
pub fn create_router(state: Arc<AppState>) -> axum::Router {
    let movie_routes = axum::Router::new()
        .route("/v1/movies", post(movie_handlers::create_movie))
        .route("/v1/movies/{id}", get(movie_handlers::show_movie))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES));

    let health_routes = axum::Router::new().route("/v1/healthcheck", get(health::health_check));

    movie_routes
        .merge(health_routes)
        .fallback(movie_handlers::not_found)
        .method_not_allowed_fallback(movie_handlers::method_not_allowed)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
