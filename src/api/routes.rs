use axum::{middleware, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;
use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // TMDB passthrough
        .route("/home", get(handlers::home_feed))
        .route("/tmdb/search", get(handlers::tmdb_search))
        .route("/movie/id/:tmdb_id", get(handlers::movie_details))
        // Recommendations
        .route("/recommend/genre", get(handlers::recommend_genre))
        .route("/recommend/tfidf", get(handlers::recommend_tfidf))
        .route("/movie/search", get(handlers::search_bundle))
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
