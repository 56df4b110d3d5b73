mod handlers;

use axum::{
    routing::get,
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::store::OkrStore;

pub fn create_router(store: OkrStore) -> Router {
    let api = Router::new()
        // Objectives
        .route("/objectives", get(handlers::list_objectives))
        .route(
            "/objectives/{objective}/{key_result}/plus",
            get(handlers::increment_key_result).post(handlers::increment_key_result),
        )
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(store)
}
