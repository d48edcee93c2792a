use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/summary", get(handlers::get_summary))
        .route("/api/locations", get(handlers::list_locations))
        .route("/api/locations/:key", get(handlers::get_location))
        .route("/api/countries", get(handlers::get_countries))
        .route("/api/regions", get(handlers::get_regions))
        .route("/api/map", get(handlers::get_map))
        .with_state(state)
}
