use crate::errors::AppError;
use crate::models::{
    CountriesResponse, LocationEntry, LocationResponse, MapPoint, RegionsResponse, SummaryResponse,
};
use crate::state::AppState;
use crate::ui::render_index;
use axum::{
    extract::{Path, State},
    response::Html,
    Json,
};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render_index(&state.dashboard.summary))
}

pub async fn get_summary(State(state): State<AppState>) -> Json<SummaryResponse> {
    Json(state.dashboard.summary.clone())
}

pub async fn list_locations(State(state): State<AppState>) -> Json<Vec<LocationEntry>> {
    Json(state.dashboard.location_entries())
}

pub async fn get_location(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<LocationResponse>, AppError> {
    state
        .dashboard
        .location(&key)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("unknown location '{key}'")))
}

pub async fn get_countries(State(state): State<AppState>) -> Json<CountriesResponse> {
    Json(state.dashboard.countries.clone())
}

pub async fn get_regions(State(state): State<AppState>) -> Json<RegionsResponse> {
    Json(state.dashboard.regions.clone())
}

pub async fn get_map(State(state): State<AppState>) -> Json<Vec<MapPoint>> {
    Json(state.dashboard.map.clone())
}
