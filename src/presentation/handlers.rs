// HTTP request handlers
use crate::application::station_service::StationListing;
use crate::presentation::app_state::AppState;
use crate::presentation::view::{self, DashboardView};
use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct DashboardQuery {
    pub id: Option<String>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// List the station roster backing the map page
pub async fn list_stations(State(state): State<Arc<AppState>>) -> Json<Vec<StationListing>> {
    Json(state.station_service.list_stations())
}

/// Full dashboard for one station; falls back to the configured
/// default station when no id is given
pub async fn get_dashboard(
    Query(query): Query<DashboardQuery>,
    State(state): State<Arc<AppState>>,
) -> Json<DashboardView> {
    let station_id = query.id.unwrap_or_else(|| state.default_station_id.clone());
    let now = Utc::now();

    let dashboard = state.dashboard_service.get_dashboard(&station_id, now).await;
    Json(view::render_dashboard(&dashboard, now, state.display_offset))
}
