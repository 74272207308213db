// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};

use axum::{routing::get, Router};
use chrono::FixedOffset;
use tower_http::trace::TraceLayer;

use crate::application::dashboard_service::DashboardService;
use crate::application::station_service::StationService;
use crate::infrastructure::config::{load_service_config, load_stations_config};
use crate::infrastructure::smartcitizen::SmartCitizenRepository;
use crate::infrastructure::sun_times::SunApiClient;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{get_dashboard, health_check, list_stations};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let service_config = load_service_config()?;
    let stations_config = load_stations_config()?;
    let settings = service_config.service;

    let display_offset = FixedOffset::east_opt(settings.display_utc_offset_hours * 3600)
        .ok_or_else(|| anyhow::anyhow!("display_utc_offset_hours out of range"))?;

    // Create repositories (infrastructure layer)
    let repository = Arc::new(SmartCitizenRepository::new(settings.smartcitizen_base_url));
    let sun_times = Arc::new(SunApiClient::new(settings.sun_api_base_url));

    // Create services (application layer)
    let dashboard_service = DashboardService::new(repository, sun_times);
    let station_service = StationService::new(stations_config.stations);

    // Create application state
    let state = Arc::new(AppState {
        dashboard_service,
        station_service,
        default_station_id: settings.default_station_id,
        display_offset,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/stations", get(list_stations))
        .route("/dashboard", get(get_dashboard))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = settings.listen_addr.parse()?;
    println!("Starting citizen-weather service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
