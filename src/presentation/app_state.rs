// Application state for HTTP handlers
use chrono::FixedOffset;

use crate::application::dashboard_service::DashboardService;
use crate::application::station_service::StationService;

#[derive(Clone)]
pub struct AppState {
    pub dashboard_service: DashboardService,
    pub station_service: StationService,
    pub default_station_id: String,
    pub display_offset: FixedOffset,
}
