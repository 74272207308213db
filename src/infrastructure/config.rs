use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub service: ServiceSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServiceSettings {
    pub listen_addr: String,
    pub smartcitizen_base_url: String,
    pub sun_api_base_url: String,
    pub default_station_id: String,
    /// Offset applied when rendering sunrise/sunset and clock text.
    pub display_utc_offset_hours: i32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StationsConfig {
    #[serde(default)]
    pub stations: Vec<StationConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StationConfig {
    pub id: String,
    pub name: String,
    pub city: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
}

pub fn load_service_config() -> anyhow::Result<ServiceConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/service"))
        .build()?;

    Ok(settings.try_deserialize()?)
}

pub fn load_stations_config() -> anyhow::Result<StationsConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/stations"))
        .build()?;

    Ok(settings.try_deserialize()?)
}
