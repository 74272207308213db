// Station service - Use case for listing the station roster
use serde::Serialize;

use crate::infrastructure::config::StationConfig;

/// One roster entry for the map page, with the link its popup opens.
#[derive(Debug, Clone, Serialize)]
pub struct StationListing {
    pub id: String,
    pub name: String,
    pub city: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
    pub dashboard_link: String,
}

#[derive(Clone)]
pub struct StationService {
    stations: Vec<StationConfig>,
}

impl StationService {
    pub fn new(stations: Vec<StationConfig>) -> Self {
        Self { stations }
    }

    pub fn list_stations(&self) -> Vec<StationListing> {
        self.stations
            .iter()
            .map(|station| StationListing {
                id: station.id.clone(),
                name: station.name.clone(),
                city: station.city.clone(),
                country: station.country.clone(),
                lat: station.lat,
                lon: station.lon,
                dashboard_link: dashboard_link(station),
            })
            .collect()
    }
}

fn dashboard_link(station: &StationConfig) -> String {
    format!(
        "?id={}&name={}&city={}&country={}&lat={}&lon={}",
        station.id,
        urlencoding::encode(&station.name),
        urlencoding::encode(&station.city),
        urlencoding::encode(&station.country),
        station.lat,
        station.lon
    )
}
