// SmartCitizen API repository implementation
use crate::application::station_repository::{Rollup, StationRepository};
use crate::domain::metric::Metric;
use crate::domain::reading::{Reading, SensorReading, SensorSnapshot, StationInfo};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Network { url: String, source: reqwest::Error },
    #[error("unexpected status {status} from {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },
    #[error("malformed response from {url}: {source}")]
    Decode { url: String, source: reqwest::Error },
}

#[derive(Debug, Clone)]
pub struct SmartCitizenRepository {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct DeviceResponse {
    name: Option<String>,
    location: Option<LocationResponse>,
    data: Option<DeviceData>,
}

#[derive(Debug, Deserialize)]
struct DeviceData {
    #[serde(default)]
    sensors: Vec<SensorResponse>,
}

#[derive(Debug, Deserialize)]
struct SensorResponse {
    id: u32,
    name: Option<String>,
    value: Option<f64>,
    unit: Option<String>,
    last_reading_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LocationResponse {
    city: Option<String>,
    country: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ReadingsResponse {
    #[serde(default)]
    readings: Vec<(String, Option<f64>)>,
}

impl SmartCitizenRepository {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: String) -> Result<T, FetchError> {
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| FetchError::Network {
                url: url.clone(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                status: response.status(),
                url,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|source| FetchError::Decode { url, source })
    }
}

/// Filter the device's full sensor list down to the tracked metrics and
/// carry station metadata with the source's location fallbacks. A null
/// sensor value stays `None`, never zero.
fn snapshot_from_device(device_id: &str, device: DeviceResponse) -> SensorSnapshot {
    let sensors = device
        .data
        .map(|data| data.sensors)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|sensor| {
            let metric = Metric::from_sensor_id(sensor.id)?;
            Some(SensorReading {
                metric,
                name: sensor.name.unwrap_or_else(|| metric.label().to_string()),
                value: sensor.value,
                unit: sensor.unit,
                last_reading_at: sensor
                    .last_reading_at
                    .as_deref()
                    .and_then(parse_timestamp),
            })
        })
        .collect();

    let location = device.location;
    let info = StationInfo {
        id: device_id.to_string(),
        name: device.name.unwrap_or_default(),
        city: location
            .as_ref()
            .and_then(|l| l.city.clone())
            .unwrap_or_else(|| "Unknown City".to_string()),
        country: location
            .as_ref()
            .and_then(|l| l.country.clone())
            .unwrap_or_else(|| "Greece".to_string()),
        latitude: location.as_ref().and_then(|l| l.latitude),
        longitude: location.as_ref().and_then(|l| l.longitude),
    };

    SensorSnapshot {
        sensors,
        info: Some(info),
    }
}

/// Convert the wire's `[timestamp, value]` pairs into readings once, at
/// this boundary. Entries with a null value or an unparseable timestamp
/// are dropped.
fn readings_from_response(response: ReadingsResponse) -> Vec<Reading> {
    let mut readings: Vec<Reading> = response
        .readings
        .into_iter()
        .filter_map(|(timestamp, value)| {
            let value = value.filter(|v| v.is_finite())?;
            Some(Reading::new(parse_timestamp(&timestamp)?, value))
        })
        .collect();
    readings.sort_by_key(|r| r.timestamp);
    readings
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

#[async_trait]
impl StationRepository for SmartCitizenRepository {
    async fn fetch_snapshot(&self, device_id: &str) -> Result<SensorSnapshot> {
        let url = format!("{}/devices/{}", self.base_url, device_id);
        let device = self.get_json::<DeviceResponse>(url).await?;
        Ok(snapshot_from_device(device_id, device))
    }

    async fn fetch_history(
        &self,
        device_id: &str,
        sensor_id: u32,
        from: NaiveDate,
        to: NaiveDate,
        rollup: Rollup,
    ) -> Result<Vec<Reading>> {
        let url = format!(
            "{}/devices/{}/readings?sensor_id={}&rollup={}&from={}&to={}",
            self.base_url,
            device_id,
            sensor_id,
            rollup.as_str(),
            from,
            to
        );
        tracing::debug!("fetching history: {}", url);
        let response = self.get_json::<ReadingsResponse>(url).await?;
        Ok(readings_from_response(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_keeps_tracked_sensors_only() {
        let device: DeviceResponse = serde_json::from_value(serde_json::json!({
            "name": "Web2Learn-gym-Moudros",
            "location": {
                "city": "Moudros",
                "country": "Greece",
                "latitude": 39.87703,
                "longitude": 25.27187
            },
            "data": {
                "sensors": [
                    {"id": 55, "name": "Sensirion SHT31 - Temperature", "value": 21.4,
                     "unit": "ºC", "last_reading_at": "2025-06-01T12:00:00Z"},
                    {"id": 56, "name": "Sensirion SHT31 - Humidity", "value": null,
                     "unit": "%", "last_reading_at": null},
                    {"id": 14, "name": "BH1730FVC", "value": 380.0,
                     "unit": "lux", "last_reading_at": "2025-06-01T12:00:00Z"}
                ]
            }
        }))
        .unwrap();

        let snapshot = snapshot_from_device("19225", device);

        assert_eq!(snapshot.sensors.len(), 2);
        assert_eq!(snapshot.value(Metric::Temperature), Some(21.4));
        // Null value is absent, not zero
        assert_eq!(snapshot.value(Metric::Humidity), None);
        assert!(snapshot.sensor(Metric::Humidity).is_some());

        let info = snapshot.info.unwrap();
        assert_eq!(info.id, "19225");
        assert_eq!(info.city, "Moudros");
        assert_eq!(info.coordinates(), Some((39.87703, 25.27187)));
    }

    #[test]
    fn test_snapshot_location_fallbacks() {
        let device: DeviceResponse =
            serde_json::from_value(serde_json::json!({"name": "orphan"})).unwrap();

        let snapshot = snapshot_from_device("19226", device);

        assert!(snapshot.is_offline());
        let info = snapshot.info.unwrap();
        assert_eq!(info.city, "Unknown City");
        assert_eq!(info.country, "Greece");
        assert_eq!(info.coordinates(), None);
    }

    #[test]
    fn test_readings_drop_null_and_bad_entries() {
        let response: ReadingsResponse = serde_json::from_value(serde_json::json!({
            "readings": [
                ["2025-06-01T12:00:00Z", 22.0],
                ["2025-06-01T00:00:00Z", 30.0],
                ["2025-06-01T04:00:00Z", null],
                ["not a timestamp", 12.0]
            ]
        }))
        .unwrap();

        let readings = readings_from_response(response);

        assert_eq!(readings.len(), 2);
        // Chronological regardless of wire order
        assert_eq!(readings[0].value, 30.0);
        assert_eq!(readings[1].value, 22.0);
        assert!(readings[0].timestamp < readings[1].timestamp);
    }

    #[test]
    fn test_readings_empty_body() {
        let response: ReadingsResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(readings_from_response(response).is_empty());
    }
}
