// Sunrise/sunset lookup against api.sunrise-sunset.org
use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use crate::application::station_repository::SunTimesLookup;
use crate::domain::dashboard::SunTimes;

/// Client with a process-lifetime cache keyed by `(lat, lon, date)`.
/// The cache is unbounded and never evicted; a duplicate concurrent
/// lookup at worst repeats the request, and the second write is
/// identical to the first.
pub struct SunApiClient {
    base_url: String,
    client: reqwest::Client,
    cache: Mutex<HashMap<String, SunTimes>>,
}

#[derive(Debug, Deserialize)]
struct SunApiResponse {
    results: Option<SunApiResults>,
}

#[derive(Debug, Deserialize)]
struct SunApiResults {
    sunrise: Option<String>,
    sunset: Option<String>,
}

impl SunApiClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    fn cache_key(lat: f64, lon: f64, date: NaiveDate) -> String {
        format!("{},{},{}", lat, lon, date)
    }

    async fn fetch(&self, lat: f64, lon: f64, date: NaiveDate) -> Option<SunTimes> {
        let url = format!(
            "{}/json?lat={}&lng={}&date={}&formatted=0",
            self.base_url, lat, lon, date
        );

        let response = match self.client.get(&url).send().await {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                tracing::debug!("sun api returned status {} for {}", response.status(), url);
                return None;
            }
            Err(e) => {
                tracing::debug!("sun api request failed for {}: {}", url, e);
                return None;
            }
        };

        match response.json::<SunApiResponse>().await {
            Ok(body) => sun_times_from_response(body),
            Err(e) => {
                tracing::debug!("sun api response malformed for {}: {}", url, e);
                None
            }
        }
    }
}

/// The API reports UTC instants when `formatted=0`; timezone conversion
/// is the presenter's job.
fn sun_times_from_response(response: SunApiResponse) -> Option<SunTimes> {
    let results = response.results?;
    let sunrise = parse_utc(results.sunrise?.as_str())?;
    let sunset = parse_utc(results.sunset?.as_str())?;
    Some(SunTimes { sunrise, sunset })
}

fn parse_utc(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

#[async_trait]
impl SunTimesLookup for SunApiClient {
    async fn sun_times(&self, lat: f64, lon: f64, date: NaiveDate) -> Option<SunTimes> {
        if !lat.is_finite() || !lon.is_finite() {
            return None;
        }

        let key = Self::cache_key(lat, lon, date);
        if let Some(cached) = self.cache.lock().unwrap().get(&key) {
            return Some(*cached);
        }

        let times = self.fetch(lat, lon, date).await?;
        self.cache.lock().unwrap().insert(key, times);
        Some(times)
    }
}
