// Reading and snapshot domain models
use chrono::{DateTime, Utc};

use super::metric::Metric;

/// One timestamped value from a historical readings query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl Reading {
    pub fn new(timestamp: DateTime<Utc>, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Latest value for one tracked metric, as reported by the device.
/// A missing value stays `None`, never zero.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorReading {
    pub metric: Metric,
    pub name: String,
    pub value: Option<f64>,
    pub unit: Option<String>,
    pub last_reading_at: Option<DateTime<Utc>>,
}

/// Device metadata reported alongside the sensor list.
#[derive(Debug, Clone, PartialEq)]
pub struct StationInfo {
    pub id: String,
    pub name: String,
    pub city: String,
    pub country: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl StationInfo {
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}

/// Most recent value per tracked metric for one device.
///
/// An empty sensor list means the station is offline or has no data;
/// downstream stages render the fallback label instead of failing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorSnapshot {
    pub sensors: Vec<SensorReading>,
    pub info: Option<StationInfo>,
}

impl SensorSnapshot {
    pub fn is_offline(&self) -> bool {
        self.sensors.is_empty()
    }

    pub fn sensor(&self, metric: Metric) -> Option<&SensorReading> {
        self.sensors.iter().find(|s| s.metric == metric)
    }

    pub fn value(&self, metric: Metric) -> Option<f64> {
        self.sensor(metric).and_then(|s| s.value)
    }
}
