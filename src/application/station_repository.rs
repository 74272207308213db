// Repository traits for station data access
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::dashboard::SunTimes;
use crate::domain::reading::{Reading, SensorSnapshot};

/// Server-side pre-aggregation granularity for historical readings.
/// Intraday extrema use four-hour buckets; multi-day listings use
/// one-day buckets. The choice bounds what extrema are achievable, so
/// call sites must not swap one for the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rollup {
    FourHours,
    OneDay,
}

impl Rollup {
    pub fn as_str(self) -> &'static str {
        match self {
            Rollup::FourHours => "4h",
            Rollup::OneDay => "1d",
        }
    }
}

#[async_trait]
pub trait StationRepository: Send + Sync {
    /// Latest values for the tracked sensors of one device.
    async fn fetch_snapshot(&self, device_id: &str) -> anyhow::Result<SensorSnapshot>;

    /// Historical readings for one sensor over [from, to), chronological.
    async fn fetch_history(
        &self,
        device_id: &str,
        sensor_id: u32,
        from: NaiveDate,
        to: NaiveDate,
        rollup: Rollup,
    ) -> anyhow::Result<Vec<Reading>>;
}

/// Sunrise/sunset lookup for one location and day. Failures degrade to
/// `None`; the caller renders a placeholder.
#[async_trait]
pub trait SunTimesLookup: Send + Sync {
    async fn sun_times(&self, lat: f64, lon: f64, date: NaiveDate) -> Option<SunTimes>;
}
