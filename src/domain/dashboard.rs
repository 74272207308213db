// Dashboard domain model - everything the presenter needs, fully computed
use chrono::{DateTime, NaiveDate, Utc};

use super::aggregate::DayExtrema;
use super::classify::{CardTag, ConditionIcon, DayIcon, QualityLabel, SeasonalTag};
use super::metric::Metric;
use super::reading::{SensorReading, StationInfo};

/// Sunrise and sunset instants for one day, in UTC.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunTimes {
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
}

/// One highlight card: the live value plus its fine-grained color tag.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightCard {
    pub metric: Metric,
    pub value: Option<f64>,
    pub unit: Option<String>,
    pub tag: Option<CardTag>,
}

/// One row of the today panel: the live value with its coarse grade.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelMetric {
    pub metric: Metric,
    pub name: String,
    pub value: Option<f64>,
    pub unit: Option<String>,
    pub quality: Option<QualityLabel>,
}

/// High/low line inside a today card, one per recent day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayHighLow {
    pub date: NaiveDate,
    pub is_today: bool,
    pub extrema: DayExtrema,
}

/// Recent-days list for one metric: today first, then prior days.
#[derive(Debug, Clone, PartialEq)]
pub struct TodayCard {
    pub metric: Metric,
    pub days: Vec<DayHighLow>,
}

/// One card of the 30-day history section.
#[derive(Debug, Clone, PartialEq)]
pub struct DayCard {
    pub date: NaiveDate,
    pub extrema: DayExtrema,
    pub humidity: Option<f64>,
    pub pm25: Option<f64>,
    pub noise: Option<f64>,
    pub icon: DayIcon,
    pub seasonal: SeasonalTag,
    pub sun: Option<SunTimes>,
}

/// Fully assembled dashboard for one station. An offline dashboard has
/// an empty sensor list and nothing else populated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dashboard {
    pub station: Option<StationInfo>,
    pub sensors: Vec<SensorReading>,
    pub highlights: Vec<HighlightCard>,
    pub today_panel: Vec<PanelMetric>,
    pub condition_icon: Option<ConditionIcon>,
    pub hero: DayExtrema,
    pub today_cards: Vec<TodayCard>,
    pub history: Vec<DayCard>,
}

impl Dashboard {
    pub fn offline() -> Self {
        Self::default()
    }

    pub fn is_offline(&self) -> bool {
        self.sensors.is_empty()
    }
}
