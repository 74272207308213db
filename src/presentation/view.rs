// View models - formatted values and style tags for the page's slots
use chrono::{DateTime, Datelike, FixedOffset, Utc};
use serde::Serialize;

use crate::domain::classify::{ConditionIcon, DayIcon, QualityClass};
use crate::domain::dashboard::{Dashboard, SunTimes};
use crate::domain::metric::Metric;
use crate::domain::reading::StationInfo;

pub const OFFLINE_LABEL: &str = "Sensor Offline or No Data";
const NO_HISTORY: &str = "No history found.";
const NO_HISTORY_DATA: &str = "No history data found.";

const TEMP_BAR_MIN: f64 = -5.0;
const TEMP_BAR_MAX: f64 = 45.0;

#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub online: bool,
    pub station_label: String,
    pub condition: Option<ConditionView>,
    pub highlights: Vec<HighlightCardView>,
    pub realtime: Vec<RealtimeEntryView>,
    pub today_panel: Vec<PanelMetricView>,
    pub hero: HeroView,
    pub temp_bar: Option<TempBarView>,
    pub today_cards: Vec<TodayCardView>,
    pub history: Vec<DayCardView>,
    pub history_placeholder: Option<&'static str>,
}

/// Weekday-and-clock line next to the weather icon.
#[derive(Debug, Serialize)]
pub struct ConditionView {
    pub icon: ConditionIcon,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct HighlightCardView {
    pub metric: Metric,
    pub value_text: String,
    pub card_class: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct RealtimeEntryView {
    pub metric: Metric,
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct PanelMetricView {
    pub metric: Metric,
    pub status_label: String,
    pub value_text: String,
    pub unit_text: String,
    pub quality_text: &'static str,
    pub quality_class: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HeroView {
    pub high_text: String,
    pub low_text: String,
}

#[derive(Debug, Serialize)]
pub struct TempBarView {
    pub value_text: String,
    pub percent: f64,
}

#[derive(Debug, Serialize)]
pub struct TodayCardView {
    pub metric: Metric,
    pub days: Vec<TodayDayView>,
    pub placeholder: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct TodayDayView {
    pub label: String,
    pub day_number: u32,
    pub is_today: bool,
    pub high_text: String,
    pub low_text: String,
}

#[derive(Debug, Serialize)]
pub struct DayCardView {
    pub day_number: u32,
    pub month: String,
    pub weekday: String,
    pub sun_text: String,
    pub icon: DayIcon,
    pub high_text: String,
    pub low_text: String,
    pub humidity_text: String,
    pub pm25_text: String,
    pub noise_text: String,
    pub tag_class: &'static str,
    pub tag_text: &'static str,
}

pub fn render_dashboard(
    dashboard: &Dashboard,
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> DashboardView {
    if dashboard.is_offline() {
        return DashboardView {
            online: false,
            station_label: OFFLINE_LABEL.to_string(),
            condition: None,
            highlights: Vec::new(),
            realtime: Vec::new(),
            today_panel: Vec::new(),
            hero: HeroView {
                high_text: "--".to_string(),
                low_text: "--".to_string(),
            },
            temp_bar: None,
            today_cards: Vec::new(),
            history: Vec::new(),
            history_placeholder: Some(NO_HISTORY_DATA),
        };
    }

    let highlights = dashboard
        .highlights
        .iter()
        .map(|card| HighlightCardView {
            metric: card.metric,
            value_text: match card.value {
                Some(value) => format!(
                    "{}{}",
                    metric_value_text(card.metric, value),
                    pretty_unit(card.unit.as_deref())
                ),
                None => "--".to_string(),
            },
            card_class: card.tag.map(|tag| tag.css_class()),
        })
        .collect();

    let realtime = Metric::ALL
        .iter()
        .filter_map(|&metric| {
            let value = dashboard
                .sensors
                .iter()
                .find(|s| s.metric == metric)
                .and_then(|s| s.value)?;
            Some(RealtimeEntryView {
                metric,
                text: format!("{}{}", value.round() as i64, metric_suffix(metric)),
            })
        })
        .collect();

    let condition = dashboard.condition_icon.map(|icon| ConditionView {
        icon,
        text: now.with_timezone(&offset).format("%A, %H:%M").to_string(),
    });

    let today_panel = dashboard
        .today_panel
        .iter()
        .map(|panel| PanelMetricView {
            metric: panel.metric,
            status_label: panel.name.clone(),
            value_text: panel
                .value
                .map(|v| metric_value_text(panel.metric, v))
                .unwrap_or_else(|| "--".to_string()),
            unit_text: panel.unit.clone().unwrap_or_default(),
            quality_text: panel.quality.map_or("N/A", |q| q.text),
            quality_class: panel
                .quality
                .map_or("quality-moderate", |q| quality_css(q.class)),
        })
        .collect();

    let hero = HeroView {
        high_text: round_text(dashboard.hero.high),
        low_text: round_text(dashboard.hero.low),
    };

    let temp_bar = dashboard
        .sensors
        .iter()
        .find(|s| s.metric == Metric::Temperature)
        .and_then(|sensor| {
            let value = sensor.value?;
            Some(TempBarView {
                value_text: format!(
                    "{}{}",
                    metric_value_text(Metric::Temperature, value),
                    pretty_unit(sensor.unit.as_deref())
                ),
                percent: temp_bar_percent(value),
            })
        });

    let today_cards = dashboard
        .today_cards
        .iter()
        .map(|card| TodayCardView {
            metric: card.metric,
            days: card
                .days
                .iter()
                .map(|day| TodayDayView {
                    label: if day.is_today {
                        "Today".to_string()
                    } else {
                        day.date.format("%a").to_string()
                    },
                    day_number: day.date.day(),
                    is_today: day.is_today,
                    high_text: day_value_text(card.metric, day.extrema.high),
                    low_text: day_value_text(card.metric, day.extrema.low),
                })
                .collect(),
            placeholder: card.days.is_empty().then_some(NO_HISTORY),
        })
        .collect();

    let history: Vec<DayCardView> = dashboard
        .history
        .iter()
        .map(|card| DayCardView {
            day_number: card.date.day(),
            month: card.date.format("%B").to_string().to_uppercase(),
            weekday: card.date.format("%A").to_string().to_uppercase(),
            sun_text: sun_text(card.sun.as_ref(), offset),
            icon: card.icon,
            high_text: day_value_text(Metric::Temperature, card.extrema.high),
            low_text: day_value_text(Metric::Temperature, card.extrema.low),
            humidity_text: format!("{}%", int_or_dash(card.humidity)),
            pm25_text: format!("{} µg/m³", int_or_dash(card.pm25)),
            noise_text: format!("{} dB", int_or_dash(card.noise)),
            tag_class: card.seasonal.css_class(),
            tag_text: card.seasonal.text(),
        })
        .collect();
    let history_placeholder = history.is_empty().then_some(NO_HISTORY_DATA);

    DashboardView {
        online: true,
        station_label: dashboard
            .station
            .as_ref()
            .map_or_else(|| OFFLINE_LABEL.to_string(), station_label),
        condition,
        highlights,
        realtime,
        today_panel,
        hero,
        temp_bar,
        today_cards,
        history,
        history_placeholder,
    }
}

fn station_label(info: &StationInfo) -> String {
    format!(
        "{} - {} - {} - {}",
        info.city,
        info.name,
        coordinate_text(info.latitude),
        coordinate_text(info.longitude)
    )
}

fn coordinate_text(value: Option<f64>) -> String {
    value.map_or_else(|| "--".to_string(), |v| v.to_string())
}

/// Highlight-card and today-panel number: one decimal for temperature
/// and humidity, integer for PM2.5 and noise.
fn metric_value_text(metric: Metric, value: f64) -> String {
    match metric {
        Metric::Temperature | Metric::Humidity => format!("{:.1}", value),
        Metric::Pm25 | Metric::Noise => format!("{}", value.round() as i64),
    }
}

fn pretty_unit(unit: Option<&str>) -> String {
    match unit {
        None => String::new(),
        Some("ug/m3") => " µg/m³".to_string(),
        Some(unit) => format!(" {}", unit),
    }
}

fn metric_suffix(metric: Metric) -> &'static str {
    match metric {
        Metric::Temperature => "°C",
        Metric::Humidity => "%",
        Metric::Pm25 => " µg/m³",
        Metric::Noise => " dB",
    }
}

/// Rounded value with the metric's suffix, "--" when unknown.
fn day_value_text(metric: Metric, value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{}{}", v.round() as i64, metric_suffix(metric)),
        _ => "--".to_string(),
    }
}

fn round_text(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{}", v.round() as i64),
        _ => "--".to_string(),
    }
}

fn int_or_dash(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{}", v.round() as i64),
        _ => "-".to_string(),
    }
}

// Blue shares the good styling.
fn quality_css(class: QualityClass) -> &'static str {
    match class {
        QualityClass::Good | QualityClass::Blue => "quality-good",
        QualityClass::Moderate => "quality-moderate",
        QualityClass::Bad => "quality-bad",
    }
}

fn temp_bar_percent(value: f64) -> f64 {
    let percent = (value - TEMP_BAR_MIN) / (TEMP_BAR_MAX - TEMP_BAR_MIN) * 100.0;
    percent.clamp(0.0, 100.0)
}

fn sun_text(sun: Option<&SunTimes>, offset: FixedOffset) -> String {
    match sun {
        Some(sun) => format!(
            "Sunrise: {} – Sunset: {}",
            sun.sunrise.with_timezone(&offset).format("%H:%M"),
            sun.sunset.with_timezone(&offset).format("%H:%M")
        ),
        None => "Sunrise: --:-- – Sunset: --:--".to_string(),
    }
}
