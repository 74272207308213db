// Threshold classification for the dashboard widgets
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::metric::Metric;

/// Color tag applied to a highlight card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CardTag {
    Cold,
    Cool,
    Comfortable,
    Warm,
    Hot,
    Green,
    LightGreen,
    Yellow,
    Orange,
    Red,
}

impl CardTag {
    pub fn css_class(self) -> &'static str {
        match self {
            CardTag::Cold => "card-cold",
            CardTag::Cool => "card-cool",
            CardTag::Comfortable => "card-comfortable",
            CardTag::Warm => "card-warm",
            CardTag::Hot => "card-hot",
            CardTag::Green => "card-green",
            CardTag::LightGreen => "card-light-green",
            CardTag::Yellow => "card-yellow",
            CardTag::Orange => "card-orange",
            CardTag::Red => "card-red",
        }
    }
}

/// One row of a threshold table: the value belongs to this band when it
/// is below `upper`, or equal to it when the bound is inclusive.
struct Band<T> {
    upper: f64,
    inclusive: bool,
    tag: T,
}

const fn below<T>(upper: f64, tag: T) -> Band<T> {
    Band {
        upper,
        inclusive: false,
        tag,
    }
}

const fn up_to<T>(upper: f64, tag: T) -> Band<T> {
    Band {
        upper,
        inclusive: true,
        tag,
    }
}

/// Tables are evaluated first-match, top to bottom. The final INFINITY
/// row is the out-of-range catch-all; NaN also lands there.
fn first_match<T: Copy>(bands: &[Band<T>], value: f64) -> T {
    for band in bands {
        let matches = if band.inclusive {
            value <= band.upper
        } else {
            value < band.upper
        };
        if matches {
            return band.tag;
        }
    }
    bands[bands.len() - 1].tag
}

const TEMPERATURE_BANDS: &[Band<CardTag>] = &[
    up_to(10.0, CardTag::Cold),
    up_to(18.0, CardTag::Cool),
    up_to(26.0, CardTag::Comfortable),
    up_to(32.0, CardTag::Warm),
    up_to(f64::INFINITY, CardTag::Hot),
];

const HUMIDITY_BANDS: &[Band<CardTag>] = &[
    below(10.0, CardTag::Red),
    below(20.0, CardTag::Orange),
    below(30.0, CardTag::Yellow),
    below(40.0, CardTag::LightGreen),
    up_to(60.0, CardTag::Green),
    up_to(70.0, CardTag::LightGreen),
    up_to(80.0, CardTag::Yellow),
    up_to(90.0, CardTag::Orange),
    up_to(f64::INFINITY, CardTag::Red),
];

const PM25_BANDS: &[Band<CardTag>] = &[
    up_to(5.0, CardTag::Green),
    up_to(15.0, CardTag::LightGreen),
    up_to(25.0, CardTag::Yellow),
    up_to(50.0, CardTag::Orange),
    up_to(f64::INFINITY, CardTag::Red),
];

const NOISE_BANDS: &[Band<CardTag>] = &[
    below(40.0, CardTag::Green),
    up_to(55.0, CardTag::LightGreen),
    up_to(65.0, CardTag::Yellow),
    up_to(75.0, CardTag::Orange),
    up_to(f64::INFINITY, CardTag::Red),
];

/// Highlight-card tag for one metric value.
pub fn card_tag(metric: Metric, value: f64) -> CardTag {
    let bands = match metric {
        Metric::Temperature => TEMPERATURE_BANDS,
        Metric::Humidity => HUMIDITY_BANDS,
        Metric::Pm25 => PM25_BANDS,
        Metric::Noise => NOISE_BANDS,
    };
    first_match(bands, value)
}

/// Coarse quality grade used by the today panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityClass {
    Good,
    Moderate,
    Bad,
    Blue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QualityLabel {
    pub text: &'static str,
    pub class: QualityClass,
}

const fn quality(text: &'static str, class: QualityClass) -> QualityLabel {
    QualityLabel { text, class }
}

const TEMPERATURE_QUALITY: &[Band<QualityLabel>] = &[
    up_to(10.0, quality("Cold", QualityClass::Blue)),
    below(25.0, quality("Normal", QualityClass::Good)),
    up_to(f64::INFINITY, quality("Hot", QualityClass::Bad)),
];

const HUMIDITY_QUALITY: &[Band<QualityLabel>] = &[
    below(30.0, quality("Dry", QualityClass::Moderate)),
    up_to(60.0, quality("Ideal", QualityClass::Good)),
    up_to(f64::INFINITY, quality("Humid", QualityClass::Bad)),
];

const PM25_QUALITY: &[Band<QualityLabel>] = &[
    up_to(12.0, quality("Good", QualityClass::Good)),
    up_to(35.4, quality("Moderate", QualityClass::Moderate)),
    up_to(f64::INFINITY, quality("Unhealthy", QualityClass::Bad)),
];

const NOISE_QUALITY: &[Band<QualityLabel>] = &[
    below(40.0, quality("Quiet", QualityClass::Good)),
    up_to(70.0, quality("Normal", QualityClass::Moderate)),
    up_to(f64::INFINITY, quality("Loud", QualityClass::Bad)),
];

/// Today-panel quality label for one metric value. Coarser vocabulary
/// than [`card_tag`]; both drive different widgets.
pub fn panel_quality(metric: Metric, value: f64) -> QualityLabel {
    let table = match metric {
        Metric::Temperature => TEMPERATURE_QUALITY,
        Metric::Humidity => HUMIDITY_QUALITY,
        Metric::Pm25 => PM25_QUALITY,
        Metric::Noise => NOISE_QUALITY,
    };
    first_match(table, value)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
}

struct SeasonBand {
    low: f64,
    high: f64,
}

impl Season {
    pub fn from_month(month: u32) -> Season {
        match month {
            12 | 1 | 2 => Season::Winter,
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            _ => Season::Autumn,
        }
    }

    // Expected temperature range on Limnos, per season. Local lookup
    // table, not a climate model.
    fn band(self) -> SeasonBand {
        match self {
            Season::Winter => SeasonBand { low: 6.0, high: 14.0 },
            Season::Spring => SeasonBand { low: 11.0, high: 22.0 },
            Season::Summer => SeasonBand { low: 22.0, high: 31.0 },
            Season::Autumn => SeasonBand { low: 13.0, high: 24.0 },
        }
    }
}

/// Where a day's midpoint temperature sits relative to the seasonal norm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeasonalTag {
    Below,
    Within,
    Above,
}

impl SeasonalTag {
    pub fn css_class(self) -> &'static str {
        match self {
            SeasonalTag::Below => "tag-blue",
            SeasonalTag::Within => "tag-green",
            SeasonalTag::Above => "tag-orange",
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            SeasonalTag::Below => "Low temperatures for the season",
            SeasonalTag::Within => "Normal temperatures for the season",
            SeasonalTag::Above => "High temperatures for the season",
        }
    }
}

/// Compare a day's midpoint temperature, (high + low) / 2, against the
/// seasonal band for the day's month. Unknown extrema grade as within.
pub fn seasonal_tag(high: Option<f64>, low: Option<f64>, date: NaiveDate) -> SeasonalTag {
    let (Some(high), Some(low)) = (high, low) else {
        return SeasonalTag::Within;
    };
    if !high.is_finite() || !low.is_finite() {
        return SeasonalTag::Within;
    }

    let band = Season::from_month(date.month()).band();
    let mid = (high + low) / 2.0;
    if mid < band.low {
        SeasonalTag::Below
    } else if mid > band.high {
        SeasonalTag::Above
    } else {
        SeasonalTag::Within
    }
}

/// Icon for the live condition widget, picked from humidity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionIcon {
    Clear,
    Mist,
    Rain,
}

impl ConditionIcon {
    pub fn from_humidity(humidity: f64) -> ConditionIcon {
        if humidity >= 75.0 {
            ConditionIcon::Rain
        } else if humidity >= 50.0 {
            ConditionIcon::Mist
        } else {
            ConditionIcon::Clear
        }
    }
}

/// Icon for a history day card, picked from the day's humidity rollup.
/// The bounds are exclusive here, unlike the live condition widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DayIcon {
    Sunny,
    Cloud,
    Rain,
}

impl DayIcon {
    pub fn from_humidity(humidity: Option<f64>) -> DayIcon {
        match humidity {
            Some(h) if h.is_finite() && h > 75.0 => DayIcon::Rain,
            Some(h) if h.is_finite() && h > 50.0 => DayIcon::Cloud,
            _ => DayIcon::Sunny,
        }
    }
}
