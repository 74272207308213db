// Day bucketing and per-day extrema
use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::reading::Reading;

/// Maximum and minimum over one day's values. Both are `None` when the
/// day has no usable readings; there is no sentinel number.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DayExtrema {
    pub high: Option<f64>,
    pub low: Option<f64>,
}

impl DayExtrema {
    pub fn is_empty(&self) -> bool {
        self.high.is_none() && self.low.is_none()
    }
}

/// Group readings by the UTC date component of their timestamp.
/// Every reading lands in exactly one bucket.
pub fn group_by_day(readings: &[Reading]) -> BTreeMap<NaiveDate, Vec<f64>> {
    let mut buckets: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
    for reading in readings {
        buckets
            .entry(reading.timestamp.date_naive())
            .or_default()
            .push(reading.value);
    }
    buckets
}

/// One representative value per UTC date. Meant for 1d-rollup series,
/// which carry a single point per day; a later point for the same
/// date replaces the earlier one.
pub fn daily_value(readings: &[Reading]) -> BTreeMap<NaiveDate, f64> {
    let mut days = BTreeMap::new();
    for reading in readings {
        days.insert(reading.timestamp.date_naive(), reading.value);
    }
    days
}

/// Extrema over a day's values, optionally blended with the live reading.
/// The live value covers the gap between the last rollup and now, so it
/// participates in the same max/min.
pub fn day_extrema(values: &[f64], live: Option<f64>) -> DayExtrema {
    let mut extrema = DayExtrema::default();
    for value in values.iter().copied().chain(live) {
        if !value.is_finite() {
            continue;
        }
        extrema.high = Some(extrema.high.map_or(value, |h| h.max(value)));
        extrema.low = Some(extrema.low.map_or(value, |l| l.min(value)));
    }
    extrema
}

/// The most recent distinct days before `today`, newest first, capped.
pub fn recent_prior_days(
    dates: impl IntoIterator<Item = NaiveDate>,
    today: NaiveDate,
    cap: usize,
) -> Vec<NaiveDate> {
    let mut days: Vec<NaiveDate> = dates.into_iter().filter(|d| *d != today).collect();
    days.sort_unstable_by(|a, b| b.cmp(a));
    days.dedup();
    days.truncate(cap);
    days
}
