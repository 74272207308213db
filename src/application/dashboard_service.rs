// Dashboard service - Use case for building the station dashboard
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use futures::future::join_all;

use crate::application::station_repository::{Rollup, StationRepository, SunTimesLookup};
use crate::domain::aggregate::{DayExtrema, daily_value, day_extrema, recent_prior_days};
use crate::domain::classify::{self, ConditionIcon, DayIcon};
use crate::domain::dashboard::{
    Dashboard, DayCard, DayHighLow, HighlightCard, PanelMetric, TodayCard,
};
use crate::domain::metric::Metric;
use crate::domain::reading::{Reading, SensorSnapshot};

const HISTORY_WINDOW_DAYS: i64 = 30;
const TODAY_CARD_WINDOW_DAYS: i64 = 5;
const TODAY_CARD_PRIOR_DAYS: usize = 4;

#[derive(Clone)]
pub struct DashboardService {
    repository: Arc<dyn StationRepository>,
    sun_times: Arc<dyn SunTimesLookup>,
}

impl DashboardService {
    pub fn new(repository: Arc<dyn StationRepository>, sun_times: Arc<dyn SunTimesLookup>) -> Self {
        Self {
            repository,
            sun_times,
        }
    }

    /// Build the full dashboard for one device. Fetch failures degrade
    /// to empty widgets; the offline dashboard is the worst case.
    pub async fn get_dashboard(&self, device_id: &str, now: DateTime<Utc>) -> Dashboard {
        let snapshot = match self.repository.fetch_snapshot(device_id).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!("live snapshot fetch failed for device {}: {:#}", device_id, e);
                SensorSnapshot::default()
            }
        };

        if snapshot.is_offline() {
            tracing::warn!("no live sensor data for device {}", device_id);
            return Dashboard::offline();
        }

        let today = now.date_naive();

        let highlights = Self::highlights(&snapshot);
        let today_panel = Self::today_panel(&snapshot);
        let condition_icon = snapshot
            .value(Metric::Humidity)
            .map(ConditionIcon::from_humidity);

        // The hero widget covers the day of the last temperature
        // reading; the live value only blends in when that day is today.
        let temp_sensor = snapshot.sensor(Metric::Temperature);
        let live_temp = temp_sensor.and_then(|s| s.value);
        let reference_date = temp_sensor
            .and_then(|s| s.last_reading_at)
            .unwrap_or(now)
            .date_naive();
        let hero_live = if reference_date == today { live_temp } else { None };

        let (hero, today_cards, history) = futures::join!(
            self.day_high_low(device_id, Metric::Temperature, reference_date, hero_live),
            self.today_cards(device_id, &snapshot, today),
            self.history_section(device_id, &snapshot, today),
        );

        Dashboard {
            station: snapshot.info,
            sensors: snapshot.sensors,
            highlights,
            today_panel,
            condition_icon,
            hero,
            today_cards,
            history,
        }
    }

    fn highlights(snapshot: &SensorSnapshot) -> Vec<HighlightCard> {
        Metric::ALL
            .iter()
            .map(|&metric| {
                let sensor = snapshot.sensor(metric);
                let value = sensor.and_then(|s| s.value);
                HighlightCard {
                    metric,
                    value,
                    unit: sensor.and_then(|s| s.unit.clone()),
                    tag: value.map(|v| classify::card_tag(metric, v)),
                }
            })
            .collect()
    }

    fn today_panel(snapshot: &SensorSnapshot) -> Vec<PanelMetric> {
        Metric::ALL
            .iter()
            .filter_map(|&metric| {
                let sensor = snapshot.sensor(metric)?;
                Some(PanelMetric {
                    metric,
                    name: sensor.name.clone(),
                    value: sensor.value,
                    unit: sensor.unit.clone(),
                    quality: sensor.value.map(|v| classify::panel_quality(metric, v)),
                })
            })
            .collect()
    }

    /// Extrema for one calendar day, from the 4h rollup, optionally
    /// blended with the live reading.
    async fn day_high_low(
        &self,
        device_id: &str,
        metric: Metric,
        date: NaiveDate,
        live: Option<f64>,
    ) -> DayExtrema {
        let readings = self
            .fetch_history_soft(
                device_id,
                metric,
                date,
                date + Duration::days(1),
                Rollup::FourHours,
            )
            .await;
        let values: Vec<f64> = readings.iter().map(|r| r.value).collect();
        day_extrema(&values, live)
    }

    async fn today_cards(
        &self,
        device_id: &str,
        snapshot: &SensorSnapshot,
        today: NaiveDate,
    ) -> Vec<TodayCard> {
        join_all(
            Metric::ALL
                .iter()
                .map(|&metric| self.today_card(device_id, metric, snapshot.value(metric), today)),
        )
        .await
    }

    async fn today_card(
        &self,
        device_id: &str,
        metric: Metric,
        live: Option<f64>,
        today: NaiveDate,
    ) -> TodayCard {
        let today_extrema = self.day_high_low(device_id, metric, today, live).await;

        let from = today - Duration::days(TODAY_CARD_WINDOW_DAYS);
        let daily = self
            .fetch_history_soft(device_id, metric, from, today, Rollup::OneDay)
            .await;
        let prior = recent_prior_days(
            daily.iter().map(|r| r.timestamp.date_naive()),
            today,
            TODAY_CARD_PRIOR_DAYS,
        );

        let mut days = Vec::with_capacity(prior.len() + 1);
        if !today_extrema.is_empty() {
            days.push(DayHighLow {
                date: today,
                is_today: true,
                extrema: today_extrema,
            });
        }

        let prior_extrema = join_all(
            prior
                .iter()
                .map(|&date| self.day_high_low(device_id, metric, date, None)),
        )
        .await;
        days.extend(
            prior
                .into_iter()
                .zip(prior_extrema)
                .map(|(date, extrema)| DayHighLow {
                    date,
                    is_today: false,
                    extrema,
                }),
        );

        TodayCard { metric, days }
    }

    async fn history_section(
        &self,
        device_id: &str,
        snapshot: &SensorSnapshot,
        today: NaiveDate,
    ) -> Vec<DayCard> {
        let from = today - Duration::days(HISTORY_WINDOW_DAYS);

        let (temp, humidity, pm25, noise) = futures::join!(
            self.fetch_history_soft(device_id, Metric::Temperature, from, today, Rollup::OneDay),
            self.fetch_history_soft(device_id, Metric::Humidity, from, today, Rollup::OneDay),
            self.fetch_history_soft(device_id, Metric::Pm25, from, today, Rollup::OneDay),
            self.fetch_history_soft(device_id, Metric::Noise, from, today, Rollup::OneDay),
        );

        let temp_days = daily_value(&temp);
        let humidity_days = daily_value(&humidity);
        let pm25_days = daily_value(&pm25);
        let noise_days = daily_value(&noise);

        let coordinates = snapshot.info.as_ref().and_then(|info| info.coordinates());

        // Only days with a temperature rollup get a card, newest first
        let cards = temp_days.keys().rev().map(|&date| {
            let humidity = humidity_days.get(&date).copied();
            let pm25 = pm25_days.get(&date).copied();
            let noise = noise_days.get(&date).copied();
            async move {
                let extrema = self
                    .day_high_low(device_id, Metric::Temperature, date, None)
                    .await;
                // The seasonal grade sees the rounded display values
                let seasonal = classify::seasonal_tag(
                    extrema.high.map(f64::round),
                    extrema.low.map(f64::round),
                    date,
                );
                let sun = match coordinates {
                    Some((lat, lon)) => self.sun_times.sun_times(lat, lon, date).await,
                    None => None,
                };
                DayCard {
                    date,
                    extrema,
                    humidity,
                    pm25,
                    noise,
                    icon: DayIcon::from_humidity(humidity),
                    seasonal,
                    sun,
                }
            }
        });
        join_all(cards).await
    }

    async fn fetch_history_soft(
        &self,
        device_id: &str,
        metric: Metric,
        from: NaiveDate,
        to: NaiveDate,
        rollup: Rollup,
    ) -> Vec<Reading> {
        match self
            .repository
            .fetch_history(device_id, metric.sensor_id(), from, to, rollup)
            .await
        {
            Ok(readings) => readings,
            Err(e) => {
                tracing::warn!(
                    "history fetch failed for device {} sensor {}: {:#}",
                    device_id,
                    metric.sensor_id(),
                    e
                );
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::classify::SeasonalTag;
    use crate::domain::reading::{SensorReading, StationInfo};
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct StubRepository {
        snapshot: Option<SensorSnapshot>,
        history: HashMap<(u32, Rollup), Vec<Reading>>,
    }

    impl StubRepository {
        fn offline() -> Self {
            Self {
                snapshot: None,
                history: HashMap::new(),
            }
        }

        fn with_snapshot(snapshot: SensorSnapshot) -> Self {
            Self {
                snapshot: Some(snapshot),
                history: HashMap::new(),
            }
        }

        fn history(mut self, sensor_id: u32, rollup: Rollup, readings: Vec<Reading>) -> Self {
            self.history.insert((sensor_id, rollup), readings);
            self
        }
    }

    #[async_trait]
    impl StationRepository for StubRepository {
        async fn fetch_snapshot(&self, _device_id: &str) -> anyhow::Result<SensorSnapshot> {
            self.snapshot
                .clone()
                .ok_or_else(|| anyhow::anyhow!("unexpected status 500 Internal Server Error"))
        }

        async fn fetch_history(
            &self,
            _device_id: &str,
            sensor_id: u32,
            from: NaiveDate,
            to: NaiveDate,
            rollup: Rollup,
        ) -> anyhow::Result<Vec<Reading>> {
            let readings = self
                .history
                .get(&(sensor_id, rollup))
                .cloned()
                .unwrap_or_default();
            Ok(readings
                .into_iter()
                .filter(|r| {
                    let date = r.timestamp.date_naive();
                    date >= from && date < to
                })
                .collect())
        }
    }

    struct NoSun;

    #[async_trait]
    impl SunTimesLookup for NoSun {
        async fn sun_times(
            &self,
            _lat: f64,
            _lon: f64,
            _date: NaiveDate,
        ) -> Option<crate::domain::dashboard::SunTimes> {
            None
        }
    }

    fn ts(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn reading(s: &str, value: f64) -> Reading {
        Reading::new(ts(s), value)
    }

    fn service(repository: StubRepository) -> DashboardService {
        DashboardService::new(Arc::new(repository), Arc::new(NoSun))
    }

    fn snapshot_with_temp(value: Option<f64>, last_reading_at: &str) -> SensorSnapshot {
        SensorSnapshot {
            sensors: vec![SensorReading {
                metric: Metric::Temperature,
                name: "Sensirion SHT31 - Temperature".to_string(),
                value,
                unit: Some("ºC".to_string()),
                last_reading_at: Some(ts(last_reading_at)),
            }],
            info: Some(StationInfo {
                id: "19225".to_string(),
                name: "Web2Learn-gym-Moudros".to_string(),
                city: "Moudros".to_string(),
                country: "Greece".to_string(),
                latitude: Some(39.87703),
                longitude: Some(25.27187),
            }),
        }
    }

    #[tokio::test]
    async fn test_offline_snapshot_yields_offline_dashboard() {
        let service = service(StubRepository::offline());
        let dashboard = service
            .get_dashboard("19225", ts("2025-06-01T15:00:00Z"))
            .await;

        assert!(dashboard.is_offline());
        assert!(dashboard.sensors.is_empty());
        assert!(dashboard.highlights.is_empty());
        assert!(dashboard.history.is_empty());
        assert!(dashboard.hero.is_empty());
    }

    #[tokio::test]
    async fn test_hero_extrema_from_intraday_history() {
        let repository =
            StubRepository::with_snapshot(snapshot_with_temp(None, "2025-06-01T12:00:00Z"))
                .history(
                    55,
                    Rollup::FourHours,
                    vec![
                        reading("2025-06-01T00:00:00Z", 30.0),
                        reading("2025-06-01T12:00:00Z", 22.0),
                    ],
                );

        let dashboard = service(repository)
            .get_dashboard("19225", ts("2025-06-01T15:00:00Z"))
            .await;

        assert_eq!(dashboard.hero.high, Some(30.0));
        assert_eq!(dashboard.hero.low, Some(22.0));
    }

    #[tokio::test]
    async fn test_hero_blends_live_value_when_history_empty() {
        let repository =
            StubRepository::with_snapshot(snapshot_with_temp(Some(19.4), "2025-06-01T14:55:00Z"));

        let dashboard = service(repository)
            .get_dashboard("19225", ts("2025-06-01T15:00:00Z"))
            .await;

        assert_eq!(dashboard.hero.high, Some(19.4));
        assert_eq!(dashboard.hero.low, Some(19.4));
    }

    #[tokio::test]
    async fn test_hero_skips_live_value_for_stale_reference_date() {
        // Last reading was yesterday; the live value must not leak into
        // yesterday's extrema.
        let repository =
            StubRepository::with_snapshot(snapshot_with_temp(Some(19.4), "2025-05-31T23:50:00Z"));

        let dashboard = service(repository)
            .get_dashboard("19225", ts("2025-06-01T15:00:00Z"))
            .await;

        assert!(dashboard.hero.is_empty());
    }

    #[tokio::test]
    async fn test_today_card_lists_today_then_prior_days() {
        let repository =
            StubRepository::with_snapshot(snapshot_with_temp(Some(24.0), "2025-06-05T10:00:00Z"))
                .history(
                    55,
                    Rollup::OneDay,
                    vec![
                        reading("2025-05-30T00:00:00Z", 20.0),
                        reading("2025-05-31T00:00:00Z", 21.0),
                        reading("2025-06-01T00:00:00Z", 22.0),
                        reading("2025-06-02T00:00:00Z", 23.0),
                        reading("2025-06-03T00:00:00Z", 24.0),
                        reading("2025-06-04T00:00:00Z", 25.0),
                        reading("2025-06-05T00:00:00Z", 26.0),
                    ],
                )
                .history(
                    55,
                    Rollup::FourHours,
                    vec![
                        reading("2025-06-04T08:00:00Z", 18.0),
                        reading("2025-06-04T16:00:00Z", 27.0),
                    ],
                );

        let dashboard = service(repository)
            .get_dashboard("19225", ts("2025-06-05T12:00:00Z"))
            .await;

        let temp_card = dashboard
            .today_cards
            .iter()
            .find(|c| c.metric == Metric::Temperature)
            .unwrap();

        // Today (live-blended) first, then the four most recent prior days
        assert_eq!(temp_card.days.len(), 5);
        assert!(temp_card.days[0].is_today);
        assert_eq!(temp_card.days[0].extrema.high, Some(24.0));
        let prior: Vec<NaiveDate> = temp_card.days[1..].iter().map(|d| d.date).collect();
        assert_eq!(
            prior,
            vec![
                "2025-06-04".parse().unwrap(),
                "2025-06-03".parse().unwrap(),
                "2025-06-02".parse().unwrap(),
                "2025-06-01".parse().unwrap(),
            ]
        );
        assert_eq!(temp_card.days[1].extrema.high, Some(27.0));
        assert_eq!(temp_card.days[1].extrema.low, Some(18.0));
    }

    #[tokio::test]
    async fn test_history_section_keeps_temperature_days_newest_first() {
        let repository =
            StubRepository::with_snapshot(snapshot_with_temp(Some(28.0), "2025-07-03T10:00:00Z"))
                .history(
                    55,
                    Rollup::OneDay,
                    vec![
                        reading("2025-07-01T00:00:00Z", 26.0),
                        reading("2025-07-02T00:00:00Z", 27.0),
                    ],
                )
                .history(
                    56,
                    Rollup::OneDay,
                    vec![
                        reading("2025-07-01T00:00:00Z", 80.0),
                        // no humidity rollup for July 2nd
                        reading("2025-07-03T00:00:00Z", 55.0),
                    ],
                )
                .history(
                    55,
                    Rollup::FourHours,
                    vec![
                        reading("2025-07-01T04:00:00Z", 24.0),
                        reading("2025-07-01T16:00:00Z", 30.0),
                        reading("2025-07-02T04:00:00Z", 25.0),
                        reading("2025-07-02T16:00:00Z", 31.0),
                    ],
                );

        let dashboard = service(repository)
            .get_dashboard("19225", ts("2025-07-03T12:00:00Z"))
            .await;

        // July 3rd has no temperature rollup, so only two cards
        assert_eq!(dashboard.history.len(), 2);
        assert_eq!(dashboard.history[0].date, "2025-07-02".parse().unwrap());
        assert_eq!(dashboard.history[1].date, "2025-07-01".parse().unwrap());

        let newest = &dashboard.history[0];
        assert_eq!(newest.extrema.high, Some(31.0));
        assert_eq!(newest.extrema.low, Some(25.0));
        assert_eq!(newest.humidity, None);
        assert_eq!(newest.icon, DayIcon::Sunny);
        // Midpoint 28 sits inside the July band 22..31
        assert_eq!(newest.seasonal, SeasonalTag::Within);

        let older = &dashboard.history[1];
        assert_eq!(older.humidity, Some(80.0));
        assert_eq!(older.icon, DayIcon::Rain);
        assert_eq!(older.sun, None);
    }

    #[tokio::test]
    async fn test_pipeline_is_idempotent() {
        let build = || {
            StubRepository::with_snapshot(snapshot_with_temp(Some(24.0), "2025-06-05T10:00:00Z"))
                .history(
                    55,
                    Rollup::OneDay,
                    vec![
                        reading("2025-06-03T00:00:00Z", 24.0),
                        reading("2025-06-04T00:00:00Z", 25.0),
                    ],
                )
                .history(
                    55,
                    Rollup::FourHours,
                    vec![reading("2025-06-04T08:00:00Z", 18.0)],
                )
        };
        let now = ts("2025-06-05T12:00:00Z");

        let first = service(build()).get_dashboard("19225", now).await;
        let second = service(build()).get_dashboard("19225", now).await;

        assert_eq!(first, second);
    }
}
