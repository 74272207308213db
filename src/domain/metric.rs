// Tracked metrics and their SmartCitizen sensor ids
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Metric {
    Temperature,
    Humidity,
    Pm25,
    Noise,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Temperature,
        Metric::Humidity,
        Metric::Pm25,
        Metric::Noise,
    ];

    /// Sensor id on the SmartCitizen platform.
    pub fn sensor_id(self) -> u32 {
        match self {
            Metric::Temperature => 55,
            Metric::Humidity => 56,
            Metric::Pm25 => 194,
            Metric::Noise => 53,
        }
    }

    pub fn from_sensor_id(id: u32) -> Option<Metric> {
        Metric::ALL.into_iter().find(|m| m.sensor_id() == id)
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::Temperature => "Temperature",
            Metric::Humidity => "Humidity",
            Metric::Pm25 => "PM2.5",
            Metric::Noise => "Noise",
        }
    }
}
