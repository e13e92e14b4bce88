//! IoT sensor models

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// One raw observation from a field node
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SensorReading {
    pub timestamp: DateTime<Utc>,
    pub sensor_id: String,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(default)]
    pub soil_moisture: Option<f64>,
    #[serde(default)]
    pub ph: Option<f64>,
    /// LoRa link quality, carried through from the collector export
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rssi: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snr: Option<f64>,
}

impl SensorReading {
    /// Calendar date (UTC) the reading belongs to
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

/// Per-day means of the readings for one date
///
/// A field is `None` when no reading that day carried it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailySensorRecord {
    pub date: NaiveDate,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub soil_moisture: Option<f64>,
    pub ph: Option<f64>,
    pub reading_count: usize,
}

impl DailySensorRecord {
    /// A single synthetic reading at noon UTC carrying this day's means
    pub fn to_reading(&self, sensor_id: &str) -> SensorReading {
        SensorReading {
            timestamp: self.date.and_time(NaiveTime::MIN).and_utc() + chrono::Duration::hours(12),
            sensor_id: sensor_id.to_string(),
            temperature: self.temperature,
            humidity: self.humidity,
            soil_moisture: self.soil_moisture,
            ph: self.ph,
            rssi: None,
            snr: None,
        }
    }
}
