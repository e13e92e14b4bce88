//! Sensor input parsing and water balance export

use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::SensorReading;

use crate::error::{AppError, AppResult};

/// Row layout of the collector CSV export
#[derive(Debug, Deserialize)]
struct SensorCsvRow {
    timestamp: String,
    sensor_id: String,
    soil_moisture: Option<f64>,
    ph: Option<f64>,
    temperature: Option<f64>,
    humidity: Option<f64>,
    #[serde(default)]
    rssi: Option<f64>,
    #[serde(default)]
    snr: Option<f64>,
}

/// RFC 3339, or a naive `YYYY-MM-DD HH:MM:SS` / `YYYY-MM-DDTHH:MM:SS` taken as UTC
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Parse sensor readings from CSV with a header row
pub fn read_sensor_csv<R: Read>(reader: R) -> AppResult<Vec<SensorReading>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut readings = Vec::new();
    for (line, row) in rdr.deserialize::<SensorCsvRow>().enumerate() {
        let row = row?;
        let timestamp = parse_timestamp(&row.timestamp).ok_or_else(|| AppError::Validation {
            field: "timestamp".to_string(),
            // header is line 1
            message: format!("Unparseable timestamp '{}' on line {}", row.timestamp, line + 2),
        })?;
        readings.push(SensorReading {
            timestamp,
            sensor_id: row.sensor_id,
            temperature: row.temperature,
            humidity: row.humidity,
            soil_moisture: row.soil_moisture,
            ph: row.ph,
            rssi: row.rssi,
            snr: row.snr,
        });
    }
    Ok(readings)
}

/// Parse sensor readings from a JSON array
pub fn read_sensor_json<R: Read>(reader: R) -> AppResult<Vec<SensorReading>> {
    Ok(serde_json::from_reader(reader)?)
}

/// Read sensor readings from a file, choosing the format by extension (`.csv` or JSON)
pub fn read_sensor_file(path: &Path) -> AppResult<Vec<SensorReading>> {
    let file = std::io::BufReader::new(std::fs::File::open(path)?);
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    let readings = if is_csv {
        read_sensor_csv(file)?
    } else {
        read_sensor_json(file)?
    };
    tracing::debug!(path = %path.display(), count = readings.len(), "Loaded sensor readings");
    Ok(readings)
}

/// Export rows as CSV text; non-finite floats become empty cells
pub fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for record in data {
        wtr.serialize(record)?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))
}
