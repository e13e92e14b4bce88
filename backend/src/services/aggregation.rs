//! Daily aggregation of raw sensor readings
//!
//! Collapses an unordered batch of readings into one record per calendar date. Each
//! field is averaged independently over the readings that carry it, so a node that only
//! reports soil moisture does not drag temperature toward zero.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use shared::{DailySensorRecord, DateRange, SensorReading};

/// Daily records keyed and ordered by date
pub type DailyRecords = BTreeMap<NaiveDate, DailySensorRecord>;

#[derive(Default)]
struct DayAccumulator {
    temperature: Vec<f64>,
    humidity: Vec<f64>,
    soil_moisture: Vec<f64>,
    ph: Vec<f64>,
    reading_count: usize,
}

fn push_finite(values: &mut Vec<f64>, value: Option<f64>) {
    if let Some(v) = value.filter(|v| v.is_finite()) {
        values.push(v);
    }
}

/// Mean of the values, summed in sorted order so the result does not depend on input order
fn mean(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let n = values.len() as f64;
    Some(values.into_iter().sum::<f64>() / n)
}

impl DayAccumulator {
    fn add(&mut self, reading: &SensorReading) {
        push_finite(&mut self.temperature, reading.temperature);
        push_finite(&mut self.humidity, reading.humidity);
        push_finite(&mut self.soil_moisture, reading.soil_moisture);
        push_finite(&mut self.ph, reading.ph);
        self.reading_count += 1;
    }

    fn finish(self, date: NaiveDate) -> DailySensorRecord {
        DailySensorRecord {
            date,
            temperature: mean(self.temperature),
            humidity: mean(self.humidity),
            soil_moisture: mean(self.soil_moisture),
            ph: mean(self.ph),
            reading_count: self.reading_count,
        }
    }
}

/// Aggregate readings by their UTC calendar date
pub fn aggregate_daily<'a, I>(readings: I) -> DailyRecords
where
    I: IntoIterator<Item = &'a SensorReading>,
{
    aggregate_daily_by(readings, SensorReading::date)
}

/// Aggregate readings by a caller-chosen date, e.g. local time at the field
pub fn aggregate_daily_by<'a, I, F>(readings: I, date_of: F) -> DailyRecords
where
    I: IntoIterator<Item = &'a SensorReading>,
    F: Fn(&SensorReading) -> NaiveDate,
{
    let mut days: BTreeMap<NaiveDate, DayAccumulator> = BTreeMap::new();
    for reading in readings {
        days.entry(date_of(reading)).or_default().add(reading);
    }

    days.into_iter()
        .map(|(date, acc)| (date, acc.finish(date)))
        .collect()
}

/// Aggregate only the readings whose UTC date falls inside `range`
pub fn aggregate_daily_in_range<'a, I>(readings: I, range: &DateRange) -> DailyRecords
where
    I: IntoIterator<Item = &'a SensorReading>,
{
    aggregate_daily(
        readings
            .into_iter()
            .filter(|reading| range.contains(reading.date())),
    )
}

/// Number of distinct sensors in a batch
pub fn count_sensors<'a, I>(readings: I) -> usize
where
    I: IntoIterator<Item = &'a SensorReading>,
{
    readings
        .into_iter()
        .map(|r| r.sensor_id.as_str())
        .collect::<std::collections::BTreeSet<_>>()
        .len()
}
