//! Daily aggregation tests
//!
//! - Idempotence: aggregating the aggregate changes nothing
//! - Order independence
//! - One record per date, absent dates stay absent

use chrono::{Duration, FixedOffset, NaiveDate, TimeZone, Utc};
use crop_physics::services::{aggregate_daily, aggregate_daily_by};
use proptest::prelude::*;
use shared::{DailySensorRecord, SensorReading};

fn reading_strategy() -> impl Strategy<Value = SensorReading> {
    (
        0i64..(14 * 24),
        prop::option::of(-5.0f64..45.0),
        prop::option::of(0.0f64..=100.0),
        prop::option::of(0.0f64..=60.0),
        prop::option::of(4.0f64..9.0),
    )
        .prop_map(|(hours, temperature, humidity, soil, ph)| SensorReading {
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap() + Duration::hours(hours),
            sensor_id: "node-a".to_string(),
            temperature,
            humidity,
            soil_moisture: soil,
            ph,
            rssi: None,
            snr: None,
        })
}

fn means(record: &DailySensorRecord) -> [Option<f64>; 4] {
    [
        record.temperature,
        record.humidity,
        record.soil_moisture,
        record.ph,
    ]
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert!(aggregate_daily(&Vec::<SensorReading>::new()).is_empty());
    }

    #[test]
    fn test_day_with_only_null_fields_still_present() {
        let reading = SensorReading {
            timestamp: Utc.with_ymd_and_hms(2024, 5, 3, 10, 0, 0).unwrap(),
            sensor_id: "node-a".to_string(),
            temperature: None,
            humidity: None,
            soil_moisture: None,
            ph: None,
            rssi: Some(-110.0),
            snr: None,
        };
        let daily = aggregate_daily(&[reading]);
        let record = &daily[&NaiveDate::from_ymd_opt(2024, 5, 3).unwrap()];
        assert_eq!(means(record), [None, None, None, None]);
        assert_eq!(record.reading_count, 1);
    }

    /// A caller-supplied date function shifts late-evening UTC readings to the next local day
    #[test]
    fn test_local_date_function() {
        let reading = SensorReading {
            timestamp: Utc.with_ymd_and_hms(2024, 5, 3, 23, 0, 0).unwrap(),
            sensor_id: "node-a".to_string(),
            temperature: Some(19.0),
            humidity: None,
            soil_moisture: None,
            ph: None,
            rssi: None,
            snr: None,
        };
        let harare = FixedOffset::east_opt(2 * 3600).unwrap();
        let daily = aggregate_daily_by(&[reading], |r| r.timestamp.with_timezone(&harare).date_naive());
        assert!(daily.contains_key(&NaiveDate::from_ymd_opt(2024, 5, 4).unwrap()));
    }
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(150))]

    /// Property: re-aggregating one synthetic reading per day reproduces the daily means
    #[test]
    fn prop_aggregation_idempotent(readings in prop::collection::vec(reading_strategy(), 0..60)) {
        let first = aggregate_daily(&readings);
        let synthetic: Vec<SensorReading> = first.values().map(|r| r.to_reading("node-a")).collect();
        let second = aggregate_daily(&synthetic);

        prop_assert_eq!(first.len(), second.len());
        for (date, record) in &first {
            let again = &second[date];
            prop_assert_eq!(means(record), means(again));
        }
    }

    /// Property: input order does not change any daily mean
    #[test]
    fn prop_aggregation_order_independent(readings in prop::collection::vec(reading_strategy(), 0..60)) {
        let mut reversed = readings.clone();
        reversed.reverse();
        prop_assert_eq!(aggregate_daily(&readings), aggregate_daily(&reversed));
    }

    /// Property: one record per distinct reading date and nothing else
    #[test]
    fn prop_one_record_per_date(readings in prop::collection::vec(reading_strategy(), 0..60)) {
        let daily = aggregate_daily(&readings);
        let dates: std::collections::BTreeSet<NaiveDate> = readings.iter().map(|r| r.date()).collect();
        prop_assert_eq!(daily.keys().copied().collect::<Vec<_>>(), dates.into_iter().collect::<Vec<_>>());
        let total: usize = daily.values().map(|r| r.reading_count).sum();
        prop_assert_eq!(total, readings.len());
    }
}
