//! Common types used across the engine

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::validation::{parse_iso_date, InputError};

/// GPS coordinates of a field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GpsCoordinates {
    pub latitude: Decimal,
    pub longitude: Decimal,
}

impl GpsCoordinates {
    pub fn new(latitude: Decimal, longitude: Decimal) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Build from floating point degrees, as received from query strings or CLI flags
    pub fn from_degrees(latitude: f64, longitude: f64) -> Option<Self> {
        Some(Self {
            latitude: Decimal::from_f64_retain(latitude)?,
            longitude: Decimal::from_f64_retain(longitude)?,
        })
    }
}

/// Inclusive range of calendar days
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "RawDateRange")]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Wire form of `DateRange`, checked through `DateRange::new` on deserialization
#[derive(Deserialize)]
struct RawDateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<RawDateRange> for DateRange {
    type Error = InputError;

    fn try_from(raw: RawDateRange) -> Result<Self, Self::Error> {
        DateRange::new(raw.start, raw.end)
    }
}

impl DateRange {
    /// Create a range, rejecting `end < start`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, InputError> {
        if end < start {
            return Err(InputError::EndBeforeStart { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parse a range from two `YYYY-MM-DD` strings
    pub fn parse(start: &str, end: &str) -> Result<Self, InputError> {
        let start = parse_iso_date("start", start)?;
        let end = parse_iso_date("end", end)?;
        Self::new(start, end)
    }

    /// Number of days in the range, both ends included
    pub fn len_days(&self) -> usize {
        usize::try_from((self.end - self.start).num_days() + 1).unwrap_or(0)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Every calendar day from start to end, ascending
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        std::iter::successors(Some(self.start), |d| d.checked_add_days(Days::new(1)))
            .take_while(move |d| *d <= end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_range_days_inclusive() {
        let range = DateRange::parse("2024-02-27", "2024-03-01").unwrap();
        let days: Vec<String> = range.days().map(|d| d.to_string()).collect();
        assert_eq!(
            days,
            vec!["2024-02-27", "2024-02-28", "2024-02-29", "2024-03-01"]
        );
        assert_eq!(range.len_days(), 4);
    }

    #[test]
    fn test_date_range_single_day() {
        let range = DateRange::parse("2024-01-01", "2024-01-01").unwrap();
        assert_eq!(range.days().count(), 1);
    }

    #[test]
    fn test_date_range_rejects_reversed() {
        assert!(matches!(
            DateRange::parse("2024-01-05", "2024-01-01"),
            Err(InputError::EndBeforeStart { .. })
        ));
    }

    #[test]
    fn test_date_range_rejects_malformed() {
        assert!(matches!(
            DateRange::parse("2024-13-01", "2024-12-01"),
            Err(InputError::InvalidDate { .. })
        ));
        assert!(DateRange::parse("yesterday", "2024-12-01").is_err());
    }

    #[test]
    fn test_date_range_deserialize_checks_order() {
        let range: DateRange =
            serde_json::from_str(r#"{"start":"2024-01-01","end":"2024-01-05"}"#).unwrap();
        assert_eq!(range.len_days(), 5);

        let reversed = serde_json::from_str::<DateRange>(r#"{"start":"2024-01-05","end":"2024-01-01"}"#);
        assert!(reversed.is_err());
    }

    #[test]
    fn test_len_days_never_wraps() {
        let range = DateRange {
            start: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        };
        assert_eq!(range.len_days(), 0);
        assert_eq!(range.days().count(), 0);
    }

    #[test]
    fn test_gps_from_degrees() {
        let gps = GpsCoordinates::from_degrees(-18.30252535, 31.56415345).unwrap();
        assert!(gps.latitude < Decimal::ZERO);
        assert!(GpsCoordinates::from_degrees(f64::NAN, 0.0).is_none());
    }
}
