//! Validation utilities for engine inputs
//!
//! Date parsing failures are fatal for a run; range checks on individual readings
//! are advisory and return a static reason string.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::SensorReading;

/// Errors raised while validating engine input
#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("invalid {field} date '{value}', expected YYYY-MM-DD")]
    InvalidDate { field: String, value: String },

    #[error("end date {end} is before start date {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },

    #[error("series length mismatch: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },
}

// ============================================================================
// Date Validations
// ============================================================================

/// Parse an ISO `YYYY-MM-DD` calendar date
pub fn parse_iso_date(field: &str, value: &str) -> Result<NaiveDate, InputError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| InputError::InvalidDate {
        field: field.to_string(),
        value: value.to_string(),
    })
}

// ============================================================================
// Sensor Validations
// ============================================================================

/// Validate that a reading carries a usable sensor identifier
pub fn validate_sensor_id(sensor_id: &str) -> Result<(), &'static str> {
    if sensor_id.trim().is_empty() {
        return Err("Sensor ID cannot be empty");
    }
    Ok(())
}

/// Validate relative humidity is a percentage
pub fn validate_humidity(humidity: f64) -> Result<(), &'static str> {
    if !(0.0..=100.0).contains(&humidity) {
        return Err("Humidity must be between 0 and 100%");
    }
    Ok(())
}

/// Validate volumetric soil moisture is a percentage
pub fn validate_soil_moisture(moisture: f64) -> Result<(), &'static str> {
    if !(0.0..=100.0).contains(&moisture) {
        return Err("Soil moisture must be between 0 and 100%");
    }
    Ok(())
}

/// Validate soil pH is on the 0-14 scale
pub fn validate_ph(ph: f64) -> Result<(), &'static str> {
    if !(0.0..=14.0).contains(&ph) {
        return Err("pH must be between 0 and 14");
    }
    Ok(())
}

/// Validate air temperature is physically plausible for field sensors
pub fn validate_temperature(temperature: f64) -> Result<(), &'static str> {
    if !(-60.0..=70.0).contains(&temperature) {
        return Err("Temperature outside plausible field range");
    }
    Ok(())
}

/// Run every field check on a reading
pub fn validate_reading(reading: &SensorReading) -> Result<(), &'static str> {
    validate_sensor_id(&reading.sensor_id)?;
    if let Some(t) = reading.temperature {
        validate_temperature(t)?;
    }
    if let Some(h) = reading.humidity {
        validate_humidity(h)?;
    }
    if let Some(m) = reading.soil_moisture {
        validate_soil_moisture(m)?;
    }
    if let Some(ph) = reading.ph {
        validate_ph(ph)?;
    }
    Ok(())
}

// ============================================================================
// Location and Parameter Validations
// ============================================================================

/// Validate WGS84 coordinates
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), &'static str> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err("Latitude must be between -90 and 90");
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err("Longitude must be between -180 and 180");
    }
    Ok(())
}

/// Validate an SCS curve number
pub fn validate_curve_number(cn: f64) -> Result<(), &'static str> {
    if !(cn > 0.0 && cn <= 100.0) {
        return Err("Curve number must be in (0, 100]");
    }
    Ok(())
}

/// Validate NDVI interpolation bounds
pub fn validate_ndvi_bounds(ndvi_min: f64, ndvi_max: f64) -> Result<(), &'static str> {
    if ndvi_max <= ndvi_min {
        return Err("NDVI max must be greater than NDVI min");
    }
    Ok(())
}

/// Validate the optimal VPD band
pub fn validate_vpd_band(vpd_min: f64, vpd_max: f64) -> Result<(), &'static str> {
    if vpd_min <= 0.0 {
        return Err("Minimum optimal VPD must be positive");
    }
    if vpd_max < vpd_min {
        return Err("Maximum optimal VPD must not be below the minimum");
    }
    Ok(())
}

/// Validate an attainable yield (kg/ha)
pub fn validate_base_yield(kg_per_ha: f64) -> Result<(), &'static str> {
    if !(kg_per_ha >= 0.0 && kg_per_ha.is_finite()) {
        return Err("Base yield must be zero or positive");
    }
    Ok(())
}
