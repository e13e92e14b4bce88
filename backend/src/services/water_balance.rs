//! Daily field water balance
//!
//! For every day in the requested window:
//!
//! ```text
//! net = P + I - ETc - R - ΔS
//! ```
//!
//! where `P` is satellite rainfall, `I` irrigation, `ETc = ET0 * Kc`, `R` SCS runoff and
//! `ΔS` the change in sensor soil moisture since the last day that reported it.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use shared::{
    et0, vpd, DateRange, FallbackDefaults, PhysicsConstants, SatelliteIndex, SoilStorageChange,
    WaterBalanceDay,
};

use super::aggregation::DailyRecords;

/// Soil moisture is read in volumetric percent; one percent point maps to one millimetre
/// of storage in the root zone.
const MM_PER_MOISTURE_PERCENT: f64 = 1.0;

/// Water balance calculator for one set of coefficients
#[derive(Debug, Clone, Copy, Default)]
pub struct WaterBalanceModel {
    pub constants: PhysicsConstants,
    pub fallbacks: FallbackDefaults,
}

impl WaterBalanceModel {
    pub fn new(constants: PhysicsConstants, fallbacks: FallbackDefaults) -> Self {
        Self {
            constants,
            fallbacks,
        }
    }

    /// One record per date in `range`, ascending
    ///
    /// `irrigation` holds applied water (mm) by date; days without an entry get none.
    pub fn compute(
        &self,
        range: &DateRange,
        daily: &DailyRecords,
        satellite: &SatelliteIndex,
        irrigation: &BTreeMap<NaiveDate, f64>,
    ) -> Vec<WaterBalanceDay> {
        let fb = &self.fallbacks;

        range
            .days()
            .scan(None::<f64>, |prev_soil_moisture, date| {
                let sensor = daily.get(&date);
                if sensor.is_none() {
                    tracing::debug!(%date, "No sensor data, using default temperature and humidity");
                }

                let temperature = sensor
                    .and_then(|s| s.temperature)
                    .unwrap_or(fb.temperature_c);
                let humidity = sensor.and_then(|s| s.humidity).unwrap_or(fb.humidity_pct);
                let soil_moisture = sensor.and_then(|s| s.soil_moisture);

                let precipitation = satellite.rainfall.get(&date).copied().unwrap_or_else(|| {
                    tracing::debug!(%date, "No rainfall observation, assuming none");
                    fb.precipitation_mm
                });
                let kc = satellite.kc.get(&date).copied().unwrap_or(fb.kc);

                // ET0 comes from the sensor climate, not the satellite ET composite
                let day_vpd = vpd(temperature, humidity);
                let day_et0 = et0(temperature, humidity);
                let etc = day_et0 * kc;

                let delta_s = match (soil_moisture, *prev_soil_moisture) {
                    (Some(current), Some(previous)) => {
                        (current - previous) * MM_PER_MOISTURE_PERCENT
                    }
                    _ => 0.0,
                };
                if soil_moisture.is_some() {
                    *prev_soil_moisture = soil_moisture;
                }

                let runoff = self.constants.runoff(precipitation);
                let irrigation = irrigation.get(&date).copied().unwrap_or(0.0);
                let net_balance = precipitation + irrigation - etc - runoff - delta_s;

                Some(WaterBalanceDay {
                    date,
                    temperature,
                    humidity,
                    soil_moisture,
                    et0: day_et0,
                    etc,
                    precipitation,
                    irrigation,
                    runoff,
                    delta_s,
                    net_balance,
                    vpd: day_vpd,
                    vpd_stress_factor: self.constants.vpd_stress(day_vpd),
                    kc,
                })
            })
            .collect()
    }
}

/// Storage change between consecutive sensor days, zero when either day lacks soil moisture
pub fn soil_storage_changes(daily: &DailyRecords) -> Vec<SoilStorageChange> {
    daily
        .values()
        .zip(daily.values().skip(1))
        .map(|(prev, curr)| {
            let value = match (prev.soil_moisture, curr.soil_moisture) {
                (Some(p), Some(c)) => (c - p) * MM_PER_MOISTURE_PERCENT,
                _ => 0.0,
            };
            SoilStorageChange {
                date: curr.date,
                value,
            }
        })
        .collect()
}
