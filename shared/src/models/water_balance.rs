//! Daily water balance models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day of the field water balance
///
/// `net_balance = precipitation + irrigation - etc - runoff - delta_s`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WaterBalanceDay {
    pub date: NaiveDate,
    /// Air temperature used for the day (°C), sensor mean or fallback
    #[serde(with = "crate::serialize_finite")]
    pub temperature: f64,
    /// Relative humidity used for the day (%), sensor mean or fallback
    #[serde(with = "crate::serialize_finite")]
    pub humidity: f64,
    pub soil_moisture: Option<f64>,
    /// Reference evapotranspiration (mm/day)
    #[serde(with = "crate::serialize_finite")]
    pub et0: f64,
    /// Crop evapotranspiration (mm/day)
    #[serde(with = "crate::serialize_finite")]
    pub etc: f64,
    #[serde(with = "crate::serialize_finite")]
    pub precipitation: f64,
    #[serde(with = "crate::serialize_finite")]
    pub irrigation: f64,
    #[serde(with = "crate::serialize_finite")]
    pub runoff: f64,
    /// Change in soil water storage (mm)
    #[serde(with = "crate::serialize_finite")]
    pub delta_s: f64,
    #[serde(with = "crate::serialize_finite")]
    pub net_balance: f64,
    /// Vapour pressure deficit (kPa)
    #[serde(with = "crate::serialize_finite")]
    pub vpd: f64,
    #[serde(with = "crate::serialize_finite")]
    pub vpd_stress_factor: f64,
    #[serde(with = "crate::serialize_finite")]
    pub kc: f64,
}

impl WaterBalanceDay {
    /// How far `net_balance` is from its defining identity; zero up to rounding
    pub fn identity_residual(&self) -> f64 {
        self.precipitation + self.irrigation - self.etc - self.runoff - self.delta_s
            - self.net_balance
    }
}

/// Change in soil storage between two consecutive sensor days
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SoilStorageChange {
    pub date: NaiveDate,
    pub value: f64,
}
