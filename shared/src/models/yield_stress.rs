//! VPD analysis and yield stress models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Coarse VPD band used for display and alerts
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VpdCategory {
    /// Below 0.5 kPa
    Low,
    /// 0.5 to 2.0 kPa
    Optimal,
    /// Above 2.0 kPa
    High,
}

impl VpdCategory {
    /// NaN lands in `High`, matching the else-branch of the threshold ladder
    pub fn from_vpd(vpd_kpa: f64) -> Self {
        if vpd_kpa < 0.5 {
            VpdCategory::Low
        } else if vpd_kpa <= 2.0 {
            VpdCategory::Optimal
        } else {
            VpdCategory::High
        }
    }
}

/// VPD for one day with sensor data
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VpdAnalysisPoint {
    pub date: NaiveDate,
    #[serde(with = "crate::serialize_finite")]
    pub vpd: f64,
    #[serde(with = "crate::serialize_finite")]
    pub stress_factor: f64,
    pub category: VpdCategory,
    #[serde(with = "crate::serialize_finite")]
    pub temperature: f64,
    #[serde(with = "crate::serialize_finite")]
    pub humidity: f64,
}

/// Stress factors and yield impact for one day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct YieldStressDay {
    pub date: NaiveDate,
    #[serde(with = "crate::serialize_finite")]
    pub vpd_stress: f64,
    #[serde(with = "crate::serialize_finite")]
    pub water_stress: f64,
    #[serde(with = "crate::serialize_finite")]
    pub combined_stress: f64,
    /// Percent yield reduction implied by `combined_stress`
    #[serde(with = "crate::serialize_finite")]
    pub yield_impact_percent: f64,
}
