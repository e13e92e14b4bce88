//! Aggregate engine output

use serde::{Deserialize, Serialize};

use super::{
    CropGrowthDay, DiseaseAssessment, GrowthStage, SatelliteSeriesPoint, SoilStorageChange,
    VpdAnalysisPoint, WaterBalanceDay, YieldStressDay,
};
use crate::types::{DateRange, GpsCoordinates};

/// Scalar statistics over the daily series
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PhysicsSummary {
    #[serde(with = "crate::serialize_finite")]
    pub total_water_balance: f64,
    #[serde(with = "crate::serialize_finite")]
    pub average_water_balance: f64,
    #[serde(with = "crate::serialize_finite")]
    pub total_precipitation: f64,
    #[serde(rename = "totalET", with = "crate::serialize_finite")]
    pub total_et: f64,
    #[serde(rename = "averageVPD", with = "crate::serialize_finite")]
    pub average_vpd: f64,
    #[serde(rename = "maxVPD", with = "crate::serialize_finite")]
    pub max_vpd: f64,
    /// Sensor days with a finite VPD behind `averageVPD` and `maxVPD`
    pub vpd_days: usize,
    pub water_deficit_days: usize,
    pub water_excess_days: usize,
    pub current_growth_stage: Option<GrowthStage>,
    #[serde(rename = "accumulatedGDD", with = "crate::serialize_finite")]
    pub accumulated_gdd: f64,
    #[serde(rename = "currentLAI", with = "crate::serialize_finite")]
    pub current_lai: f64,
    #[serde(with = "crate::serialize_finite")]
    pub average_yield_impact_percent: f64,
}

/// Expected yield after physics stress and disease
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct YieldOutlook {
    /// Yield fraction retained under the mean physics stress
    #[serde(with = "crate::serialize_finite")]
    pub physics_factor: f64,
    /// Yield fraction retained after disease losses
    pub disease_factor: f64,
    #[serde(with = "crate::serialize_finite")]
    pub total_yield_reduction_percent: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_yield_kg_per_ha: Option<f64>,
}

/// The input series echoed back next to the computed ones
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeriesEcho {
    pub ndvi: Vec<SatelliteSeriesPoint>,
    pub rainfall: Vec<SatelliteSeriesPoint>,
    pub et: Vec<SatelliteSeriesPoint>,
    pub lst: Vec<SatelliteSeriesPoint>,
    pub kc: Vec<SatelliteSeriesPoint>,
    pub delta_s: Vec<SoilStorageChange>,
}

/// Counts of the inputs that fed a run
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DataSources {
    pub sensors: usize,
    pub sensor_days: usize,
    pub satellite: bool,
    pub disease_detections: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResultMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<GpsCoordinates>,
    pub date_range: DateRange,
    pub data_sources: DataSources,
}

/// Everything one engine run produces
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PhysicsResult {
    pub water_balance: Vec<WaterBalanceDay>,
    pub crop_growth: Vec<CropGrowthDay>,
    pub vpd_analysis: Vec<VpdAnalysisPoint>,
    pub yield_stress: Vec<YieldStressDay>,
    pub summary: PhysicsSummary,
    pub recommendations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disease: Option<DiseaseAssessment>,
    pub yield_outlook: YieldOutlook,
    pub data: SeriesEcho,
    pub metadata: ResultMetadata,
}
