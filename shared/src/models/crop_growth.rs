//! Crop growth models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day of the crop growth series
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CropGrowthDay {
    pub date: NaiveDate,
    #[serde(with = "crate::serialize_finite")]
    pub gdd: f64,
    #[serde(with = "crate::serialize_finite")]
    pub accumulated_gdd: f64,
    /// Leaf area index
    #[serde(with = "crate::serialize_finite")]
    pub lai: f64,
    #[serde(with = "crate::serialize_finite")]
    pub kc: f64,
    pub growth_stage: GrowthStage,
}

/// Tobacco phenological stage
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum GrowthStage {
    /// < 200 GDD
    #[serde(rename = "Transplant/Establishment")]
    TransplantEstablishment,
    /// 200-500 GDD
    #[serde(rename = "Vegetative Growth")]
    VegetativeGrowth,
    /// 500-900 GDD
    #[serde(rename = "Rapid Growth")]
    RapidGrowth,
    /// 900-1200 GDD
    #[serde(rename = "Topping/Flowering")]
    ToppingFlowering,
    /// 1200-1500 GDD
    #[serde(rename = "Maturation")]
    Maturation,
    /// 1500+ GDD
    #[serde(rename = "Harvest Ready")]
    HarvestReady,
}

impl GrowthStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            GrowthStage::TransplantEstablishment => "Transplant/Establishment",
            GrowthStage::VegetativeGrowth => "Vegetative Growth",
            GrowthStage::RapidGrowth => "Rapid Growth",
            GrowthStage::ToppingFlowering => "Topping/Flowering",
            GrowthStage::Maturation => "Maturation",
            GrowthStage::HarvestReady => "Harvest Ready",
        }
    }
}

impl std::fmt::Display for GrowthStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify growth stage from accumulated GDD; each threshold belongs to the later stage
pub fn classify_growth_stage(accumulated_gdd: f64) -> GrowthStage {
    match accumulated_gdd {
        g if g < 200.0 => GrowthStage::TransplantEstablishment,
        g if g < 500.0 => GrowthStage::VegetativeGrowth,
        g if g < 900.0 => GrowthStage::RapidGrowth,
        g if g < 1200.0 => GrowthStage::ToppingFlowering,
        g if g < 1500.0 => GrowthStage::Maturation,
        _ => GrowthStage::HarvestReady,
    }
}
