//! Summary statistics and agronomic recommendations

use shared::{
    CropGrowthDay, GrowthStage, PhysicsSummary, VpdAnalysisPoint, WaterBalanceDay, YieldStressDay,
};

/// Net balance below which a day counts as a deficit day (mm)
pub const DEFICIT_DAY_THRESHOLD_MM: f64 = -5.0;
/// Net balance above which a day counts as an excess day (mm)
pub const EXCESS_DAY_THRESHOLD_MM: f64 = 10.0;

const TOTAL_DEFICIT_ALERT_MM: f64 = -20.0;
const TOTAL_EXCESS_ALERT_MM: f64 = 30.0;
const HIGH_VPD_ALERT_KPA: f64 = 2.0;
const LOW_VPD_ALERT_KPA: f64 = 0.5;
const DEFICIT_DAYS_ALERT: usize = 7;

pub const OPTIMAL_CONDITIONS_MESSAGE: &str =
    "Water balance appears optimal. Continue current management practices.";

fn finite(values: impl Iterator<Item = f64>) -> Vec<f64> {
    values.filter(|v| v.is_finite()).collect()
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Reduce the daily series to scalar statistics
///
/// Every total and mean skips days whose value is not finite, so one day without usable
/// climate data does not blank out the window.
pub fn summarize(
    water_balance: &[WaterBalanceDay],
    crop_growth: &[CropGrowthDay],
    vpd_analysis: &[VpdAnalysisPoint],
    yield_stress: &[YieldStressDay],
) -> PhysicsSummary {
    let balances = finite(water_balance.iter().map(|d| d.net_balance));
    let precipitation = finite(water_balance.iter().map(|d| d.precipitation));
    let et = finite(water_balance.iter().map(|d| d.etc));
    let vpd_values = finite(vpd_analysis.iter().map(|p| p.vpd));
    let impacts = finite(yield_stress.iter().map(|d| d.yield_impact_percent));
    let latest = crop_growth.last();

    PhysicsSummary {
        total_water_balance: balances.iter().sum(),
        average_water_balance: mean(&balances),
        total_precipitation: precipitation.iter().sum(),
        total_et: et.iter().sum(),
        average_vpd: mean(&vpd_values),
        max_vpd: vpd_values.iter().copied().fold(None, |acc: Option<f64>, v| {
            Some(acc.map_or(v, |a| a.max(v)))
        })
        .unwrap_or(0.0),
        vpd_days: vpd_values.len(),
        water_deficit_days: balances
            .iter()
            .filter(|b| **b < DEFICIT_DAY_THRESHOLD_MM)
            .count(),
        water_excess_days: balances
            .iter()
            .filter(|b| **b > EXCESS_DAY_THRESHOLD_MM)
            .count(),
        current_growth_stage: latest.map(|g| g.growth_stage),
        accumulated_gdd: latest.map_or(0.0, |g| g.accumulated_gdd),
        current_lai: latest.map_or(0.0, |g| g.lai),
        average_yield_impact_percent: mean(&impacts),
    }
}

/// Rule-based advice, evaluated in a fixed order; every matching rule contributes
pub fn generate_recommendations(summary: &PhysicsSummary) -> Vec<String> {
    let mut recommendations = Vec::new();

    let total = summary.total_water_balance;
    if total < TOTAL_DEFICIT_ALERT_MM {
        recommendations.push(format!(
            "Significant water deficit detected ({:.1}mm). Consider increasing irrigation frequency.",
            total
        ));
    } else if total > TOTAL_EXCESS_ALERT_MM {
        recommendations.push(format!(
            "Water excess detected ({:.1}mm). Reduce irrigation to prevent waterlogging and disease.",
            total
        ));
    }

    // the VPD rules need at least one finite VPD day
    let has_vpd = summary.vpd_days > 0;
    let avg_vpd = summary.average_vpd;
    if has_vpd && avg_vpd > HIGH_VPD_ALERT_KPA {
        recommendations.push(format!(
            "High VPD stress (avg {:.2} kPa). Consider irrigation during peak heat hours to reduce plant stress.",
            avg_vpd
        ));
    } else if has_vpd && avg_vpd < LOW_VPD_ALERT_KPA {
        recommendations.push(format!(
            "Low VPD conditions (avg {:.2} kPa). Monitor for fungal diseases and improve ventilation if possible.",
            avg_vpd
        ));
    }

    match summary.current_growth_stage {
        Some(GrowthStage::RapidGrowth) => recommendations.push(
            "Crop is in rapid growth phase. Ensure adequate water and nutrient supply for optimal yield."
                .to_string(),
        ),
        Some(GrowthStage::Maturation) => recommendations.push(
            "Crop is maturing. Gradually reduce irrigation to improve leaf quality.".to_string(),
        ),
        _ => {}
    }

    if summary.water_deficit_days > DEFICIT_DAYS_ALERT {
        recommendations.push(format!(
            "Water deficit detected on {} days. Review irrigation scheduling to prevent yield loss.",
            summary.water_deficit_days
        ));
    }

    if recommendations.is_empty() {
        recommendations.push(OPTIMAL_CONDITIONS_MESSAGE.to_string());
    }

    recommendations
}
