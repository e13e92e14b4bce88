//! WebAssembly bindings for the Crop Physics Engine
//!
//! Exposes the pure physics functions to the field dashboard so it can:
//! - Preview VPD, ET0 and crop coefficients while readings are entered
//! - Classify growth stage and VPD band offline
//! - Look up disease yield impact without a round trip

use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::physics::*;
pub use shared::types::*;

fn js_error(message: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&message.to_string())
}

/// Vapour pressure deficit (kPa) from air temperature (°C) and relative humidity (%)
#[wasm_bindgen(js_name = vpd)]
pub fn vpd_kpa(temp_c: f64, rh_pct: f64) -> f64 {
    vpd(temp_c, rh_pct)
}

/// Reference evapotranspiration (mm/day)
#[wasm_bindgen(js_name = et0)]
pub fn et0_mm(temp_c: f64, rh_pct: f64) -> f64 {
    et0(temp_c, rh_pct)
}

#[wasm_bindgen(js_name = kcFromNdvi)]
pub fn crop_coefficient(ndvi: f64) -> f64 {
    kc_from_ndvi(ndvi)
}

/// Growing degree days for one day at the default 10 °C base
#[wasm_bindgen(js_name = gdd)]
pub fn growing_degree_days(t_max: f64, t_min: f64) -> f64 {
    gdd(t_max, t_min, PhysicsConstants::TOBACCO.base_temp_c)
}

#[wasm_bindgen(js_name = runoff)]
pub fn runoff_mm(precip_mm: f64) -> f64 {
    runoff(precip_mm)
}

#[wasm_bindgen(js_name = vpdStressFactor)]
pub fn vpd_stress(vpd_kpa: f64) -> f64 {
    PhysicsConstants::TOBACCO.vpd_stress(vpd_kpa)
}

#[wasm_bindgen(js_name = waterStressFactor)]
pub fn water_stress(net_balance_mm: f64) -> f64 {
    water_stress_factor(net_balance_mm)
}

/// Growth stage label for an accumulated GDD total
#[wasm_bindgen(js_name = growthStage)]
pub fn growth_stage(accumulated_gdd: f64) -> String {
    classify_growth_stage(accumulated_gdd).to_string()
}

/// Leaf area index on the default tobacco curve
#[wasm_bindgen(js_name = leafAreaIndex)]
pub fn leaf_area_index(accumulated_gdd: f64) -> f64 {
    CropGrowthParameters::default().lai(accumulated_gdd)
}

/// VPD band: "low", "optimal" or "high"
#[wasm_bindgen(js_name = vpdCategory)]
pub fn vpd_category(vpd_kpa: f64) -> Result<String, JsValue> {
    match serde_json::to_value(VpdCategory::from_vpd(vpd_kpa)).map_err(js_error)? {
        serde_json::Value::String(label) => Ok(label),
        other => Err(js_error(format!("Unexpected category encoding: {}", other))),
    }
}

/// Fractional yield loss of a disease class at full severity
#[wasm_bindgen(js_name = diseaseYieldImpact)]
pub fn disease_yield_impact(class: &str) -> f64 {
    DiseaseClass::from(class.to_string()).base_yield_impact()
}

/// VPD for paired temperature and humidity arrays
#[wasm_bindgen(js_name = vpdBatch)]
pub fn vpd_series(temp_c: Vec<f64>, rh_pct: Vec<f64>) -> Result<Vec<f64>, JsValue> {
    vpd_batch(&temp_c, &rh_pct).map_err(js_error)
}

#[wasm_bindgen(js_name = et0Batch)]
pub fn et0_series(temp_c: Vec<f64>, rh_pct: Vec<f64>) -> Result<Vec<f64>, JsValue> {
    et0_batch(&temp_c, &rh_pct).map_err(js_error)
}

/// Check a sensor reading JSON document; returns the rejection reason, or nothing when plausible
#[wasm_bindgen(js_name = validateReading)]
pub fn validate_reading_json(reading_json: &str) -> Result<Option<String>, JsValue> {
    let reading: SensorReading = serde_json::from_str(reading_json)
        .map_err(|e| js_error(format!("Invalid reading JSON: {}", e)))?;
    Ok(shared::validation::validate_reading(&reading)
        .err()
        .map(|reason| reason.to_string()))
}
