//! Agronomic physics: coefficients and pure scalar functions
//!
//! Every function here is total over `f64`. NaN inputs produce NaN outputs rather than a
//! default, so "insufficient data" is never mistaken for "no stress". The `*_batch`
//! variants apply the scalar function element-wise over equal-length slices.

use serde::{Deserialize, Serialize};

use crate::validation::InputError;

// ============================================================================
// Constants
// ============================================================================

/// Crop and soil coefficients used by the engine (flue-cured tobacco defaults)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PhysicsConstants {
    /// Base temperature for growing degree days (°C)
    pub base_temp_c: f64,
    /// Lower edge of the optimal VPD band (kPa)
    pub vpd_min_kpa: f64,
    /// Upper edge of the optimal VPD band (kPa)
    pub vpd_max_kpa: f64,
    /// NDVI of bare soil, maps to Kc = 0
    pub ndvi_min: f64,
    /// NDVI of full canopy, maps to Kc = Kc_max
    pub ndvi_max: f64,
    pub kc_max: f64,
    /// SCS curve number for the field
    pub curve_number: f64,
}

impl PhysicsConstants {
    pub const TOBACCO: PhysicsConstants = PhysicsConstants {
        base_temp_c: 10.0,
        vpd_min_kpa: 0.5,
        vpd_max_kpa: 1.5,
        ndvi_min: 0.15,
        ndvi_max: 0.85,
        kc_max: 1.2,
        curve_number: 70.0,
    };

    pub fn kc_from_ndvi(&self, ndvi: f64) -> f64 {
        kc_from_ndvi_with(ndvi, self.ndvi_min, self.ndvi_max, self.kc_max)
    }

    pub fn vpd_stress(&self, vpd_kpa: f64) -> f64 {
        vpd_stress_factor(vpd_kpa, self.vpd_min_kpa, self.vpd_max_kpa)
    }

    pub fn runoff(&self, precip_mm: f64) -> f64 {
        scs_runoff(precip_mm, self.curve_number)
    }
}

impl Default for PhysicsConstants {
    fn default() -> Self {
        Self::TOBACCO
    }
}

/// Logistic canopy-growth parameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CropGrowthParameters {
    pub max_lai: f64,
    /// Logistic steepness per GDD
    pub growth_rate: f64,
    /// Accumulated GDD at which LAI reaches half of `max_lai`
    pub gdd_50: f64,
    /// Half of the assumed diurnal temperature range, used to estimate daily min/max (°C)
    pub diurnal_half_range_c: f64,
    /// Kc of a bare canopy when NDVI is unavailable
    pub kc_bare: f64,
    /// Kc added at full canopy when NDVI is unavailable
    pub kc_canopy_span: f64,
}

impl Default for CropGrowthParameters {
    fn default() -> Self {
        Self {
            max_lai: 5.0,
            growth_rate: 0.02,
            gdd_50: 800.0,
            diurnal_half_range_c: 5.0,
            kc_bare: 0.3,
            kc_canopy_span: 0.7,
        }
    }
}

impl CropGrowthParameters {
    /// LAI from accumulated GDD on the logistic curve
    pub fn lai(&self, accumulated_gdd: f64) -> f64 {
        logistic_lai(accumulated_gdd, self.max_lai, self.growth_rate, self.gdd_50)
    }

    /// Kc proxy from canopy cover when no NDVI observation exists
    pub fn kc_from_lai(&self, lai: f64) -> f64 {
        self.kc_bare + self.kc_canopy_span * (lai / self.max_lai)
    }
}

/// Values substituted for missing sensor or satellite observations
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FallbackDefaults {
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub precipitation_mm: f64,
    pub kc: f64,
    /// VPD stress assumed for a day without a VPD analysis point
    pub vpd_stress: f64,
}

impl Default for FallbackDefaults {
    fn default() -> Self {
        Self {
            temperature_c: 25.0,
            humidity_pct: 60.0,
            precipitation_mm: 0.0,
            kc: 0.8,
            vpd_stress: 1.0,
        }
    }
}

// Simplified ET0: Hargreaves temperature term with a fixed radiation equivalent plus an
// aerodynamic VPD term. No wind or measured radiation inputs.
const HARGREAVES_COEF: f64 = 0.0023;
const HARGREAVES_TEMP_OFFSET_C: f64 = 17.8;
const EXTRATERRESTRIAL_RADIATION_MM: f64 = 15.0;
const DIURNAL_RANGE_C: f64 = 10.0;
const AERODYNAMIC_COEF_MM_PER_KPA: f64 = 0.75;

// ============================================================================
// Scalar Functions
// ============================================================================

/// `max(value, floor)` that lets NaN through instead of returning `floor`
fn floor_at(value: f64, floor: f64) -> f64 {
    if value < floor {
        floor
    } else {
        value
    }
}

/// Saturation vapour pressure (kPa), Tetens form
pub fn saturation_vapor_pressure(temp_c: f64) -> f64 {
    0.6108 * (17.27 * temp_c / (temp_c + 237.3)).exp()
}

/// Vapour pressure deficit (kPa)
pub fn vpd(temp_c: f64, rh_pct: f64) -> f64 {
    let es = saturation_vapor_pressure(temp_c);
    // exact pole of the Tetens denominator
    if temp_c == -237.3 {
        return f64::NAN;
    }
    es * (1.0 - rh_pct / 100.0)
}

/// Simplified reference evapotranspiration (mm/day)
pub fn et0(temp_c: f64, rh_pct: f64) -> f64 {
    let radiative = HARGREAVES_COEF
        * EXTRATERRESTRIAL_RADIATION_MM
        * (temp_c + HARGREAVES_TEMP_OFFSET_C)
        * DIURNAL_RANGE_C.sqrt();
    let aerodynamic = AERODYNAMIC_COEF_MM_PER_KPA * vpd(temp_c, rh_pct);
    floor_at(radiative + aerodynamic, 0.0)
}

/// Crop coefficient from NDVI with the default tobacco bounds
pub fn kc_from_ndvi(ndvi: f64) -> f64 {
    PhysicsConstants::TOBACCO.kc_from_ndvi(ndvi)
}

/// Linear NDVI→Kc interpolation clamped to `[0, kc_max]`
pub fn kc_from_ndvi_with(ndvi: f64, ndvi_min: f64, ndvi_max: f64, kc_max: f64) -> f64 {
    let kc = kc_max * (ndvi - ndvi_min) / (ndvi_max - ndvi_min);
    if kc.is_nan() {
        return kc;
    }
    kc.max(0.0).min(kc_max)
}

/// Growing degree days for one day; never negative
pub fn gdd(t_max: f64, t_min: f64, t_base: f64) -> f64 {
    floor_at((t_max + t_min) / 2.0 - t_base, 0.0)
}

/// SCS curve-number runoff (mm) with the default curve number of 70
pub fn runoff(precip_mm: f64) -> f64 {
    scs_runoff(precip_mm, PhysicsConstants::TOBACCO.curve_number)
}

/// SCS curve-number runoff (mm). Always within `[0, precip_mm]`.
pub fn scs_runoff(precip_mm: f64, curve_number: f64) -> f64 {
    if precip_mm.is_nan() {
        return precip_mm;
    }
    if precip_mm <= 0.0 || !(curve_number > 0.0) {
        return 0.0;
    }
    let cn = curve_number.min(100.0);
    let s = 25400.0 / cn - 254.0;
    let ia = 0.2 * s;
    if precip_mm <= ia {
        return 0.0;
    }
    let denom = precip_mm + 0.8 * s;
    if denom <= 0.0 {
        return 0.0;
    }
    ((precip_mm - ia).powi(2) / denom).clamp(0.0, precip_mm)
}

/// Leaf area index on a logistic curve of accumulated GDD
pub fn logistic_lai(accumulated_gdd: f64, max_lai: f64, growth_rate: f64, gdd_50: f64) -> f64 {
    max_lai / (1.0 + (-growth_rate * (accumulated_gdd - gdd_50)).exp())
}

/// VPD stress factor in `[0.1, 1.0]`; 1.0 means no stress
pub fn vpd_stress_factor(vpd_kpa: f64, vpd_min: f64, vpd_max: f64) -> f64 {
    if vpd_kpa.is_nan() {
        return vpd_kpa;
    }
    if vpd_kpa < vpd_min {
        // negative VPD only occurs for supersaturated readings
        0.9 + 0.1 * (vpd_kpa.max(0.0) / vpd_min)
    } else if vpd_kpa <= vpd_max {
        1.0
    } else {
        (-0.5 * (vpd_kpa - vpd_max)).exp().max(0.1)
    }
}

/// Water stress factor from the day's net balance (mm), in `[0.5, 1.0]`
pub fn water_stress_factor(net_balance_mm: f64) -> f64 {
    if net_balance_mm.is_nan() {
        return net_balance_mm;
    }
    if net_balance_mm < -10.0 {
        (1.0 + net_balance_mm / 50.0).max(0.5)
    } else if net_balance_mm > 20.0 {
        (1.0 - (net_balance_mm - 20.0) / 100.0).max(0.7)
    } else {
        1.0
    }
}

// ============================================================================
// Batch Functions
// ============================================================================

fn zip_map(a: &[f64], b: &[f64], f: impl Fn(f64, f64) -> f64) -> Result<Vec<f64>, InputError> {
    if a.len() != b.len() {
        return Err(InputError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    Ok(a.iter().zip(b).map(|(x, y)| f(*x, *y)).collect())
}

pub fn vpd_batch(temp_c: &[f64], rh_pct: &[f64]) -> Result<Vec<f64>, InputError> {
    zip_map(temp_c, rh_pct, vpd)
}

pub fn et0_batch(temp_c: &[f64], rh_pct: &[f64]) -> Result<Vec<f64>, InputError> {
    zip_map(temp_c, rh_pct, et0)
}

pub fn gdd_batch(t_max: &[f64], t_min: &[f64], t_base: f64) -> Result<Vec<f64>, InputError> {
    zip_map(t_max, t_min, |hi, lo| gdd(hi, lo, t_base))
}

pub fn kc_from_ndvi_batch(ndvi: &[f64]) -> Vec<f64> {
    ndvi.iter().map(|v| kc_from_ndvi(*v)).collect()
}

pub fn runoff_batch(precip_mm: &[f64], curve_number: f64) -> Vec<f64> {
    precip_mm
        .iter()
        .map(|p| scs_runoff(*p, curve_number))
        .collect()
}
