//! Satellite time series models

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::physics::PhysicsConstants;

/// One dated value of a satellite product
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SatelliteSeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

impl SatelliteSeriesPoint {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// All satellite products for one location and date window
///
/// Each series is sparse and irregularly dated; any of them may be empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SatelliteData {
    /// Sentinel-2 NDVI
    pub ndvi: Vec<SatelliteSeriesPoint>,
    /// CHIRPS daily rainfall (mm)
    pub rainfall: Vec<SatelliteSeriesPoint>,
    /// MODIS 8-day composite evapotranspiration (mm/day)
    pub et: Vec<SatelliteSeriesPoint>,
    /// MODIS land surface temperature (°C)
    pub lst: Vec<SatelliteSeriesPoint>,
    /// Crop coefficient derived from NDVI
    pub kc: Vec<SatelliteSeriesPoint>,
}

impl SatelliteData {
    pub fn is_empty(&self) -> bool {
        self.ndvi.is_empty()
            && self.rainfall.is_empty()
            && self.et.is_empty()
            && self.lst.is_empty()
            && self.kc.is_empty()
    }

    /// Fill the Kc series from NDVI when the provider did not send one
    pub fn with_derived_kc(mut self, constants: &PhysicsConstants) -> Self {
        if self.kc.is_empty() {
            self.kc = self
                .ndvi
                .iter()
                .map(|p| SatelliteSeriesPoint::new(p.date, constants.kc_from_ndvi(p.value)))
                .collect();
        }
        self
    }

    /// Date-keyed lookup tables for every series
    pub fn index(&self) -> SatelliteIndex {
        SatelliteIndex {
            ndvi: index_series(&self.ndvi),
            rainfall: index_series(&self.rainfall),
            et: index_series(&self.et),
            lst: index_series(&self.lst),
            kc: index_series(&self.kc),
        }
    }
}

/// Satellite series keyed by date
#[derive(Debug, Clone, Default)]
pub struct SatelliteIndex {
    pub ndvi: BTreeMap<NaiveDate, f64>,
    pub rainfall: BTreeMap<NaiveDate, f64>,
    pub et: BTreeMap<NaiveDate, f64>,
    pub lst: BTreeMap<NaiveDate, f64>,
    pub kc: BTreeMap<NaiveDate, f64>,
}

/// Build a date lookup; a later point for the same date replaces an earlier one
pub fn index_series(series: &[SatelliteSeriesPoint]) -> BTreeMap<NaiveDate, f64> {
    series.iter().map(|p| (p.date, p.value)).collect()
}
