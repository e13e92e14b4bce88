//! VPD analysis and combined yield stress

use std::collections::BTreeMap;

use chrono::NaiveDate;
use shared::{
    vpd, water_stress_factor, DateRange, FallbackDefaults, PhysicsConstants, SatelliteIndex,
    VpdAnalysisPoint, VpdCategory, WaterBalanceDay, YieldStressDay,
};

use super::aggregation::DailyRecords;

#[derive(Debug, Clone, Copy, Default)]
pub struct YieldStressModel {
    pub constants: PhysicsConstants,
    pub fallbacks: FallbackDefaults,
}

impl YieldStressModel {
    pub fn new(constants: PhysicsConstants, fallbacks: FallbackDefaults) -> Self {
        Self {
            constants,
            fallbacks,
        }
    }

    /// VPD for every sensor day in `range`
    ///
    /// A day without air temperature falls back to the satellite land surface temperature
    /// for that date, then to the default.
    pub fn vpd_analysis(
        &self,
        range: &DateRange,
        daily: &DailyRecords,
        satellite: &SatelliteIndex,
    ) -> Vec<VpdAnalysisPoint> {
        daily
            .range(range.start..=range.end)
            .map(|(date, record)| {
                let temperature = record
                    .temperature
                    .or_else(|| satellite.lst.get(date).copied())
                    .unwrap_or(self.fallbacks.temperature_c);
                let humidity = record.humidity.unwrap_or(self.fallbacks.humidity_pct);
                let day_vpd = vpd(temperature, humidity);

                VpdAnalysisPoint {
                    date: *date,
                    vpd: day_vpd,
                    stress_factor: self.constants.vpd_stress(day_vpd),
                    category: VpdCategory::from_vpd(day_vpd),
                    temperature,
                    humidity,
                }
            })
            .collect()
    }

    /// Stress for every water balance day, joined to the VPD analysis by date
    pub fn yield_stress(
        &self,
        water_balance: &[WaterBalanceDay],
        vpd_analysis: &[VpdAnalysisPoint],
    ) -> Vec<YieldStressDay> {
        let vpd_by_date: BTreeMap<NaiveDate, f64> = vpd_analysis
            .iter()
            .map(|p| (p.date, p.stress_factor))
            .collect();

        water_balance
            .iter()
            .map(|day| {
                let vpd_stress = vpd_by_date
                    .get(&day.date)
                    .copied()
                    .unwrap_or(self.fallbacks.vpd_stress);
                let water_stress = water_stress_factor(day.net_balance);
                let combined_stress = vpd_stress * water_stress;

                YieldStressDay {
                    date: day.date,
                    vpd_stress,
                    water_stress,
                    combined_stress,
                    yield_impact_percent: (1.0 - combined_stress) * 100.0,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::DailySensorRecord;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, d).unwrap()
    }

    fn record(d: u32, temperature: Option<f64>, humidity: Option<f64>) -> DailySensorRecord {
        DailySensorRecord {
            date: day(d),
            temperature,
            humidity,
            soil_moisture: None,
            ph: None,
            reading_count: 1,
        }
    }

    #[test]
    fn test_vpd_analysis_uses_lst_fallback() {
        let daily = DailyRecords::from([(day(3), record(3, None, Some(40.0)))]);
        let mut satellite = SatelliteIndex::default();
        satellite.lst.insert(day(3), 35.0);
        let range = DateRange::new(day(1), day(5)).unwrap();

        let points = YieldStressModel::default().vpd_analysis(&range, &daily, &satellite);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].temperature, 35.0);
        assert!((points[0].vpd - vpd(35.0, 40.0)).abs() < 1e-12);
        assert_eq!(points[0].category, VpdCategory::High);
    }

    #[test]
    fn test_vpd_analysis_limited_to_range() {
        let daily = DailyRecords::from([
            (day(1), record(1, Some(20.0), Some(90.0))),
            (day(9), record(9, Some(20.0), Some(90.0))),
        ]);
        let range = DateRange::new(day(1), day(5)).unwrap();
        let points = YieldStressModel::default().vpd_analysis(&range, &daily, &SatelliteIndex::default());
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].category, VpdCategory::Low);
    }
}
