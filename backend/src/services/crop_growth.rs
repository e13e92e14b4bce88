//! Crop growth from thermal time
//!
//! Daily GDD is estimated from the mean air temperature with an assumed symmetric diurnal
//! range, accumulated over the window, and mapped to LAI on a logistic curve.

use shared::{
    classify_growth_stage, gdd, CropGrowthDay, CropGrowthParameters, DateRange, FallbackDefaults,
    PhysicsConstants, SatelliteIndex,
};

use super::aggregation::DailyRecords;

#[derive(Debug, Clone, Copy, Default)]
pub struct CropGrowthModel {
    pub constants: PhysicsConstants,
    pub growth: CropGrowthParameters,
    pub fallbacks: FallbackDefaults,
}

impl CropGrowthModel {
    pub fn new(
        constants: PhysicsConstants,
        growth: CropGrowthParameters,
        fallbacks: FallbackDefaults,
    ) -> Self {
        Self {
            constants,
            growth,
            fallbacks,
        }
    }

    /// One record per date in `range`; `accumulated_gdd` never decreases
    pub fn compute(
        &self,
        range: &DateRange,
        daily: &DailyRecords,
        satellite: &SatelliteIndex,
    ) -> Vec<CropGrowthDay> {
        let half_range = self.growth.diurnal_half_range_c;

        range
            .days()
            .scan(0.0_f64, |accumulated, date| {
                let t = daily
                    .get(&date)
                    .and_then(|s| s.temperature)
                    .unwrap_or(self.fallbacks.temperature_c);

                let day_gdd = gdd(t + half_range, t - half_range, self.constants.base_temp_c);
                if day_gdd.is_finite() {
                    *accumulated += day_gdd;
                }

                let lai = self.growth.lai(*accumulated);
                let kc = match satellite.ndvi.get(&date) {
                    Some(ndvi) => self.constants.kc_from_ndvi(*ndvi),
                    None => self.growth.kc_from_lai(lai),
                };

                Some(CropGrowthDay {
                    date,
                    gdd: day_gdd,
                    accumulated_gdd: *accumulated,
                    lai,
                    kc,
                    growth_stage: classify_growth_stage(*accumulated),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shared::{DailySensorRecord, GrowthStage};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 11, d).unwrap()
    }

    #[test]
    fn test_default_temperature_accumulates_fifteen_per_day() {
        let range = DateRange::new(day(1), day(4)).unwrap();
        let days =
            CropGrowthModel::default().compute(&range, &DailyRecords::new(), &SatelliteIndex::default());

        assert_eq!(days.len(), 4);
        assert_eq!(days[0].gdd, 15.0);
        assert_eq!(days[3].accumulated_gdd, 60.0);
        assert_eq!(days[3].growth_stage, GrowthStage::TransplantEstablishment);
    }

    #[test]
    fn test_ndvi_overrides_lai_kc() {
        let range = DateRange::new(day(1), day(2)).unwrap();
        let mut satellite = SatelliteIndex::default();
        satellite.ndvi.insert(day(2), 0.5);

        let days = CropGrowthModel::default().compute(&range, &DailyRecords::new(), &satellite);
        let lai_kc = 0.3 + 0.7 * days[0].lai / 5.0;
        assert!((days[0].kc - lai_kc).abs() < 1e-12);
        assert!((days[1].kc - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_cold_day_adds_nothing() {
        let range = DateRange::new(day(1), day(2)).unwrap();
        let cold = DailySensorRecord {
            date: day(2),
            temperature: Some(2.0),
            humidity: None,
            soil_moisture: None,
            ph: None,
            reading_count: 3,
        };
        let daily = DailyRecords::from([(day(2), cold)]);

        let days = CropGrowthModel::default().compute(&range, &daily, &SatelliteIndex::default());
        assert_eq!(days[1].gdd, 0.0);
        assert_eq!(days[1].accumulated_gdd, days[0].accumulated_gdd);
    }
}
