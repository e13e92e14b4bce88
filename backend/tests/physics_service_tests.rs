//! Physics service tests
//!
//! - Request validation happens before any upstream call
//! - Upstream failures degrade to empty data instead of failing the run
//! - Disease detections flow into the assessment and yield outlook

use std::cell::Cell;
use std::rc::Rc;

use chrono::{NaiveDate, TimeZone, Utc};
use crop_physics::config::EngineConfig;
use crop_physics::external::{DiseaseSignalSource, SatelliteSource, StaticSatelliteSource};
use crop_physics::{AnalysisRequest, AppError, AppResult, PhysicsInput, PhysicsService};
use shared::{
    DateRange, DiseaseClass, DiseaseDetection, GpsCoordinates, SatelliteData,
    SatelliteSeriesPoint, SensorReading,
};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 11, d).unwrap()
}

fn reading(sensor: &str, d: u32, temperature: f64, humidity: f64) -> SensorReading {
    SensorReading {
        timestamp: Utc.with_ymd_and_hms(2024, 11, d, 10, 30, 0).unwrap(),
        sensor_id: sensor.to_string(),
        temperature: Some(temperature),
        humidity: Some(humidity),
        soil_moisture: Some(28.0),
        ph: Some(5.8),
        rssi: Some(-95.0),
        snr: Some(7.5),
    }
}

fn location() -> GpsCoordinates {
    GpsCoordinates::from_degrees(-17.82, 31.05).unwrap()
}

fn request(start: &str, end: &str) -> AnalysisRequest {
    AnalysisRequest {
        start_date: start.to_string(),
        end_date: end.to_string(),
        location: Some(location()),
        readings: vec![
            reading("node-1", 1, 27.0, 55.0),
            reading("node-2", 1, 29.0, 45.0),
            reading("node-1", 3, 31.0, 40.0),
        ],
        ..Default::default()
    }
}

/// Satellite source that always fails and counts calls
#[derive(Default, Clone)]
struct DownSatellite {
    calls: Rc<Cell<usize>>,
}

impl SatelliteSource for DownSatellite {
    async fn fetch(&self, _location: &GpsCoordinates, _range: &DateRange) -> AppResult<SatelliteData> {
        self.calls.set(self.calls.get() + 1);
        Err(AppError::SatelliteServiceUnavailable("connection refused".to_string()))
    }
}

struct FixedDetections(Vec<DiseaseDetection>);

impl DiseaseSignalSource for FixedDetections {
    async fn detections(&self, field_id: &str, _range: &DateRange) -> AppResult<Vec<DiseaseDetection>> {
        assert_eq!(field_id, "field-7");
        Ok(self.0.clone())
    }
}

struct DownDisease;

impl DiseaseSignalSource for DownDisease {
    async fn detections(&self, _field_id: &str, _range: &DateRange) -> AppResult<Vec<DiseaseDetection>> {
        Err(AppError::DiseaseServiceError("HTTP 503".to_string()))
    }
}

fn service() -> PhysicsService {
    PhysicsService::new(EngineConfig::default()).unwrap()
}

// ============================================================================
// Request Validation Tests
// ============================================================================

#[cfg(test)]
mod validation_tests {
    use super::*;

    #[tokio::test]
    async fn test_malformed_date_rejected_before_fetch() {
        let satellite = DownSatellite::default();
        let calls = satellite.calls.clone();
        let service = service().with_satellite(satellite);
        let err = service
            .analyze(request("2024-11-31", "2024-12-05"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidDateRange(_)));
        assert!(err.is_fatal_input());
        assert_eq!(calls.get(), 0);
    }

    #[tokio::test]
    async fn test_negative_base_yield_rejected_before_fetch() {
        let satellite = DownSatellite::default();
        let calls = satellite.calls.clone();
        let service = service().with_satellite(satellite);
        let mut req = request("2024-11-01", "2024-11-05");
        req.base_yield_kg_per_ha = Some(-500.0);

        let err = service.analyze(req).await.unwrap_err();
        assert!(matches!(err, AppError::Validation { ref field, .. } if field == "base_yield_kg_per_ha"));
        assert!(err.is_fatal_input());
        assert_eq!(calls.get(), 0);
    }

    #[tokio::test]
    async fn test_end_before_start_rejected() {
        let err = service()
            .analyze(request("2024-11-10", "2024-11-01"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_DATE_RANGE");
    }

    #[test]
    fn test_new_rejects_bad_engine_config() {
        let mut engine = EngineConfig::default();
        engine.constants.curve_number = 0.0;
        assert!(matches!(
            PhysicsService::new(engine),
            Err(AppError::Validation { .. })
        ));
    }
}

// ============================================================================
// Upstream Integration Tests
// ============================================================================

#[cfg(test)]
mod upstream_tests {
    use super::*;

    #[tokio::test]
    async fn test_satellite_failure_degrades_to_sensor_only() {
        let satellite = DownSatellite::default();
        let calls = satellite.calls.clone();
        let service = service().with_satellite(satellite);
        let result = service
            .analyze(request("2024-11-01", "2024-11-05"))
            .await
            .unwrap();

        assert_eq!(calls.get(), 1);
        assert_eq!(result.water_balance.len(), 5);
        assert!(!result.metadata.data_sources.satellite);
        assert!(result.data.ndvi.is_empty());
        assert!(result.water_balance.iter().all(|d| d.precipitation == 0.0));
    }

    #[tokio::test]
    async fn test_supplied_satellite_skips_fetch() {
        let satellite = DownSatellite::default();
        let calls = satellite.calls.clone();
        let service = service().with_satellite(satellite);
        let mut req = request("2024-11-01", "2024-11-03");
        req.satellite = Some(SatelliteData {
            rainfall: vec![SatelliteSeriesPoint::new(day(2), 12.0)],
            ..Default::default()
        });

        let result = service.analyze(req).await.unwrap();
        assert_eq!(calls.get(), 0);
        assert!(result.metadata.data_sources.satellite);
        assert_eq!(result.water_balance[1].precipitation, 12.0);
    }

    #[tokio::test]
    async fn test_static_source_trimmed_to_range() {
        let data = SatelliteData {
            ndvi: vec![
                SatelliteSeriesPoint::new(day(1), 0.55),
                SatelliteSeriesPoint::new(day(20), 0.70),
            ],
            ..Default::default()
        };
        let service = service().with_satellite(StaticSatelliteSource::new(data));
        let result = service
            .analyze(request("2024-11-01", "2024-11-05"))
            .await
            .unwrap();

        assert_eq!(result.data.ndvi.len(), 1);
        assert_eq!(result.data.kc.len(), 1);
        assert!((result.water_balance[0].kc - result.data.kc[0].value).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_detections_flow_into_outlook() {
        let detections = vec![
            DiseaseDetection { disease: DiseaseClass::BlueMold, confidence: 0.9 },
            DiseaseDetection { disease: DiseaseClass::BlueMold, confidence: 0.7 },
            DiseaseDetection { disease: DiseaseClass::BrownSpot, confidence: 0.6 },
        ];
        let service = service().with_disease_signals(FixedDetections(detections));
        let mut req = request("2024-11-01", "2024-11-05");
        req.field_id = Some("field-7".to_string());
        req.base_yield_kg_per_ha = Some(2200.0);

        let result = service.analyze(req).await.unwrap();
        let disease = result.disease.as_ref().unwrap();
        assert_eq!(disease.primary_disease, DiseaseClass::BlueMold);
        assert_eq!(disease.detection_count, 3);
        assert_eq!(disease.disease_types, 2);
        assert_eq!(result.metadata.data_sources.disease_detections, 3);
        assert!(result.yield_outlook.disease_factor < 1.0);
        assert!(result.yield_outlook.expected_yield_kg_per_ha.unwrap() < 2200.0);
    }

    #[tokio::test]
    async fn test_disease_failure_skips_integration() {
        let service = service().with_disease_signals(DownDisease);
        let mut req = request("2024-11-01", "2024-11-02");
        req.field_id = Some("field-7".to_string());

        let result = service.analyze(req).await.unwrap();
        assert!(result.disease.is_none());
        assert_eq!(result.yield_outlook.disease_factor, 1.0);
    }
}

// ============================================================================
// Result Shape Tests
// ============================================================================

#[cfg(test)]
mod result_tests {
    use super::*;

    #[test]
    fn test_metadata_counts() {
        let mut input = PhysicsInput::new(DateRange::new(day(1), day(4)).unwrap());
        input.location = Some(location());
        input.readings = request("2024-11-01", "2024-11-04").readings;

        let result = service().compute(&input);
        let sources = &result.metadata.data_sources;
        assert_eq!(sources.sensors, 2);
        assert_eq!(sources.sensor_days, 2);
        assert!(!sources.satellite);
        assert_eq!(sources.disease_detections, 0);
        assert_eq!(result.metadata.date_range.start, day(1));
        assert_eq!(result.vpd_analysis.len(), 2);
        assert_eq!(result.yield_stress.len(), 4);
        assert!(!result.recommendations.is_empty());
    }

    /// An invalid base yield on a direct input falls back to the configured one
    #[test]
    fn test_invalid_base_yield_override_ignored() {
        let mut input = PhysicsInput::new(DateRange::new(day(1), day(2)).unwrap());
        input.base_yield_kg_per_ha = Some(-500.0);
        assert!(service().compute(&input).yield_outlook.expected_yield_kg_per_ha.is_none());

        let engine = EngineConfig {
            base_yield_kg_per_ha: Some(2000.0),
            ..Default::default()
        };
        let expected = PhysicsService::new(engine)
            .unwrap()
            .compute(&input)
            .yield_outlook
            .expected_yield_kg_per_ha
            .unwrap();
        assert!(expected > 0.0 && expected <= 2000.0);
    }

    /// A reading at the vapour pressure pole yields no usable climate for that day only
    #[test]
    fn test_pole_temperature_day_keeps_summary_usable() {
        let mut input = PhysicsInput::new(DateRange::new(day(1), day(3)).unwrap());
        input.readings = vec![reading("node-1", 2, -237.3, 50.0)];

        let result = service().compute(&input);
        assert!(result.water_balance[1].net_balance.is_nan());
        assert!(result.summary.total_water_balance.is_finite());
        assert!(result.summary.total_et.is_finite());
        assert_eq!(result.summary.vpd_days, 0);
        assert!(!result
            .recommendations
            .iter()
            .any(|r| r.starts_with("Low VPD conditions")));

        let json = serde_json::to_value(&result.summary).unwrap();
        assert!(json["totalWaterBalance"].is_number());
    }

    #[test]
    fn test_result_json_keys() {
        let input = PhysicsInput::new(DateRange::new(day(1), day(2)).unwrap());
        let json = serde_json::to_value(service().compute(&input)).unwrap();

        for key in [
            "waterBalance",
            "cropGrowth",
            "vpdAnalysis",
            "yieldStress",
            "summary",
            "recommendations",
            "yieldOutlook",
            "data",
            "metadata",
        ] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
        assert!(json["metadata"].get("dateRange").is_some());
        assert!(json["data"].get("deltaS").is_some());
    }
}
