//! Physics service: the engine entry point
//!
//! `compute` is a pure fold over in-memory inputs. `analyze` first pulls whatever the
//! request does not carry from the injected satellite and disease sources, then computes.
//! Upstream failures never abort a run; the affected series is simply empty.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use shared::{
    validate_base_yield, validate_reading, DataSources, DateRange, DiseaseDetection,
    GpsCoordinates, PhysicsResult, ResultMetadata, SatelliteData, SensorReading, SeriesEcho,
};

use super::aggregation::{aggregate_daily_in_range, count_sensors};
use super::crop_growth::CropGrowthModel;
use super::disease::{assess_detections, yield_outlook};
use super::summary::{generate_recommendations, summarize};
use super::water_balance::{soil_storage_changes, WaterBalanceModel};
use super::yield_stress::YieldStressModel;
use crate::config::EngineConfig;
use crate::error::{AppError, AppResult};
use crate::external::{
    DiseaseSignalSource, SatelliteSource, StaticDiseaseSignals, StaticSatelliteSource,
};

/// Everything one engine run consumes, already in memory
#[derive(Debug, Clone)]
pub struct PhysicsInput {
    pub range: DateRange,
    pub location: Option<GpsCoordinates>,
    pub readings: Vec<SensorReading>,
    pub satellite: SatelliteData,
    /// Applied irrigation (mm) by date
    pub irrigation: BTreeMap<NaiveDate, f64>,
    /// `None` skips disease integration entirely
    pub detections: Option<Vec<DiseaseDetection>>,
    /// Overrides the configured base yield
    pub base_yield_kg_per_ha: Option<f64>,
}

impl PhysicsInput {
    pub fn new(range: DateRange) -> Self {
        Self {
            range,
            location: None,
            readings: Vec::new(),
            satellite: SatelliteData::default(),
            irrigation: BTreeMap::new(),
            detections: None,
            base_yield_kg_per_ha: None,
        }
    }
}

/// An analysis request as it arrives from the CLI, with unparsed dates
#[derive(Debug, Clone, Default)]
pub struct AnalysisRequest {
    pub start_date: String,
    pub end_date: String,
    pub location: Option<GpsCoordinates>,
    /// Field identifier for the disease signal service
    pub field_id: Option<String>,
    pub readings: Vec<SensorReading>,
    /// Satellite data supplied by the caller; fetched from the source when `None`
    pub satellite: Option<SatelliteData>,
    pub irrigation: BTreeMap<NaiveDate, f64>,
    /// Detections supplied by the caller; fetched from the source when `None`
    pub detections: Option<Vec<DiseaseDetection>>,
    pub base_yield_kg_per_ha: Option<f64>,
}

/// Physics service with injected upstream sources
#[derive(Clone)]
pub struct PhysicsService<S = StaticSatelliteSource, D = StaticDiseaseSignals> {
    engine: Arc<EngineConfig>,
    satellite: Option<S>,
    disease: Option<D>,
}

impl PhysicsService {
    /// Create a service with no upstream sources; rejects unusable coefficients
    pub fn new(engine: EngineConfig) -> AppResult<Self> {
        engine.validate()?;
        Ok(Self {
            engine: Arc::new(engine),
            satellite: None,
            disease: None,
        })
    }
}

impl<S, D> PhysicsService<S, D> {
    /// Use `source` for satellite series the request does not carry
    pub fn with_satellite<T: SatelliteSource>(self, source: T) -> PhysicsService<T, D> {
        self.with_optional_satellite(Some(source))
    }

    /// Like `with_satellite`, for a source that may not be configured
    pub fn with_optional_satellite<T: SatelliteSource>(
        self,
        source: Option<T>,
    ) -> PhysicsService<T, D> {
        PhysicsService {
            engine: self.engine,
            satellite: source,
            disease: self.disease,
        }
    }

    /// Use `source` for disease detections the request does not carry
    pub fn with_disease_signals<T: DiseaseSignalSource>(self, source: T) -> PhysicsService<S, T> {
        self.with_optional_disease_signals(Some(source))
    }

    pub fn with_optional_disease_signals<T: DiseaseSignalSource>(
        self,
        source: Option<T>,
    ) -> PhysicsService<S, T> {
        PhysicsService {
            engine: self.engine,
            satellite: self.satellite,
            disease: source,
        }
    }

    pub fn engine(&self) -> &EngineConfig {
        &self.engine
    }

    /// Run every engine component over in-memory inputs
    pub fn compute(&self, input: &PhysicsInput) -> PhysicsResult {
        let engine = &*self.engine;
        let constants = engine.constants;
        let fallbacks = engine.fallbacks;

        for reading in &input.readings {
            if let Err(reason) = validate_reading(reading) {
                tracing::warn!(
                    sensor_id = %reading.sensor_id,
                    timestamp = %reading.timestamp,
                    reason,
                    "Implausible sensor reading"
                );
            }
        }

        let daily = aggregate_daily_in_range(&input.readings, &input.range);
        let satellite = input.satellite.clone().with_derived_kc(&constants);
        let index = satellite.index();

        tracing::info!(
            start = %input.range.start,
            end = %input.range.end,
            days = input.range.len_days(),
            sensor_days = daily.len(),
            satellite = !satellite.is_empty(),
            "Running physics analysis"
        );

        let water_balance = WaterBalanceModel::new(constants, fallbacks).compute(
            &input.range,
            &daily,
            &index,
            &input.irrigation,
        );
        let crop_growth =
            CropGrowthModel::new(constants, engine.growth, fallbacks).compute(&input.range, &daily, &index);

        let stress_model = YieldStressModel::new(constants, fallbacks);
        let vpd_analysis = stress_model.vpd_analysis(&input.range, &daily, &index);
        let yield_stress = stress_model.yield_stress(&water_balance, &vpd_analysis);

        let summary = summarize(&water_balance, &crop_growth, &vpd_analysis, &yield_stress);
        let recommendations = generate_recommendations(&summary);

        let base_yield = match input.base_yield_kg_per_ha {
            Some(base) if validate_base_yield(base).is_err() => {
                tracing::warn!(base, "Ignoring invalid base yield override");
                engine.base_yield_kg_per_ha
            }
            Some(base) => Some(base),
            None => engine.base_yield_kg_per_ha,
        };
        let disease = input.detections.as_deref().map(assess_detections);
        let outlook = yield_outlook(&summary, disease.as_ref(), base_yield);

        let data_sources = DataSources {
            sensors: count_sensors(&input.readings),
            sensor_days: daily.len(),
            satellite: !satellite.is_empty(),
            disease_detections: input.detections.as_ref().map_or(0, Vec::len),
        };
        let delta_s = soil_storage_changes(&daily);

        PhysicsResult {
            water_balance,
            crop_growth,
            vpd_analysis,
            yield_stress,
            summary,
            recommendations,
            disease,
            yield_outlook: outlook,
            data: SeriesEcho {
                ndvi: satellite.ndvi,
                rainfall: satellite.rainfall,
                et: satellite.et,
                lst: satellite.lst,
                kc: satellite.kc,
                delta_s,
            },
            metadata: ResultMetadata {
                location: input.location.clone(),
                date_range: input.range,
                data_sources,
            },
        }
    }
}

impl<S: SatelliteSource, D: DiseaseSignalSource> PhysicsService<S, D> {
    /// Validate the request, fetch missing upstream data, and compute
    ///
    /// Bad dates or a negative base yield fail before anything is fetched.
    pub async fn analyze(&self, request: AnalysisRequest) -> AppResult<PhysicsResult> {
        let range = DateRange::parse(&request.start_date, &request.end_date)?;
        if let Some(base) = request.base_yield_kg_per_ha {
            validate_base_yield(base).map_err(|m| AppError::Validation {
                field: "base_yield_kg_per_ha".to_string(),
                message: m.to_string(),
            })?;
        }

        let satellite = match request.satellite {
            Some(data) => data,
            None => self.fetch_satellite(request.location.as_ref(), &range).await,
        };

        let detections = match request.detections {
            Some(detections) => Some(detections),
            None => self.fetch_detections(request.field_id.as_deref(), &range).await,
        };

        let input = PhysicsInput {
            range,
            location: request.location,
            readings: request.readings,
            satellite,
            irrigation: request.irrigation,
            detections,
            base_yield_kg_per_ha: request.base_yield_kg_per_ha,
        };

        Ok(self.compute(&input))
    }

    async fn fetch_satellite(
        &self,
        location: Option<&GpsCoordinates>,
        range: &DateRange,
    ) -> SatelliteData {
        let (Some(source), Some(location)) = (&self.satellite, location) else {
            tracing::debug!("No satellite source or location, continuing without satellite data");
            return SatelliteData::default();
        };

        match source.fetch(location, range).await {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(error = %e, "Satellite data unavailable, continuing without it");
                SatelliteData::default()
            }
        }
    }

    async fn fetch_detections(
        &self,
        field_id: Option<&str>,
        range: &DateRange,
    ) -> Option<Vec<DiseaseDetection>> {
        let (Some(source), Some(field_id)) = (&self.disease, field_id) else {
            return None;
        };

        match source.detections(field_id, range).await {
            Ok(detections) => Some(detections),
            Err(e) => {
                tracing::warn!(error = %e, field_id, "Disease signals unavailable, skipping disease integration");
                None
            }
        }
    }
}
