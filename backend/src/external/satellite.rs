//! Satellite time series sources
//!
//! The engine never talks to Earth Engine directly. A provider service exposes the
//! NDVI, rainfall, ET and LST products for a point as one JSON document, and this module
//! fetches it. `StaticSatelliteSource` serves data that is already in memory (files,
//! tests).

use std::time::Duration;

use reqwest::Client;
use shared::{DateRange, GpsCoordinates, SatelliteData, SatelliteSeriesPoint};

use crate::config::SatelliteConfig;
use crate::error::{AppError, AppResult};

/// Anything that can produce satellite series for a location and date window
#[allow(async_fn_in_trait)]
pub trait SatelliteSource {
    async fn fetch(&self, location: &GpsCoordinates, range: &DateRange)
        -> AppResult<SatelliteData>;
}

/// HTTP client for the satellite time series provider
#[derive(Clone)]
pub struct HttpSatelliteClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpSatelliteClient {
    /// Create a new client against `endpoint`
    pub fn new(endpoint: String, api_key: Option<String>, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Build a client from configuration; `None` when no endpoint is configured
    pub fn from_config(config: &SatelliteConfig) -> AppResult<Option<Self>> {
        match &config.endpoint {
            Some(endpoint) if !endpoint.trim().is_empty() => Ok(Some(Self::new(
                endpoint.clone(),
                config.api_key.clone(),
                Duration::from_secs(config.timeout_secs),
            )?)),
            _ => Ok(None),
        }
    }

    fn timeseries_url(&self) -> String {
        format!("{}/timeseries", self.endpoint)
    }
}

impl SatelliteSource for HttpSatelliteClient {
    async fn fetch(
        &self,
        location: &GpsCoordinates,
        range: &DateRange,
    ) -> AppResult<SatelliteData> {
        let mut request = self.client.get(self.timeseries_url()).query(&[
            ("lat", location.latitude.to_string()),
            ("lng", location.longitude.to_string()),
            ("start", range.start.to_string()),
            ("end", range.end.to_string()),
        ]);
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request.send().await.map_err(|e| {
            AppError::SatelliteServiceUnavailable(format!("Request failed: {}", e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::SatelliteServiceUnavailable(format!(
                "API returned {}: {}",
                status, body
            )));
        }

        let data: SatelliteData = response.json().await.map_err(|e| {
            AppError::SatelliteServiceUnavailable(format!("Failed to parse response: {}", e))
        })?;

        tracing::debug!(
            ndvi = data.ndvi.len(),
            rainfall = data.rainfall.len(),
            et = data.et.len(),
            lst = data.lst.len(),
            "Fetched satellite series"
        );

        Ok(data)
    }
}

/// In-memory satellite data, trimmed to the requested window on fetch
#[derive(Debug, Clone, Default)]
pub struct StaticSatelliteSource {
    data: SatelliteData,
}

impl StaticSatelliteSource {
    pub fn new(data: SatelliteData) -> Self {
        Self { data }
    }

    /// Read a satellite JSON document (`{ndvi, rainfall, et, lst[, kc]}`) from disk
    pub fn from_file(path: &std::path::Path) -> AppResult<Self> {
        let file = std::fs::File::open(path)?;
        let data: SatelliteData = serde_json::from_reader(std::io::BufReader::new(file))?;
        Ok(Self::new(data))
    }

    pub fn into_data(self) -> SatelliteData {
        self.data
    }
}

fn within(series: &[SatelliteSeriesPoint], range: &DateRange) -> Vec<SatelliteSeriesPoint> {
    series
        .iter()
        .filter(|p| range.contains(p.date))
        .copied()
        .collect()
}

impl SatelliteSource for StaticSatelliteSource {
    async fn fetch(
        &self,
        _location: &GpsCoordinates,
        range: &DateRange,
    ) -> AppResult<SatelliteData> {
        Ok(SatelliteData {
            ndvi: within(&self.data.ndvi, range),
            rainfall: within(&self.data.rainfall, range),
            et: within(&self.data.et, range),
            lst: within(&self.data.lst, range),
            kc: within(&self.data.kc, range),
        })
    }
}
