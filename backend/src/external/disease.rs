//! Disease detection signal client
//!
//! Client for the leaf-image classification service. Only the stored detections for a
//! field are read; classification itself happens upstream.

use std::time::Duration;

use reqwest::Client;
use shared::{DateRange, DiseaseDetection};

use crate::config::DiseaseConfig;
use crate::error::{AppError, AppResult};

/// Anything that can list disease detections for a field
#[allow(async_fn_in_trait)]
pub trait DiseaseSignalSource {
    async fn detections(&self, field_id: &str, range: &DateRange)
        -> AppResult<Vec<DiseaseDetection>>;
}

/// Client for the disease detection microservice
#[derive(Clone)]
pub struct DiseaseSignalClient {
    api_endpoint: String,
    api_key: Option<String>,
    http_client: Client,
}

impl DiseaseSignalClient {
    /// Create a new disease signal client
    pub fn new(api_endpoint: String, api_key: Option<String>, timeout: Duration) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_endpoint: api_endpoint.trim_end_matches('/').to_string(),
            api_key,
            http_client,
        })
    }

    /// Build a client from configuration; `None` when no endpoint is configured
    pub fn from_config(config: &DiseaseConfig) -> AppResult<Option<Self>> {
        match &config.endpoint {
            Some(endpoint) if !endpoint.trim().is_empty() => Ok(Some(Self::new(
                endpoint.clone(),
                config.api_key.clone(),
                Duration::from_secs(config.timeout_secs),
            )?)),
            _ => Ok(None),
        }
    }

    fn detections_url(&self, field_id: &str) -> String {
        format!("{}/fields/{}/detections", self.api_endpoint, field_id)
    }
}

impl DiseaseSignalSource for DiseaseSignalClient {
    async fn detections(
        &self,
        field_id: &str,
        range: &DateRange,
    ) -> AppResult<Vec<DiseaseDetection>> {
        let mut request = self.http_client.get(self.detections_url(field_id)).query(&[
            ("start", range.start.to_string()),
            ("end", range.end.to_string()),
        ]);
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::DiseaseServiceError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::DiseaseServiceError(format!(
                "API returned {}: {}",
                status, body
            )));
        }

        let detections: Vec<DiseaseDetection> = response
            .json()
            .await
            .map_err(|e| AppError::DiseaseServiceError(format!("Failed to parse response: {}", e)))?;

        Ok(detections)
    }
}

/// Detections already in hand, returned as-is for any field
#[derive(Debug, Clone, Default)]
pub struct StaticDiseaseSignals(pub Vec<DiseaseDetection>);

impl DiseaseSignalSource for StaticDiseaseSignals {
    async fn detections(
        &self,
        _field_id: &str,
        _range: &DateRange,
    ) -> AppResult<Vec<DiseaseDetection>> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::DiseaseClass;

    #[test]
    fn test_detections_url() {
        let client = DiseaseSignalClient::new(
            "http://localhost:8080/".to_string(),
            Some("key".to_string()),
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(
            client.detections_url("field-7"),
            "http://localhost:8080/fields/field-7/detections"
        );
    }

    #[test]
    fn test_detection_payload_parsing() {
        let body = r#"[
            {"class": "brown_spot", "confidence": 0.82},
            {"class": "leaf_curl", "confidence": 0.4},
            {"class": "healthy"}
        ]"#;
        let detections: Vec<DiseaseDetection> = serde_json::from_str(body).unwrap();
        assert_eq!(detections[0].disease, DiseaseClass::BrownSpot);
        assert_eq!(
            detections[1].disease,
            DiseaseClass::Unknown("leaf_curl".to_string())
        );
        assert_eq!(detections[2].confidence, 0.0);
    }

    #[test]
    fn test_from_config_blank_endpoint() {
        let config = DiseaseConfig {
            endpoint: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(DiseaseSignalClient::from_config(&config).unwrap().is_none());
    }
}
