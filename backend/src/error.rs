//! Error handling for the Crop Physics Engine
//!
//! Every failure maps to a stable machine code so the CLI can print a structured
//! error document instead of a bare message.

use serde::Serialize;
use shared::InputError;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Request errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid date range: {0}")]
    InvalidDateRange(#[from] InputError),

    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    // External service errors
    #[error("Satellite service unavailable: {0}")]
    SatelliteServiceUnavailable(String),

    #[error("Disease signal service error: {0}")]
    DiseaseServiceError(String),

    // Input/output errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response structure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl AppError {
    /// Stable machine-readable code for the error kind
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::InvalidDateRange(_) => "INVALID_DATE_RANGE",
            AppError::Validation { .. } => "VALIDATION_ERROR",
            AppError::SatelliteServiceUnavailable(_) => "SATELLITE_SERVICE_UNAVAILABLE",
            AppError::DiseaseServiceError(_) => "DISEASE_SERVICE_ERROR",
            AppError::Csv(_) => "CSV_ERROR",
            AppError::Json(_) => "JSON_ERROR",
            AppError::Io(_) => "IO_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the error was raised while validating the request, before any computation
    pub fn is_fatal_input(&self) -> bool {
        matches!(
            self,
            AppError::Configuration(_) | AppError::InvalidDateRange(_) | AppError::Validation { .. }
        )
    }

    fn field(&self) -> Option<String> {
        match self {
            AppError::Validation { field, .. } => Some(field.clone()),
            AppError::InvalidDateRange(InputError::InvalidDate { field, .. }) => {
                Some(field.clone())
            }
            _ => None,
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: ErrorDetail {
                code: self.code().to_string(),
                message: self.to_string(),
                field: self.field(),
            },
        }
    }
}

/// Result type alias for engine operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_date_maps_to_field() {
        let err: AppError = shared::parse_iso_date("start", "2024-13-01")
            .unwrap_err()
            .into();
        let response = err.to_response();
        assert_eq!(response.error.code, "INVALID_DATE_RANGE");
        assert_eq!(response.error.field.as_deref(), Some("start"));
        assert!(err.is_fatal_input());
    }

    #[test]
    fn test_upstream_errors_are_not_fatal_input() {
        let err = AppError::SatelliteServiceUnavailable("timeout".into());
        assert_eq!(err.code(), "SATELLITE_SERVICE_UNAVAILABLE");
        assert!(!err.is_fatal_input());
    }

    #[test]
    fn test_internal_error_response() {
        let response = AppError::Internal("client build failed".into()).to_response();
        assert_eq!(response.error.code, "INTERNAL_ERROR");
        assert_eq!(response.error.message, "Internal error: client build failed");
    }

    #[test]
    fn test_error_response_serializes_without_empty_field() {
        let json = serde_json::to_value(AppError::Configuration("x".into()).to_response()).unwrap();
        assert_eq!(json["error"]["code"], "CONFIGURATION_ERROR");
        assert!(json["error"].get("field").is_none());
    }
}
