//! Configuration management for the Crop Physics Engine
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with the CPE__ prefix, e.g.
//!    `CPE__ENGINE__CONSTANTS__CURVE_NUMBER=75`

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::{
    validate_base_yield, validate_curve_number, validate_ndvi_bounds, validate_vpd_band,
    CropGrowthParameters, FallbackDefaults, PhysicsConstants,
};

use crate::error::{AppError, AppResult};

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Physics engine coefficients
    #[serde(default)]
    pub engine: EngineConfig,

    /// Satellite time series provider
    #[serde(default)]
    pub satellite: SatelliteConfig,

    /// Disease detection signal provider
    #[serde(default)]
    pub disease: DiseaseConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub constants: PhysicsConstants,

    #[serde(default)]
    pub growth: CropGrowthParameters,

    #[serde(default)]
    pub fallbacks: FallbackDefaults,

    /// Attainable yield used for the yield outlook (kg/ha)
    #[serde(default)]
    pub base_yield_kg_per_ha: Option<f64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SatelliteConfig {
    /// Time series API endpoint; satellite data is skipped when unset
    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DiseaseConfig {
    /// Detection API endpoint; disease integration is skipped when unset
    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for SatelliteConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for DiseaseConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            engine: EngineConfig::default(),
            satellite: SatelliteConfig::default(),
            disease: DiseaseConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("CPE_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("satellite.timeout_secs", default_timeout_secs())?
            .set_default("disease.timeout_secs", default_timeout_secs())?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (CPE__ prefix)
            .add_source(
                Environment::with_prefix("CPE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Reject configuration the engine cannot run with
    pub fn validate(&self) -> AppResult<()> {
        self.engine.validate()
    }
}

impl EngineConfig {
    /// Reject coefficient sets the engine cannot run with
    pub fn validate(&self) -> AppResult<()> {
        let c = &self.constants;
        let invalid = |field: &str, message: &str| AppError::Validation {
            field: field.to_string(),
            message: message.to_string(),
        };

        validate_curve_number(c.curve_number)
            .map_err(|m| invalid("engine.constants.curve_number", m))?;
        validate_ndvi_bounds(c.ndvi_min, c.ndvi_max)
            .map_err(|m| invalid("engine.constants.ndvi_max", m))?;
        validate_vpd_band(c.vpd_min_kpa, c.vpd_max_kpa)
            .map_err(|m| invalid("engine.constants.vpd_max_kpa", m))?;

        if !(self.growth.max_lai > 0.0) {
            return Err(invalid("engine.growth.max_lai", "Maximum LAI must be positive"));
        }
        if let Some(base) = self.base_yield_kg_per_ha {
            validate_base_yield(base).map_err(|m| invalid("engine.base_yield_kg_per_ha", m))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.engine.constants.curve_number, 70.0);
        assert_eq!(config.engine.fallbacks.temperature_c, 25.0);
    }

    #[test]
    fn test_invalid_curve_number_rejected() {
        let mut config = Config::default();
        config.engine.constants.curve_number = 0.0;
        let err = config.validate().unwrap_err();
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_partial_engine_section_keeps_defaults() {
        let config: Config = config::Config::builder()
            .set_default("environment", "test")
            .unwrap()
            .set_override("engine.constants.curve_number", 80.0)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.engine.constants.curve_number, 80.0);
        assert_eq!(config.engine.constants.vpd_max_kpa, 1.5);
        assert_eq!(config.satellite.timeout_secs, 30);
        assert!(config.satellite.endpoint.is_none());
    }
}
