//! Crop Physics Engine
//!
//! Physics-informed water balance, crop growth and yield stress for field telemetry,
//! fused with satellite indicators and disease detection signals.

pub mod config;
pub mod error;
pub mod external;
pub mod services;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use services::{AnalysisRequest, PhysicsInput, PhysicsService};
