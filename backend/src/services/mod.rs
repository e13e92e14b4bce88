//! Engine services

pub mod aggregation;
pub mod crop_growth;
pub mod disease;
pub mod io;
pub mod physics;
pub mod summary;
pub mod water_balance;
pub mod yield_stress;

pub use aggregation::{aggregate_daily, aggregate_daily_by, aggregate_daily_in_range, DailyRecords};
pub use crop_growth::CropGrowthModel;
pub use disease::{assess_detections, yield_outlook};
pub use physics::{AnalysisRequest, PhysicsInput, PhysicsService};
pub use summary::{generate_recommendations, summarize};
pub use water_balance::{soil_storage_changes, WaterBalanceModel};
pub use yield_stress::YieldStressModel;
