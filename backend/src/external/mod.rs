//! External API integrations

pub mod disease;
pub mod satellite;

pub use disease::{DiseaseSignalClient, DiseaseSignalSource, StaticDiseaseSignals};
pub use satellite::{HttpSatelliteClient, SatelliteSource, StaticSatelliteSource};
