//! Domain models for the Crop Physics Engine

mod crop_growth;
mod disease;
mod result;
mod satellite;
mod sensor;
mod water_balance;
mod yield_stress;

pub use crop_growth::*;
pub use disease::*;
pub use result::*;
pub use satellite::*;
pub use sensor::*;
pub use water_balance::*;
pub use yield_stress::*;
