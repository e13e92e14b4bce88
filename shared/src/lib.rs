//! Shared types and models for the Crop Physics Engine
//!
//! This crate contains the domain models, agronomic constants and pure physics
//! functions shared between the engine backend and the browser bindings (via WASM).

pub mod models;
pub mod physics;
pub mod serialize_finite;
pub mod types;
pub mod validation;

pub use models::*;
pub use physics::*;
pub use types::*;
pub use validation::*;
