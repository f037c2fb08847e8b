//! Shared types and models for the ShroomTrack operations ledger
//!
//! This crate contains the domain model and the pure allocation and costing
//! math shared between the backend and the browser (via WASM).

pub mod allocation;
pub mod costing;
pub mod models;
pub mod types;
pub mod validation;

pub use allocation::*;
pub use costing::*;
pub use models::*;
pub use types::*;
pub use validation::*;
