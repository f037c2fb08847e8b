//! Domain models for the ShroomTrack server
//!
//! Re-exports models from the shared crate

pub use shared::models::*;
