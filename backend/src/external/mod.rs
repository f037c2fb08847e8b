//! External API integrations

pub mod sheet;

pub use sheet::{DatabaseSnapshot, HarvestAlert, SheetClient};
