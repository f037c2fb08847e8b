//! Domain models for the ShroomTrack operations ledger

mod batch;
mod cost;
mod finished_good;
mod inventory;
mod procurement;
mod recipe;
mod sales;
mod settings;
mod user;

pub use batch::*;
pub use cost::*;
pub use finished_good::*;
pub use inventory::*;
pub use procurement::*;
pub use recipe::*;
pub use sales::*;
pub use settings::*;
pub use user::*;
