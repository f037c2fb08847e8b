//! HTTP request handlers

pub mod batch;
pub mod health;
pub mod inventory;
pub mod ledger;
pub mod packing;
pub mod procurement;
pub mod recipe;
pub mod reporting;
pub mod sales;
pub mod settings;
pub mod sync;

pub use health::health_check;
