//! Business logic services for the ShroomTrack operations ledger
//!
//! Services are scoped to one workspace at construction and are cheap to
//! build per request.

pub mod batch;
pub mod inventory;
pub mod ledger;
pub mod packing;
pub mod procurement;
pub mod recipe;
pub mod reporting;
pub mod sales;
pub mod settings;
pub mod sync;

pub use batch::BatchService;
pub use inventory::InventoryService;
pub use ledger::LedgerService;
pub use packing::PackingService;
pub use procurement::ProcurementService;
pub use recipe::RecipeService;
pub use reporting::ReportingService;
pub use sales::SalesService;
pub use settings::SettingsService;
pub use sync::SyncService;
