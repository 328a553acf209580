//! Business logic services

pub mod alerts;
pub mod allocation;
pub mod batch;
pub mod catalog;
pub mod ledger;
pub mod stock;

pub use alerts::AlertService;
pub use allocation::AllocationService;
pub use batch::BatchService;
pub use catalog::CatalogService;
pub use ledger::LedgerService;
pub use stock::StockService;
