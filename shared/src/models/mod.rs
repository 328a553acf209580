//! Domain models for the Gift Hamper Inventory Ledger

mod batch;
mod product;
mod transaction;

pub use batch::*;
pub use product::*;
pub use transaction::*;
