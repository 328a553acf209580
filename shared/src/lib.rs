//! Shared types and domain logic for the Gift Hamper Inventory Ledger
//!
//! This crate contains types and pure computations shared between the
//! backend, the storefront (via WASM), and other components of the system:
//! batch and transaction models, expiry-status derivation, the FIFO/LIFO
//! consumption planner, and the alerting predicates.

pub mod alerts;
pub mod allocation;
pub mod expiry;
pub mod models;
pub mod movement;
pub mod types;
pub mod validation;

pub use alerts::*;
pub use allocation::*;
pub use expiry::*;
pub use models::*;
pub use movement::*;
pub use types::*;
pub use validation::*;
