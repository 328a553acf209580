//! Per-product inventory policy
//!
//! Product identity lives in the external catalog; the ledger only stores
//! the flags that steer consumption ordering, expiry alerting, and
//! low-stock alerting.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Days before expiry at which a batch starts counting as "expiring soon"
pub const DEFAULT_EXPIRY_NOTIFICATION_DAYS: i64 = 30;

/// Per-product inventory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductPolicy {
    pub product_id: Uuid,
    /// Whether batches of this product carry expiry dates
    pub has_expiry: bool,
    pub expiry_notification_days: i64,
    /// Consume oldest-received batch first when true, newest first when false
    pub use_fifo: bool,
    /// Low-stock alert threshold; 0 means "alert only at zero"
    pub minimum_stock: i64,
}

impl ProductPolicy {
    /// Defaults applied when no explicit policy row is stored
    pub fn defaults(product_id: Uuid) -> Self {
        Self {
            product_id,
            has_expiry: false,
            expiry_notification_days: DEFAULT_EXPIRY_NOTIFICATION_DAYS,
            use_fifo: true,
            minimum_stock: 0,
        }
    }
}
