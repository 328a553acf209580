//! Batch models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One received lot of a product, with its own running quantity and
/// optional expiry date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Batch {
    pub id: Uuid,
    pub product_id: Uuid,
    /// Free-text label, unique per product by convention (not enforced)
    pub batch_number: String,
    /// Current remaining quantity; mutated only through the transaction
    /// ledger once the batch has recorded movements
    pub quantity: i64,
    pub received_date: NaiveDate,
    pub has_expiry: bool,
    pub expiry_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Batch {
    /// A batch is logically retired once its quantity reaches zero.
    /// Retirement is derived at read time; depleted batches are kept for
    /// the audit trail rather than deleted.
    pub fn is_depleted(&self) -> bool {
        self.quantity == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_batch(quantity: i64) -> Batch {
        Batch {
            id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            batch_number: "BATCH-A".to_string(),
            quantity,
            received_date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
            has_expiry: false,
            expiry_date: None,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_depleted_batch() {
        assert!(sample_batch(0).is_depleted());
        assert!(!sample_batch(1).is_depleted());
    }
}
