//! Stock transaction models
//!
//! A transaction is an immutable record of a single stock movement against
//! exactly one batch. Direction is carried by the transaction type, never by
//! a signed quantity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Types of stock transactions
///
/// Manual corrections are split into an explicit increase and decrease
/// rather than a single direction-ambiguous `adjustment` type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Sale,
    Return,
    Waste,
    AdjustmentIn,
    AdjustmentOut,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Sale => "sale",
            TransactionType::Return => "return",
            TransactionType::Waste => "waste",
            TransactionType::AdjustmentIn => "adjustment_in",
            TransactionType::AdjustmentOut => "adjustment_out",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "sale" => Some(TransactionType::Sale),
            "return" => Some(TransactionType::Return),
            "waste" => Some(TransactionType::Waste),
            "adjustment_in" => Some(TransactionType::AdjustmentIn),
            "adjustment_out" => Some(TransactionType::AdjustmentOut),
            _ => None,
        }
    }

    /// Whether this movement adds stock to the batch or removes it
    pub fn direction(&self) -> MovementDirection {
        match self {
            TransactionType::Return | TransactionType::AdjustmentIn => MovementDirection::In,
            TransactionType::Sale | TransactionType::Waste | TransactionType::AdjustmentOut => {
                MovementDirection::Out
            }
        }
    }
}

/// Movement direction derived from the transaction type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementDirection {
    In,
    Out,
}

impl MovementDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementDirection::In => "in",
            MovementDirection::Out => "out",
        }
    }
}

/// An immutable ledger entry explaining one change to a batch's quantity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockTransaction {
    pub id: Uuid,
    pub batch_id: Uuid,
    /// Links a sale to the order that consumed the stock
    pub order_id: Option<String>,
    /// Magnitude of the movement, always positive
    pub quantity: i64,
    pub transaction_type: TransactionType,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_type_round_trip() {
        for t in [
            TransactionType::Sale,
            TransactionType::Return,
            TransactionType::Waste,
            TransactionType::AdjustmentIn,
            TransactionType::AdjustmentOut,
        ] {
            assert_eq!(TransactionType::from_str(t.as_str()), Some(t));
        }
        assert_eq!(TransactionType::from_str("adjustment"), None);
    }

    #[test]
    fn test_transaction_directions() {
        assert_eq!(TransactionType::Sale.direction(), MovementDirection::Out);
        assert_eq!(TransactionType::Waste.direction(), MovementDirection::Out);
        assert_eq!(
            TransactionType::AdjustmentOut.direction(),
            MovementDirection::Out
        );
        assert_eq!(TransactionType::Return.direction(), MovementDirection::In);
        assert_eq!(
            TransactionType::AdjustmentIn.direction(),
            MovementDirection::In
        );
    }
}
