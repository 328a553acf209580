//! Balance arithmetic for stock movements
//!
//! The ledger invariant lives here: a batch quantity never goes negative,
//! and every change to it is explained by exactly one transaction.

use serde::Serialize;
use thiserror::Error;

use crate::models::{MovementDirection, TransactionType};

/// A deduction exceeded the available quantity
///
/// Carries the shortfall so callers can display it or retry with a reduced
/// quantity; the ledger never clamps a request to "whatever is available".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[error("insufficient stock: requested {requested}, available {available} (short {shortfall})")]
pub struct InsufficientStock {
    pub requested: i64,
    pub available: i64,
    pub shortfall: i64,
}

impl InsufficientStock {
    pub fn new(requested: i64, available: i64) -> Self {
        Self {
            requested,
            available,
            shortfall: requested - available,
        }
    }
}

/// Apply one movement to a batch balance and return the new balance.
///
/// Inbound movements (`return`, `adjustment_in`) may exceed the current
/// balance without limit; they represent restocking. Outbound movements
/// fail with the shortfall when they would drive the balance negative.
pub fn apply_movement(
    balance: i64,
    transaction_type: TransactionType,
    quantity: i64,
) -> Result<i64, InsufficientStock> {
    match transaction_type.direction() {
        MovementDirection::In => Ok(balance + quantity),
        MovementDirection::Out => {
            if quantity > balance {
                Err(InsufficientStock::new(quantity, balance))
            } else {
                Ok(balance - quantity)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_sale_deducts() {
        assert_eq!(apply_movement(10, TransactionType::Sale, 4), Ok(6));
    }

    #[test]
    fn test_return_restocks_beyond_balance() {
        assert_eq!(apply_movement(0, TransactionType::Return, 25), Ok(25));
    }

    #[test]
    fn test_waste_cannot_overdraw() {
        let err = apply_movement(6, TransactionType::Waste, 10).unwrap_err();
        assert_eq!(err.requested, 10);
        assert_eq!(err.available, 6);
        assert_eq!(err.shortfall, 4);
    }

    #[test]
    fn test_exact_depletion() {
        assert_eq!(apply_movement(5, TransactionType::AdjustmentOut, 5), Ok(0));
    }

    proptest! {
        /// Conservation: replaying any accepted sequence of movements yields
        /// initial + sum(in) - sum(out), and the balance never goes negative.
        #[test]
        fn prop_conservation(
            initial in 0i64..10_000,
            movements in prop::collection::vec(
                (
                    prop_oneof![
                        Just(TransactionType::Sale),
                        Just(TransactionType::Return),
                        Just(TransactionType::Waste),
                        Just(TransactionType::AdjustmentIn),
                        Just(TransactionType::AdjustmentOut),
                    ],
                    1i64..500,
                ),
                0..30,
            )
        ) {
            let mut balance = initial;
            let mut total_in = 0i64;
            let mut total_out = 0i64;

            for (transaction_type, quantity) in movements {
                match apply_movement(balance, transaction_type, quantity) {
                    Ok(next) => {
                        balance = next;
                        match transaction_type.direction() {
                            MovementDirection::In => total_in += quantity,
                            MovementDirection::Out => total_out += quantity,
                        }
                    }
                    Err(err) => {
                        // Rejected movements leave the balance untouched
                        prop_assert_eq!(err.available, balance);
                        prop_assert_eq!(err.shortfall, err.requested - balance);
                    }
                }
                prop_assert!(balance >= 0);
            }

            prop_assert_eq!(balance, initial + total_in - total_out);
        }
    }
}
