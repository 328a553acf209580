//! Alerting predicates
//!
//! Pure conditions consumed by the external notification dispatcher.
//! Scheduling and delivery are not this crate's concern.

use crate::expiry::ExpiryStatus;

/// Low-stock condition: total stock at or below the product's threshold.
/// A threshold of 0 means "alert only when the product is out of stock".
pub fn is_low_stock(minimum_stock: i64, total_stock: i64) -> bool {
    total_stock <= minimum_stock
}

/// Expiry alert condition: expired batches keep alerting until handled
pub fn is_expiring_soon(status: ExpiryStatus) -> bool {
    matches!(
        status,
        ExpiryStatus::Expired { .. } | ExpiryStatus::ExpiringSoon { .. }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_low_stock_boundary() {
        assert!(is_low_stock(5, 5));
        assert!(is_low_stock(5, 4));
        assert!(!is_low_stock(5, 6));
    }

    #[test]
    fn test_low_stock_default_threshold() {
        // Default threshold of 0 alerts only at zero
        assert!(is_low_stock(0, 0));
        assert!(!is_low_stock(0, 1));
    }

    #[test]
    fn test_expiry_alert_conditions() {
        assert!(is_expiring_soon(ExpiryStatus::Expired { days_past: 3 }));
        assert!(is_expiring_soon(ExpiryStatus::ExpiringSoon { days_remaining: 7 }));
        assert!(!is_expiring_soon(ExpiryStatus::Healthy { days_remaining: 90 }));
        assert!(!is_expiring_soon(ExpiryStatus::NoExpiry));
    }

    proptest! {
        /// Alert triggers exactly when stock <= threshold, never otherwise
        #[test]
        fn prop_low_stock_no_false_positive(
            threshold in 0i64..1_000,
            extra in 1i64..1_000,
        ) {
            prop_assert!(!is_low_stock(threshold, threshold + extra));
            prop_assert!(is_low_stock(threshold, threshold));
        }
    }
}
