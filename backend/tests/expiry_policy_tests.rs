//! Expiry window and alert predicate tests
//!
//! Policy-level behavior: how a product's stored (or defaulted) policy
//! shapes the expiry status of its batches and the alert feeds.

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use shared::alerts::{is_expiring_soon, is_low_stock};
use shared::expiry::{batch_expiry_status, ExpiryStatus};
use shared::models::{Batch, ProductPolicy, DEFAULT_EXPIRY_NOTIFICATION_DAYS};
use uuid::Uuid;

fn perishable(number: &str, quantity: i64, expiry: NaiveDate) -> Batch {
    Batch {
        id: Uuid::new_v4(),
        product_id: Uuid::new_v4(),
        batch_number: number.to_string(),
        quantity,
        received_date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
        has_expiry: true,
        expiry_date: Some(expiry),
        notes: None,
        created_at: Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap(),
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 4, 1).unwrap()
}

mod unit_tests {
    use super::*;

    #[test]
    fn test_default_policy_window_drives_status() {
        let policy = ProductPolicy::defaults(Uuid::new_v4());
        assert_eq!(policy.expiry_notification_days, DEFAULT_EXPIRY_NOTIFICATION_DAYS);

        let inside = perishable("IN", 10, today() + Duration::days(30));
        let outside = perishable("OUT", 10, today() + Duration::days(31));

        assert_eq!(
            batch_expiry_status(&inside, policy.expiry_notification_days, today()),
            ExpiryStatus::ExpiringSoon { days_remaining: 30 }
        );
        assert_eq!(
            batch_expiry_status(&outside, policy.expiry_notification_days, today()),
            ExpiryStatus::Healthy { days_remaining: 31 }
        );
    }

    #[test]
    fn test_custom_window_shrinks_alerts() {
        let batch = perishable("B", 10, today() + Duration::days(10));

        let wide = batch_expiry_status(&batch, 14, today());
        assert!(is_expiring_soon(wide));

        let narrow = batch_expiry_status(&batch, 7, today());
        assert!(!is_expiring_soon(narrow));
    }

    #[test]
    fn test_expired_batches_keep_alerting() {
        let batch = perishable("OLD", 3, today() - Duration::days(14));
        let status = batch_expiry_status(&batch, 7, today());
        assert_eq!(status, ExpiryStatus::Expired { days_past: 14 });
        assert!(is_expiring_soon(status));
    }

    #[test]
    fn test_non_perishable_never_alerts() {
        let batch = Batch {
            has_expiry: false,
            expiry_date: None,
            ..perishable("DRY", 10, today())
        };
        let status = batch_expiry_status(&batch, 30, today());
        assert_eq!(status, ExpiryStatus::NoExpiry);
        assert!(!is_expiring_soon(status));
    }

    #[test]
    fn test_low_stock_uses_inclusive_threshold() {
        let policy = ProductPolicy {
            minimum_stock: 12,
            ..ProductPolicy::defaults(Uuid::new_v4())
        };
        assert!(is_low_stock(policy.minimum_stock, 12));
        assert!(is_low_stock(policy.minimum_stock, 0));
        assert!(!is_low_stock(policy.minimum_stock, 13));
    }

    #[test]
    fn test_configured_minimum_alerts_with_no_batches() {
        // A product can carry a policy row while owning no batches at all
        // (e.g. after a forced delete); zero on hand must still alert
        let policy = ProductPolicy {
            minimum_stock: 5,
            ..ProductPolicy::defaults(Uuid::new_v4())
        };
        assert!(is_low_stock(policy.minimum_stock, 0));
    }

    #[test]
    fn test_unconfigured_product_alerts_only_when_empty() {
        let policy = ProductPolicy::defaults(Uuid::new_v4());
        assert_eq!(policy.minimum_stock, 0);
        assert!(is_low_stock(policy.minimum_stock, 0));
        assert!(!is_low_stock(policy.minimum_stock, 1));
    }
}

mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// A batch alerts exactly when its expiry date is at most
        /// `window` days out (including past dates).
        #[test]
        fn prop_alert_matches_window(
            offset in -60i64..120,
            window in 0i64..60,
        ) {
            let batch = perishable("P", 5, today() + Duration::days(offset));
            let status = batch_expiry_status(&batch, window, today());
            prop_assert_eq!(is_expiring_soon(status), offset <= window);
        }

        /// Status partitions: exactly one variant per date, and the day
        /// counts agree with the offset.
        #[test]
        fn prop_status_day_counts(offset in -60i64..120) {
            let batch = perishable("P", 5, today() + Duration::days(offset));
            match batch_expiry_status(&batch, 30, today()) {
                ExpiryStatus::Expired { days_past } => {
                    prop_assert!(offset < 0);
                    prop_assert_eq!(days_past, -offset);
                }
                ExpiryStatus::ExpiringSoon { days_remaining } => {
                    prop_assert!((0..=30).contains(&offset));
                    prop_assert_eq!(days_remaining, offset);
                }
                ExpiryStatus::Healthy { days_remaining } => {
                    prop_assert!(offset > 30);
                    prop_assert_eq!(days_remaining, offset);
                }
                ExpiryStatus::NoExpiry => prop_assert!(false, "perishable batch lost its date"),
            }
        }
    }
}
