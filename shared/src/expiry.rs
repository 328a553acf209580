//! Expiry status derivation for batches

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::Batch;

/// Expiry status of a batch relative to a reference date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExpiryStatus {
    /// Batch does not carry an expiry date
    NoExpiry,
    /// Expiry date is in the past
    Expired { days_past: i64 },
    /// Expiry date falls within the notification window
    ExpiringSoon { days_remaining: i64 },
    Healthy { days_remaining: i64 },
}

impl std::fmt::Display for ExpiryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpiryStatus::NoExpiry => write!(f, "No Expiry"),
            ExpiryStatus::Expired { days_past } => write!(f, "Expired {} days ago", days_past),
            ExpiryStatus::ExpiringSoon { days_remaining } => {
                write!(f, "Expiring in {} days", days_remaining)
            }
            ExpiryStatus::Healthy { days_remaining } => {
                write!(f, "Healthy ({} days remaining)", days_remaining)
            }
        }
    }
}

/// Whole days from `today` until `expiry_date`; negative once past
pub fn days_until(expiry_date: NaiveDate, today: NaiveDate) -> i64 {
    (expiry_date - today).num_days()
}

/// Derive the expiry status for an optional expiry date.
///
/// The boundary is inclusive on both ends of the notification window:
/// a batch expiring exactly `notification_days` from today is already
/// `ExpiringSoon`, and one expiring today is `ExpiringSoon` with zero
/// days remaining rather than `Expired`.
pub fn expiry_status(
    has_expiry: bool,
    expiry_date: Option<NaiveDate>,
    notification_days: i64,
    today: NaiveDate,
) -> ExpiryStatus {
    let expiry = match (has_expiry, expiry_date) {
        (true, Some(date)) => date,
        _ => return ExpiryStatus::NoExpiry,
    };

    let days_remaining = days_until(expiry, today);
    if days_remaining < 0 {
        ExpiryStatus::Expired {
            days_past: -days_remaining,
        }
    } else if days_remaining <= notification_days {
        ExpiryStatus::ExpiringSoon { days_remaining }
    } else {
        ExpiryStatus::Healthy { days_remaining }
    }
}

/// Expiry status for a batch
pub fn batch_expiry_status(batch: &Batch, notification_days: i64, today: NaiveDate) -> ExpiryStatus {
    expiry_status(batch.has_expiry, batch.expiry_date, notification_days, today)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    #[test]
    fn test_no_expiry() {
        assert_eq!(expiry_status(false, None, 30, today()), ExpiryStatus::NoExpiry);
        // Flag without a date degrades to NoExpiry rather than panicking
        assert_eq!(expiry_status(true, None, 30, today()), ExpiryStatus::NoExpiry);
    }

    #[test]
    fn test_expired_yesterday() {
        let status = expiry_status(true, Some(today() - Duration::days(1)), 30, today());
        assert_eq!(status, ExpiryStatus::Expired { days_past: 1 });
    }

    #[test]
    fn test_expiring_today() {
        let status = expiry_status(true, Some(today()), 30, today());
        assert_eq!(status, ExpiryStatus::ExpiringSoon { days_remaining: 0 });
    }

    #[test]
    fn test_window_boundary_inclusive() {
        // Exactly notification_days out is still ExpiringSoon
        let status = expiry_status(true, Some(today() + Duration::days(30)), 30, today());
        assert_eq!(status, ExpiryStatus::ExpiringSoon { days_remaining: 30 });

        // One day further is Healthy
        let status = expiry_status(true, Some(today() + Duration::days(31)), 30, today());
        assert_eq!(status, ExpiryStatus::Healthy { days_remaining: 31 });
    }

    #[test]
    fn test_zero_notification_window() {
        // notification_days = 0 alerts only on the expiry day itself
        let status = expiry_status(true, Some(today()), 0, today());
        assert_eq!(status, ExpiryStatus::ExpiringSoon { days_remaining: 0 });

        let status = expiry_status(true, Some(today() + Duration::days(1)), 0, today());
        assert_eq!(status, ExpiryStatus::Healthy { days_remaining: 1 });
    }
}
