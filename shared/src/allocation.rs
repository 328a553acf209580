//! Consumption planning: which batches cover a deduction
//!
//! Invoked when a caller wants to deduct N units of a product without
//! naming a batch. The planner returns an allocation plan; it never records
//! transactions itself, so each leg of the plan stays individually
//! attributable when the caller replays it through the ledger.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Batch;
use crate::movement::InsufficientStock;

/// One leg of a consumption plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchAllocation {
    pub batch_id: Uuid,
    pub batch_number: String,
    /// Units to take from this batch
    pub quantity: i64,
}

/// Greedily allocate `quantity_needed` units across the product's batches.
///
/// Candidates are ordered by `received_date` ascending when `use_fifo` is
/// true (oldest first), descending otherwise, with `created_at` breaking
/// ties. Depleted batches are skipped. Fails with the shortfall when total
/// available stock cannot cover the request; a plan is only ever returned
/// in full.
pub fn plan_consumption(
    batches: &[Batch],
    quantity_needed: i64,
    use_fifo: bool,
) -> Result<Vec<BatchAllocation>, InsufficientStock> {
    if quantity_needed <= 0 {
        return Ok(Vec::new());
    }

    let available: i64 = batches.iter().map(|b| b.quantity).sum();
    if available < quantity_needed {
        return Err(InsufficientStock::new(quantity_needed, available));
    }

    let mut candidates: Vec<&Batch> = batches.iter().filter(|b| b.quantity > 0).collect();
    candidates.sort_by(|a, b| {
        let ordering = a
            .received_date
            .cmp(&b.received_date)
            .then(a.created_at.cmp(&b.created_at));
        if use_fifo {
            ordering
        } else {
            ordering.reverse()
        }
    });

    let mut plan = Vec::new();
    let mut remaining = quantity_needed;
    for batch in candidates {
        if remaining == 0 {
            break;
        }
        let take = remaining.min(batch.quantity);
        plan.push(BatchAllocation {
            batch_id: batch.id,
            batch_number: batch.batch_number.clone(),
            quantity: take,
        });
        remaining -= take;
    }

    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn batch(number: &str, quantity: i64, received: NaiveDate) -> Batch {
        Batch {
            id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            batch_number: number.to_string(),
            quantity,
            received_date: received,
            has_expiry: false,
            expiry_date: None,
            notes: None,
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap(),
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, d).unwrap()
    }

    #[test]
    fn test_fifo_splits_across_batches() {
        let batches = vec![batch("B1", 5, day(1)), batch("B2", 5, day(2))];
        let plan = plan_consumption(&batches, 7, true).unwrap();

        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].batch_number, "B1");
        assert_eq!(plan[0].quantity, 5);
        assert_eq!(plan[1].batch_number, "B2");
        assert_eq!(plan[1].quantity, 2);
    }

    #[test]
    fn test_lifo_reverses_order() {
        let batches = vec![batch("B1", 5, day(1)), batch("B2", 5, day(2))];
        let plan = plan_consumption(&batches, 7, false).unwrap();

        assert_eq!(plan[0].batch_number, "B2");
        assert_eq!(plan[0].quantity, 5);
        assert_eq!(plan[1].batch_number, "B1");
        assert_eq!(plan[1].quantity, 2);
    }

    #[test]
    fn test_shortfall_rejected_whole() {
        let batches = vec![batch("B1", 5, day(1)), batch("B2", 5, day(2))];
        let err = plan_consumption(&batches, 11, true).unwrap_err();

        assert_eq!(err.requested, 11);
        assert_eq!(err.available, 10);
        assert_eq!(err.shortfall, 1);
    }

    #[test]
    fn test_depleted_batches_skipped() {
        let batches = vec![
            batch("EMPTY", 0, day(1)),
            batch("B1", 4, day(2)),
            batch("B2", 4, day(3)),
        ];
        let plan = plan_consumption(&batches, 6, true).unwrap();

        assert_eq!(plan.len(), 2);
        assert!(plan.iter().all(|leg| leg.batch_number != "EMPTY"));
    }

    #[test]
    fn test_single_batch_covers_request() {
        let batches = vec![batch("B1", 10, day(1)), batch("B2", 10, day(2))];
        let plan = plan_consumption(&batches, 10, true).unwrap();

        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].batch_number, "B1");
        assert_eq!(plan[0].quantity, 10);
    }

    #[test]
    fn test_zero_request_yields_empty_plan() {
        let batches = vec![batch("B1", 5, day(1))];
        assert!(plan_consumption(&batches, 0, true).unwrap().is_empty());
    }
}
