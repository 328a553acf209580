//! Consumption planning service
//!
//! Computes which batches an order should draw from, without recording
//! anything. The plan is advisory: callers turn it into ledger entries
//! one batch at a time, and the ledger re-validates each deduction.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::{BatchService, CatalogService};
use shared::allocation::{plan_consumption, BatchAllocation};
use shared::validation::validate_transaction_quantity;

#[derive(Clone)]
pub struct AllocationService {
    db: PgPool,
}

/// Input for planning a consumption
#[derive(Debug, Deserialize)]
pub struct PlanConsumptionInput {
    pub quantity: i64,
}

/// A consumption plan covering the full requested quantity
#[derive(Debug, Serialize)]
pub struct AllocationPlan {
    pub product_id: Uuid,
    pub quantity_requested: i64,
    /// Consumption order applied: oldest-first when true, newest-first otherwise
    pub use_fifo: bool,
    pub allocations: Vec<BatchAllocation>,
}

impl AllocationService {
    /// Create a new AllocationService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Plan which batches to draw a quantity from, per the product's
    /// consumption policy. Fails with the shortfall when the product's
    /// total stock cannot cover the request; a partial plan is never
    /// returned.
    pub async fn select_batches_to_consume(
        &self,
        product_id: Uuid,
        input: PlanConsumptionInput,
    ) -> AppResult<AllocationPlan> {
        if let Err(message) = validate_transaction_quantity(input.quantity) {
            return Err(AppError::Validation {
                field: "quantity".to_string(),
                message: message.to_string(),
            });
        }

        let catalog = CatalogService::new(self.db.clone());
        let policy = catalog.get_policy(product_id).await?;

        let batches = BatchService::new(self.db.clone())
            .list_batches_for_product(product_id)
            .await?;

        let allocations = plan_consumption(&batches, input.quantity, policy.use_fifo)?;

        Ok(AllocationPlan {
            product_id,
            quantity_requested: input.quantity,
            use_fifo: policy.use_fifo,
            allocations,
        })
    }
}
