//! Alert feed service
//!
//! Surfaces products under their minimum stock and batches inside their
//! expiry window. The predicates themselves live in `shared::alerts`;
//! this service just joins stock totals with stored policies.

use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::stock::{ExpiringBatch, StockService};
use shared::alerts::is_low_stock;

#[derive(Clone)]
pub struct AlertService {
    db: PgPool,
}

#[derive(Debug, FromRow)]
struct StockTotalRow {
    product_id: Uuid,
    total_stock: i64,
    minimum_stock: i64,
}

/// A product whose total stock is at or below its minimum
#[derive(Debug, Serialize)]
pub struct LowStockProduct {
    pub product_id: Uuid,
    pub total_stock: i64,
    pub minimum_stock: i64,
}

impl AlertService {
    /// Create a new AlertService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Products at or below their minimum stock.
    ///
    /// Products without a stored policy use the default minimum of zero,
    /// so they only alert once fully depleted. The join is full outer:
    /// a product with a policy row but no batches at all holds zero stock
    /// and must still alert.
    pub async fn low_stock_products(&self) -> AppResult<Vec<LowStockProduct>> {
        let rows = sqlx::query_as::<_, StockTotalRow>(
            r#"
            SELECT COALESCE(b.product_id, p.product_id) AS product_id,
                   COALESCE(b.total_stock, 0)::BIGINT AS total_stock,
                   COALESCE(p.minimum_stock, 0)::BIGINT AS minimum_stock
            FROM product_policies p
            FULL OUTER JOIN (
                SELECT product_id, SUM(quantity) AS total_stock
                FROM batches
                GROUP BY product_id
            ) b ON b.product_id = p.product_id
            ORDER BY 1
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows
            .into_iter()
            .filter(|row| is_low_stock(row.minimum_stock, row.total_stock))
            .map(|row| LowStockProduct {
                product_id: row.product_id,
                total_stock: row.total_stock,
                minimum_stock: row.minimum_stock,
            })
            .collect())
    }

    /// Batches expiring within the window, including already-expired ones
    /// still holding stock
    pub async fn expiring_batches(&self, window_days: i32) -> AppResult<Vec<ExpiringBatch>> {
        StockService::new(self.db.clone())
            .batches_expiring_within(window_days)
            .await
    }
}
