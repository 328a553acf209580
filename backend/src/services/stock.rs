//! Stock aggregation service
//!
//! Read-side views over batches: product stock totals, per-batch expiry
//! status, and the expiring-batches feed. All expiry math happens in
//! `shared::expiry` against the server's current date.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::CatalogService;
use shared::expiry::{expiry_status, ExpiryStatus};
use shared::models::Batch;

#[derive(Clone)]
pub struct StockService {
    db: PgPool,
}

/// A batch annotated with its expiry status
#[derive(Debug, Serialize)]
pub struct BatchStock {
    #[serde(flatten)]
    pub batch: Batch,
    pub expiry_status: ExpiryStatus,
}

/// Aggregated stock view for one product
#[derive(Debug, Serialize)]
pub struct ProductStock {
    pub product_id: Uuid,
    pub total_stock: i64,
    pub batches: Vec<BatchStock>,
}

/// A batch surfaced by the expiring-batches feed
#[derive(Debug, FromRow, Serialize)]
pub struct ExpiringBatch {
    pub id: Uuid,
    pub product_id: Uuid,
    pub batch_number: String,
    pub quantity: i64,
    pub expiry_date: NaiveDate,
    /// Negative once the batch is past its expiry date
    pub days_until_expiry: i32,
}

impl StockService {
    /// Create a new StockService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Total on-hand stock for a product across all its batches
    pub async fn total_stock(&self, product_id: Uuid) -> AppResult<i64> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(quantity), 0)::BIGINT FROM batches WHERE product_id = $1",
        )
        .bind(product_id)
        .fetch_one(&self.db)
        .await?;
        Ok(total)
    }

    /// Stock view for a product: total plus every batch with its expiry
    /// status, oldest received first
    pub async fn product_stock(&self, product_id: Uuid) -> AppResult<ProductStock> {
        let catalog = CatalogService::new(self.db.clone());
        let policy = catalog.get_policy(product_id).await?;

        let rows = sqlx::query_as::<_, BatchListRow>(
            r#"
            SELECT id, product_id, batch_number, quantity, received_date, has_expiry,
                   expiry_date, notes, created_at, updated_at
            FROM batches
            WHERE product_id = $1
            ORDER BY received_date ASC, created_at ASC
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.db)
        .await?;

        let today = Utc::now().date_naive();
        let mut total_stock = 0;
        let batches = rows
            .into_iter()
            .map(|row| {
                let batch = Batch::from(row);
                total_stock += batch.quantity;
                let status = expiry_status(
                    batch.has_expiry,
                    batch.expiry_date,
                    policy.expiry_notification_days,
                    today,
                );
                BatchStock {
                    batch,
                    expiry_status: status,
                }
            })
            .collect();

        Ok(ProductStock {
            product_id,
            total_stock,
            batches,
        })
    }

    /// Batches whose expiry date falls within the next `days` days.
    ///
    /// Already-expired batches still holding stock are included: they need
    /// attention more urgently than ones merely approaching expiry. Depleted
    /// batches are skipped. Soonest expiry first.
    pub async fn batches_expiring_within(&self, days: i32) -> AppResult<Vec<ExpiringBatch>> {
        let rows = sqlx::query_as::<_, ExpiringBatch>(
            r#"
            SELECT id, product_id, batch_number, quantity, expiry_date,
                   (expiry_date - CURRENT_DATE)::INT AS days_until_expiry
            FROM batches
            WHERE has_expiry
              AND expiry_date IS NOT NULL
              AND quantity > 0
              AND expiry_date <= CURRENT_DATE + $1
            ORDER BY expiry_date ASC, batch_number ASC
            "#,
        )
        .bind(days)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }
}

#[derive(Debug, FromRow)]
struct BatchListRow {
    id: Uuid,
    product_id: Uuid,
    batch_number: String,
    quantity: i64,
    received_date: NaiveDate,
    has_expiry: bool,
    expiry_date: Option<NaiveDate>,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<BatchListRow> for Batch {
    fn from(row: BatchListRow) -> Self {
        Batch {
            id: row.id,
            product_id: row.product_id,
            batch_number: row.batch_number,
            quantity: row.quantity,
            received_date: row.received_date,
            has_expiry: row.has_expiry,
            expiry_date: row.expiry_date,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
