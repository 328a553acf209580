//! Product policy projection
//!
//! The storefront owns the product catalog; this crate only keeps the
//! per-product inventory policy (expiry window, consumption order,
//! minimum stock). Products without a stored row fall back to defaults.

use serde::Deserialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::ProductPolicy;
use shared::validation::{validate_minimum_stock, validate_notification_days};

#[derive(Clone)]
pub struct CatalogService {
    db: PgPool,
}

#[derive(Debug, FromRow)]
struct PolicyRow {
    product_id: Uuid,
    has_expiry: bool,
    expiry_notification_days: i64,
    use_fifo: bool,
    minimum_stock: i64,
}

impl From<PolicyRow> for ProductPolicy {
    fn from(row: PolicyRow) -> Self {
        ProductPolicy {
            product_id: row.product_id,
            has_expiry: row.has_expiry,
            expiry_notification_days: row.expiry_notification_days,
            use_fifo: row.use_fifo,
            minimum_stock: row.minimum_stock,
        }
    }
}

/// Input for storing a product's inventory policy
#[derive(Debug, Deserialize)]
pub struct UpsertPolicyInput {
    #[serde(default)]
    pub has_expiry: bool,
    pub expiry_notification_days: Option<i64>,
    pub use_fifo: Option<bool>,
    pub minimum_stock: Option<i64>,
}

impl CatalogService {
    /// Create a new CatalogService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Policy for a product, defaulted when none is stored
    pub async fn get_policy(&self, product_id: Uuid) -> AppResult<ProductPolicy> {
        let row = sqlx::query_as::<_, PolicyRow>(
            r#"
            SELECT product_id, has_expiry, expiry_notification_days, use_fifo, minimum_stock
            FROM product_policies
            WHERE product_id = $1
            "#,
        )
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row
            .map(ProductPolicy::from)
            .unwrap_or_else(|| ProductPolicy::defaults(product_id)))
    }

    /// Store or replace a product's inventory policy
    pub async fn upsert_policy(
        &self,
        product_id: Uuid,
        input: UpsertPolicyInput,
    ) -> AppResult<ProductPolicy> {
        let defaults = ProductPolicy::defaults(product_id);
        let notification_days = input
            .expiry_notification_days
            .unwrap_or(defaults.expiry_notification_days);
        let use_fifo = input.use_fifo.unwrap_or(defaults.use_fifo);
        let minimum_stock = input.minimum_stock.unwrap_or(defaults.minimum_stock);

        if let Err(message) = validate_notification_days(notification_days) {
            return Err(AppError::Validation {
                field: "expiry_notification_days".to_string(),
                message: message.to_string(),
            });
        }
        if let Err(message) = validate_minimum_stock(minimum_stock) {
            return Err(AppError::Validation {
                field: "minimum_stock".to_string(),
                message: message.to_string(),
            });
        }

        let row = sqlx::query_as::<_, PolicyRow>(
            r#"
            INSERT INTO product_policies (product_id, has_expiry, expiry_notification_days, use_fifo, minimum_stock)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (product_id) DO UPDATE
            SET has_expiry = EXCLUDED.has_expiry,
                expiry_notification_days = EXCLUDED.expiry_notification_days,
                use_fifo = EXCLUDED.use_fifo,
                minimum_stock = EXCLUDED.minimum_stock,
                updated_at = NOW()
            RETURNING product_id, has_expiry, expiry_notification_days, use_fifo, minimum_stock
            "#,
        )
        .bind(product_id)
        .bind(input.has_expiry)
        .bind(notification_days)
        .bind(use_fifo)
        .bind(minimum_stock)
        .fetch_one(&self.db)
        .await?;

        tracing::debug!(product_id = %product_id, "Stored product policy");
        Ok(row.into())
    }
}
