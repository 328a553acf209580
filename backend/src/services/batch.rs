//! Batch repository service
//!
//! CRUD over batch records scoped by product. The `quantity` column is
//! owned by the transaction ledger once a batch has recorded movements;
//! this service only touches it at creation and for pre-ledger corrections.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::Batch;
use shared::validation::{
    validate_batch_number, validate_expiry_after_received, validate_expiry_fields,
    validate_initial_quantity,
};

/// Batch service for managing received lots of a product
#[derive(Clone)]
pub struct BatchService {
    db: PgPool,
}

/// Database row for a batch
#[derive(Debug, FromRow)]
struct BatchRow {
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

impl From<BatchRow> for Batch {
    fn from(row: BatchRow) -> Self {
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

const BATCH_COLUMNS: &str = "id, product_id, batch_number, quantity, received_date, has_expiry, \
                             expiry_date, notes, created_at, updated_at";

/// Input for creating a batch
#[derive(Debug, Deserialize)]
pub struct CreateBatchInput {
    pub product_id: Uuid,
    pub batch_number: String,
    pub quantity: i64,
    pub received_date: NaiveDate,
    #[serde(default)]
    pub has_expiry: bool,
    pub expiry_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Input for updating the non-ledger fields of a batch
///
/// `quantity` is accepted only while the batch has no transactions; after
/// that every quantity change must go through the ledger.
#[derive(Debug, Deserialize)]
pub struct UpdateBatchInput {
    pub batch_number: Option<String>,
    pub quantity: Option<i64>,
    pub received_date: Option<NaiveDate>,
    pub has_expiry: Option<bool>,
    pub expiry_date: Option<NaiveDate>,
    /// `null` clears the notes; omitting the field leaves them unchanged
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
}

/// Distinguishes an absent field (outer `None`) from an explicit `null`
/// (`Some(None)`)
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Decide whether an update may write `quantity` directly.
///
/// Only a batch with an empty ledger may be corrected this way; once
/// entries exist the ledger is the single writer of the balance, so the
/// update must leave the column untouched.
fn quantity_correction(
    requested: Option<i64>,
    current: i64,
    ledger_entries: i64,
) -> AppResult<Option<i64>> {
    match requested {
        Some(quantity) if quantity != current => {
            if ledger_entries > 0 {
                return Err(AppError::Consistency(
                    "Batch quantity cannot be set directly once transactions exist; \
                     record an adjustment transaction instead"
                        .to_string(),
                ));
            }
            if let Err(message) = validate_initial_quantity(quantity) {
                return Err(AppError::Validation {
                    field: "quantity".to_string(),
                    message: message.to_string(),
                });
            }
            Ok(Some(quantity))
        }
        _ => Ok(None),
    }
}

impl BatchService {
    /// Create a new BatchService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Register a newly received batch
    pub async fn create_batch(&self, input: CreateBatchInput) -> AppResult<Batch> {
        if let Err(message) = validate_batch_number(&input.batch_number) {
            return Err(AppError::Validation {
                field: "batch_number".to_string(),
                message: message.to_string(),
            });
        }
        if let Err(message) = validate_initial_quantity(input.quantity) {
            return Err(AppError::Validation {
                field: "quantity".to_string(),
                message: message.to_string(),
            });
        }
        if let Err(message) = validate_expiry_fields(input.has_expiry, input.expiry_date) {
            return Err(AppError::Validation {
                field: "expiry_date".to_string(),
                message: message.to_string(),
            });
        }
        if let Some(expiry_date) = input.expiry_date {
            if let Err(message) = validate_expiry_after_received(input.received_date, expiry_date) {
                return Err(AppError::Validation {
                    field: "expiry_date".to_string(),
                    message: message.to_string(),
                });
            }
        }

        let row = sqlx::query_as::<_, BatchRow>(&format!(
            r#"
            INSERT INTO batches (product_id, batch_number, quantity, received_date, has_expiry, expiry_date, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {BATCH_COLUMNS}
            "#,
        ))
        .bind(input.product_id)
        .bind(input.batch_number.trim())
        .bind(input.quantity)
        .bind(input.received_date)
        .bind(input.has_expiry)
        .bind(input.expiry_date)
        .bind(&input.notes)
        .fetch_one(&self.db)
        .await?;

        tracing::debug!(batch_id = %row.id, product_id = %row.product_id, "Created batch");
        Ok(row.into())
    }

    /// Get a batch by ID
    pub async fn get_batch(&self, batch_id: Uuid) -> AppResult<Batch> {
        let row = sqlx::query_as::<_, BatchRow>(&format!(
            "SELECT {BATCH_COLUMNS} FROM batches WHERE id = $1"
        ))
        .bind(batch_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Batch".to_string()))?;

        Ok(row.into())
    }

    /// All batches of a product, oldest received first (the FIFO basis)
    pub async fn list_batches_for_product(&self, product_id: Uuid) -> AppResult<Vec<Batch>> {
        let rows = sqlx::query_as::<_, BatchRow>(&format!(
            r#"
            SELECT {BATCH_COLUMNS}
            FROM batches
            WHERE product_id = $1
            ORDER BY received_date ASC, created_at ASC
            "#,
        ))
        .bind(product_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Batch::from).collect())
    }

    /// Update the non-ledger fields of a batch.
    ///
    /// Runs under a row lock so it serializes with the ledger: a sale
    /// committing concurrently cannot be overwritten by a stale read here.
    /// `quantity` stays out of the UPDATE entirely unless the pre-ledger
    /// correction branch applies.
    pub async fn update_batch(&self, batch_id: Uuid, input: UpdateBatchInput) -> AppResult<Batch> {
        if let Some(ref batch_number) = input.batch_number {
            if let Err(message) = validate_batch_number(batch_number) {
                return Err(AppError::Validation {
                    field: "batch_number".to_string(),
                    message: message.to_string(),
                });
            }
        }

        let mut tx = self.db.begin().await?;

        let existing: Batch = sqlx::query_as::<_, BatchRow>(&format!(
            "SELECT {BATCH_COLUMNS} FROM batches WHERE id = $1 FOR UPDATE"
        ))
        .bind(batch_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Batch".to_string()))?
        .into();

        let references: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM batch_transactions WHERE batch_id = $1")
                .bind(batch_id)
                .fetch_one(&mut *tx)
                .await?;

        let corrected = quantity_correction(input.quantity, existing.quantity, references)?;

        let batch_number = input
            .batch_number
            .map(|n| n.trim().to_string())
            .unwrap_or(existing.batch_number);
        let received_date = input.received_date.unwrap_or(existing.received_date);
        let has_expiry = input.has_expiry.unwrap_or(existing.has_expiry);
        let expiry_date = if has_expiry {
            input.expiry_date.or(existing.expiry_date)
        } else {
            None
        };
        let notes = match input.notes {
            Some(value) => value,
            None => existing.notes,
        };

        if let Err(message) = validate_expiry_fields(has_expiry, expiry_date) {
            return Err(AppError::Validation {
                field: "expiry_date".to_string(),
                message: message.to_string(),
            });
        }
        if let Some(expiry) = expiry_date {
            if let Err(message) = validate_expiry_after_received(received_date, expiry) {
                return Err(AppError::Validation {
                    field: "expiry_date".to_string(),
                    message: message.to_string(),
                });
            }
        }

        let row = sqlx::query_as::<_, BatchRow>(&format!(
            r#"
            UPDATE batches
            SET batch_number = $1, quantity = COALESCE($2, quantity), received_date = $3,
                has_expiry = $4, expiry_date = $5, notes = $6, updated_at = NOW()
            WHERE id = $7
            RETURNING {BATCH_COLUMNS}
            "#,
        ))
        .bind(&batch_number)
        .bind(corrected)
        .bind(received_date)
        .bind(has_expiry)
        .bind(expiry_date)
        .bind(&notes)
        .bind(batch_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(row.into())
    }

    /// Delete a batch.
    ///
    /// A batch with ledger entries is part of the audit trail; deleting it
    /// is rejected unless `force` is set, in which case the entries are
    /// removed with it. The reference count is taken under the same row
    /// lock the ledger uses, so a transaction recorded concurrently cannot
    /// slip past the check.
    pub async fn delete_batch(&self, batch_id: Uuid, force: bool) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        // Lock the row; also gives a clean 404 instead of a silent no-op
        sqlx::query_scalar::<_, i64>("SELECT quantity FROM batches WHERE id = $1 FOR UPDATE")
            .bind(batch_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Batch".to_string()))?;

        let references: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM batch_transactions WHERE batch_id = $1")
                .bind(batch_id)
                .fetch_one(&mut *tx)
                .await?;
        if references > 0 && !force {
            return Err(AppError::Conflict {
                resource: "Batch".to_string(),
                message: format!(
                    "{} transactions reference this batch; pass force=true to delete them as well",
                    references
                ),
            });
        }

        sqlx::query("DELETE FROM batch_transactions WHERE batch_id = $1")
            .bind(batch_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM batches WHERE id = $1")
            .bind(batch_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(batch_id = %batch_id, cascaded = references, "Deleted batch");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_untouched_unless_corrected() {
        // Not supplied, or supplied unchanged: nothing is written, so a
        // concurrent ledger commit keeps its balance
        assert_eq!(quantity_correction(None, 10, 5).unwrap(), None);
        assert_eq!(quantity_correction(Some(10), 10, 5).unwrap(), None);

        // Pre-ledger correction is allowed
        assert_eq!(quantity_correction(Some(7), 10, 0).unwrap(), Some(7));
    }

    #[test]
    fn test_correction_blocked_once_ledger_exists() {
        let err = quantity_correction(Some(7), 10, 1).unwrap_err();
        assert!(matches!(err, AppError::Consistency(_)));
    }

    #[test]
    fn test_correction_rejects_negative_quantity() {
        let err = quantity_correction(Some(-1), 10, 0).unwrap_err();
        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[test]
    fn test_update_notes_null_clears_absent_keeps() {
        let input: UpdateBatchInput = serde_json::from_str(r#"{"notes": null}"#).unwrap();
        assert_eq!(input.notes, Some(None));

        let input: UpdateBatchInput = serde_json::from_str("{}").unwrap();
        assert_eq!(input.notes, None);

        let input: UpdateBatchInput = serde_json::from_str(r#"{"notes": "gift wrap"}"#).unwrap();
        assert_eq!(input.notes, Some(Some("gift wrap".to_string())));
    }
}
