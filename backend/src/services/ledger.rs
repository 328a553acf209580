//! Transaction ledger service
//!
//! Append-only record of stock movements. Each entry is applied atomically
//! against its batch: the batch row is locked, the balance is re-checked
//! under the lock, and the batch quantity plus the new ledger row commit
//! together or not at all. Entries are never updated or deleted here; the
//! only way ledger rows disappear is a forced batch delete.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{StockTransaction, TransactionType};
use shared::movement::apply_movement;
use shared::types::{PaginatedResponse, Pagination, PaginationMeta};
use shared::validation::validate_transaction_quantity;

#[derive(Clone)]
pub struct LedgerService {
    db: PgPool,
}

#[derive(Debug, FromRow)]
struct TransactionRow {
    id: Uuid,
    batch_id: Uuid,
    order_id: Option<String>,
    quantity: i64,
    transaction_type: String,
    notes: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<TransactionRow> for StockTransaction {
    type Error = AppError;

    fn try_from(row: TransactionRow) -> Result<Self, Self::Error> {
        let transaction_type = TransactionType::from_str(&row.transaction_type).ok_or_else(|| {
            AppError::Internal(format!(
                "Unknown transaction type in ledger: {}",
                row.transaction_type
            ))
        })?;
        Ok(StockTransaction {
            id: row.id,
            batch_id: row.batch_id,
            order_id: row.order_id,
            quantity: row.quantity,
            transaction_type,
            notes: row.notes,
            created_at: row.created_at,
        })
    }
}

const TRANSACTION_COLUMNS: &str =
    "id, batch_id, order_id, quantity, transaction_type, notes, created_at";

/// Input for recording a stock movement against a batch
#[derive(Debug, Deserialize)]
pub struct RecordTransactionInput {
    pub batch_id: Uuid,
    pub quantity: i64,
    pub transaction_type: TransactionType,
    pub order_id: Option<String>,
    pub notes: Option<String>,
}

/// Optional filters for the ledger listing
#[derive(Debug, Default, Deserialize)]
pub struct LedgerFilter {
    pub transaction_type: Option<TransactionType>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl LedgerService {
    /// Create a new LedgerService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record a stock movement.
    ///
    /// The movement either fully applies or the batch is untouched. An
    /// outbound quantity larger than the batch balance is rejected with
    /// the shortfall; nothing is partially deducted.
    pub async fn record_transaction(
        &self,
        input: RecordTransactionInput,
    ) -> AppResult<StockTransaction> {
        if let Err(message) = validate_transaction_quantity(input.quantity) {
            return Err(AppError::Validation {
                field: "quantity".to_string(),
                message: message.to_string(),
            });
        }

        let mut tx = self.db.begin().await?;

        // Lock the batch row so the balance check and the update see the
        // same quantity even under concurrent writers
        let balance: i64 =
            sqlx::query_scalar("SELECT quantity FROM batches WHERE id = $1 FOR UPDATE")
                .bind(input.batch_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| AppError::NotFound("Batch".to_string()))?;

        let new_balance = apply_movement(balance, input.transaction_type, input.quantity)?;

        sqlx::query("UPDATE batches SET quantity = $1, updated_at = NOW() WHERE id = $2")
            .bind(new_balance)
            .bind(input.batch_id)
            .execute(&mut *tx)
            .await?;

        let row = sqlx::query_as::<_, TransactionRow>(&format!(
            r#"
            INSERT INTO batch_transactions (batch_id, order_id, quantity, transaction_type, notes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {TRANSACTION_COLUMNS}
            "#,
        ))
        .bind(input.batch_id)
        .bind(&input.order_id)
        .bind(input.quantity)
        .bind(input.transaction_type.as_str())
        .bind(&input.notes)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(
            batch_id = %input.batch_id,
            transaction_type = %input.transaction_type.as_str(),
            quantity = input.quantity,
            new_balance,
            "Recorded transaction"
        );
        row.try_into()
    }

    /// Full movement history of a batch, oldest first
    pub async fn list_transactions_for_batch(
        &self,
        batch_id: Uuid,
    ) -> AppResult<Vec<StockTransaction>> {
        let rows = sqlx::query_as::<_, TransactionRow>(&format!(
            r#"
            SELECT {TRANSACTION_COLUMNS}
            FROM batch_transactions
            WHERE batch_id = $1
            ORDER BY created_at ASC
            "#,
        ))
        .bind(batch_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(StockTransaction::try_from).collect()
    }

    /// Paginated ledger across all batches, newest first
    pub async fn list_transactions(
        &self,
        filter: LedgerFilter,
        pagination: Pagination,
    ) -> AppResult<PaginatedResponse<StockTransaction>> {
        let transaction_type = filter.transaction_type.map(|t| t.as_str().to_string());

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM batch_transactions
            WHERE ($1::TEXT IS NULL OR transaction_type = $1)
              AND ($2::DATE IS NULL OR created_at::DATE >= $2)
              AND ($3::DATE IS NULL OR created_at::DATE <= $3)
            "#,
        )
        .bind(&transaction_type)
        .bind(filter.from)
        .bind(filter.to)
        .fetch_one(&self.db)
        .await?;

        let rows = sqlx::query_as::<_, TransactionRow>(&format!(
            r#"
            SELECT {TRANSACTION_COLUMNS}
            FROM batch_transactions
            WHERE ($1::TEXT IS NULL OR transaction_type = $1)
              AND ($2::DATE IS NULL OR created_at::DATE >= $2)
              AND ($3::DATE IS NULL OR created_at::DATE <= $3)
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#,
        ))
        .bind(&transaction_type)
        .bind(filter.from)
        .bind(filter.to)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.db)
        .await?;

        let data = rows
            .into_iter()
            .map(StockTransaction::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PaginatedResponse {
            data,
            pagination: PaginationMeta::new(&pagination, total as u64),
        })
    }
}
