//! Batch handlers

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::batch::{CreateBatchInput, UpdateBatchInput};
use crate::services::{BatchService, LedgerService};
use crate::AppState;
use shared::models::{Batch, StockTransaction};

#[derive(Debug, Default, Deserialize)]
pub struct DeleteBatchQuery {
    #[serde(default)]
    pub force: bool,
}

/// POST /batches - Register a newly received batch
pub async fn create_batch(
    State(state): State<AppState>,
    Json(input): Json<CreateBatchInput>,
) -> AppResult<(StatusCode, Json<Batch>)> {
    let batch = BatchService::new(state.db.clone()).create_batch(input).await?;
    Ok((StatusCode::CREATED, Json(batch)))
}

/// GET /batches/:id - Get a batch by ID
pub async fn get_batch(
    State(state): State<AppState>,
    Path(batch_id): Path<Uuid>,
) -> AppResult<Json<Batch>> {
    let batch = BatchService::new(state.db.clone()).get_batch(batch_id).await?;
    Ok(Json(batch))
}

/// PUT /batches/:id - Update a batch's non-ledger fields
pub async fn update_batch(
    State(state): State<AppState>,
    Path(batch_id): Path<Uuid>,
    Json(input): Json<UpdateBatchInput>,
) -> AppResult<Json<Batch>> {
    let batch = BatchService::new(state.db.clone())
        .update_batch(batch_id, input)
        .await?;
    Ok(Json(batch))
}

/// DELETE /batches/:id - Delete a batch, cascading its ledger when forced
pub async fn delete_batch(
    State(state): State<AppState>,
    Path(batch_id): Path<Uuid>,
    Query(query): Query<DeleteBatchQuery>,
) -> AppResult<StatusCode> {
    BatchService::new(state.db.clone())
        .delete_batch(batch_id, query.force)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /batches/:id/transactions - Movement history of a batch, oldest first
pub async fn list_batch_transactions(
    State(state): State<AppState>,
    Path(batch_id): Path<Uuid>,
) -> AppResult<Json<Vec<StockTransaction>>> {
    // 404 for an unknown batch instead of an empty history
    BatchService::new(state.db.clone()).get_batch(batch_id).await?;
    let transactions = LedgerService::new(state.db.clone())
        .list_transactions_for_batch(batch_id)
        .await?;
    Ok(Json(transactions))
}
