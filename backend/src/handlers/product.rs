//! Product-scoped stock handlers

use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::allocation::{AllocationPlan, PlanConsumptionInput};
use crate::services::catalog::UpsertPolicyInput;
use crate::services::stock::ProductStock;
use crate::services::{AllocationService, BatchService, CatalogService, StockService};
use crate::AppState;
use shared::models::{Batch, ProductPolicy};

/// GET /products/:id/stock - Total stock plus per-batch expiry status
pub async fn get_product_stock(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<ProductStock>> {
    let stock = StockService::new(state.db.clone())
        .product_stock(product_id)
        .await?;
    Ok(Json(stock))
}

/// GET /products/:id/batches - Batches of a product, oldest received first
pub async fn list_product_batches(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Vec<Batch>>> {
    let batches = BatchService::new(state.db.clone())
        .list_batches_for_product(product_id)
        .await?;
    Ok(Json(batches))
}

/// GET /products/:id/policy - Inventory policy, defaulted when unset
pub async fn get_product_policy(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<ProductPolicy>> {
    let policy = CatalogService::new(state.db.clone())
        .get_policy(product_id)
        .await?;
    Ok(Json(policy))
}

/// PUT /products/:id/policy - Store or replace the inventory policy
pub async fn upsert_product_policy(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    Json(input): Json<UpsertPolicyInput>,
) -> AppResult<Json<ProductPolicy>> {
    let policy = CatalogService::new(state.db.clone())
        .upsert_policy(product_id, input)
        .await?;
    Ok(Json(policy))
}

/// POST /products/:id/consumption-plan - Plan batches for an order to draw from
pub async fn plan_consumption(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    Json(input): Json<PlanConsumptionInput>,
) -> AppResult<Json<AllocationPlan>> {
    let plan = AllocationService::new(state.db.clone())
        .select_batches_to_consume(product_id, input)
        .await?;
    Ok(Json(plan))
}
