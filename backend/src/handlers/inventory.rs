//! Inventory ledger and alert handlers

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::AppResult;
use crate::services::alerts::LowStockProduct;
use crate::services::ledger::{LedgerFilter, RecordTransactionInput};
use crate::services::stock::ExpiringBatch;
use crate::services::{AlertService, LedgerService};
use crate::AppState;
use shared::models::{StockTransaction, TransactionType};
use shared::types::{PaginatedResponse, Pagination};

#[derive(Debug, Default, Deserialize)]
pub struct LedgerQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub transaction_type: Option<TransactionType>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExpiringQuery {
    /// Expiry window in days; the configured default applies when absent
    pub days: Option<i32>,
}

/// POST /inventory/transactions - Record a stock movement
pub async fn record_transaction(
    State(state): State<AppState>,
    Json(input): Json<RecordTransactionInput>,
) -> AppResult<(StatusCode, Json<StockTransaction>)> {
    let transaction = LedgerService::new(state.db.clone())
        .record_transaction(input)
        .await?;
    Ok((StatusCode::CREATED, Json(transaction)))
}

/// GET /inventory/transactions - Paginated ledger with optional filters
pub async fn list_transactions(
    State(state): State<AppState>,
    Query(query): Query<LedgerQuery>,
) -> AppResult<Json<PaginatedResponse<StockTransaction>>> {
    let default_pagination = Pagination::default();
    let pagination = Pagination {
        page: query.page.unwrap_or(default_pagination.page),
        per_page: query.per_page.unwrap_or(default_pagination.per_page),
    };
    let filter = LedgerFilter {
        transaction_type: query.transaction_type,
        from: query.from,
        to: query.to,
    };

    let response = LedgerService::new(state.db.clone())
        .list_transactions(filter, pagination)
        .await?;
    Ok(Json(response))
}

/// GET /inventory/alerts/low-stock - Products at or below their minimum
pub async fn low_stock_alerts(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<LowStockProduct>>> {
    let products = AlertService::new(state.db.clone())
        .low_stock_products()
        .await?;
    Ok(Json(products))
}

/// GET /inventory/alerts/expiring - Batches inside the expiry window
pub async fn expiring_alerts(
    State(state): State<AppState>,
    Query(query): Query<ExpiringQuery>,
) -> AppResult<Json<Vec<ExpiringBatch>>> {
    let window = query
        .days
        .unwrap_or(state.config.alerts.default_expiring_window_days);
    let batches = AlertService::new(state.db.clone())
        .expiring_batches(window)
        .await?;
    Ok(Json(batches))
}
