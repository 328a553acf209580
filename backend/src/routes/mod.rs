//! API route definitions

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::AppState;

/// All API routes under /api/v1
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .nest("/batches", batch_routes())
        .nest("/inventory", inventory_routes())
        .nest("/products", product_routes())
}

fn batch_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::batch::create_batch))
        .route(
            "/:id",
            get(handlers::batch::get_batch)
                .put(handlers::batch::update_batch)
                .delete(handlers::batch::delete_batch),
        )
        .route(
            "/:id/transactions",
            get(handlers::batch::list_batch_transactions),
        )
}

fn inventory_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/transactions",
            post(handlers::inventory::record_transaction)
                .get(handlers::inventory::list_transactions),
        )
        .route(
            "/alerts/low-stock",
            get(handlers::inventory::low_stock_alerts),
        )
        .route("/alerts/expiring", get(handlers::inventory::expiring_alerts))
}

fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/:id/stock", get(handlers::product::get_product_stock))
        .route("/:id/batches", get(handlers::product::list_product_batches))
        .route(
            "/:id/policy",
            get(handlers::product::get_product_policy)
                .put(handlers::product::upsert_product_policy),
        )
        .route(
            "/:id/consumption-plan",
            post(handlers::product::plan_consumption),
        )
}
