//! WebAssembly bindings for the inventory core
//!
//! Exposes the pure stock logic to the storefront admin UI so expiry
//! badges, consumption previews, and validation messages can be computed
//! client-side without a round trip.

use chrono::NaiveDate;
use wasm_bindgen::prelude::*;

use shared::alerts;
use shared::allocation::plan_consumption;
use shared::expiry::expiry_status;
use shared::models::Batch;
use shared::validation;

// Re-export shared types for use from JavaScript glue code
pub use shared::expiry::ExpiryStatus;
pub use shared::models::{StockTransaction, TransactionType};

#[wasm_bindgen(start)]
pub fn start() {
    web_sys::console::log_1(&"inventory core loaded".into());
}

/// Current date in the browser's clock as YYYY-MM-DD, for feeding the
/// status helpers
#[wasm_bindgen]
pub fn current_date() -> String {
    let now = js_sys::Date::new_0();
    format!(
        "{:04}-{:02}-{:02}",
        now.get_full_year(),
        now.get_month() + 1,
        now.get_date()
    )
}

fn parse_date(value: &str, field: &str) -> Result<NaiveDate, JsValue> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| JsValue::from_str(&format!("{field} must be a YYYY-MM-DD date")))
}

/// Expiry status for a batch as a JSON string, e.g.
/// `{"status":"expiring_soon","days_remaining":3}`
#[wasm_bindgen]
pub fn batch_expiry_status_json(
    has_expiry: bool,
    expiry_date: Option<String>,
    notification_days: i64,
    today: String,
) -> Result<String, JsValue> {
    let expiry = match expiry_date {
        Some(value) => Some(parse_date(&value, "expiry_date")?),
        None => None,
    };
    let today = parse_date(&today, "today")?;

    let status = expiry_status(has_expiry, expiry, notification_days, today);
    serde_json::to_string(&status).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Preview which batches an order would draw from.
///
/// `batches_json` is a JSON array of batch objects as returned by the
/// API. Returns the allocation plan as JSON, or throws with the shortfall
/// serialized when stock cannot cover the request.
#[wasm_bindgen]
pub fn preview_consumption_plan(
    batches_json: &str,
    quantity: i64,
    use_fifo: bool,
) -> Result<String, JsValue> {
    let batches: Vec<Batch> = serde_json::from_str(batches_json)
        .map_err(|e| JsValue::from_str(&format!("invalid batches payload: {e}")))?;

    match plan_consumption(&batches, quantity, use_fifo) {
        Ok(plan) => serde_json::to_string(&plan).map_err(|e| JsValue::from_str(&e.to_string())),
        Err(err) => {
            let body = serde_json::to_string(&err)
                .unwrap_or_else(|_| format!("{{\"shortfall\":{}}}", err.shortfall));
            Err(JsValue::from_str(&body))
        }
    }
}

/// Low-stock predicate mirrored from the alert feed
#[wasm_bindgen]
pub fn is_low_stock(minimum_stock: i64, total_stock: i64) -> bool {
    alerts::is_low_stock(minimum_stock, total_stock)
}

/// Validate a batch number; returns the error message or null
#[wasm_bindgen]
pub fn validate_batch_number(value: &str) -> Option<String> {
    validation::validate_batch_number(value)
        .err()
        .map(|m| m.to_string())
}

/// Validate a transaction quantity; returns the error message or null
#[wasm_bindgen]
pub fn validate_transaction_quantity(quantity: i64) -> Option<String> {
    validation::validate_transaction_quantity(quantity)
        .err()
        .map(|m| m.to_string())
}

/// Validate a received/expiry date pair; returns the error message or null
#[wasm_bindgen]
pub fn validate_expiry_dates(received_date: String, expiry_date: String) -> Option<String> {
    let received = match NaiveDate::parse_from_str(&received_date, "%Y-%m-%d") {
        Ok(date) => date,
        Err(_) => return Some("received_date must be a YYYY-MM-DD date".to_string()),
    };
    let expiry = match NaiveDate::parse_from_str(&expiry_date, "%Y-%m-%d") {
        Ok(date) => date,
        Err(_) => return Some("expiry_date must be a YYYY-MM-DD date".to_string()),
    };
    validation::validate_expiry_after_received(received, expiry)
        .err()
        .map(|m| m.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_status_json_shape() {
        let json = batch_expiry_status_json(
            true,
            Some("2026-04-10".to_string()),
            30,
            "2026-04-01".to_string(),
        )
        .unwrap();
        assert_eq!(json, r#"{"status":"expiring_soon","days_remaining":9}"#);
    }

    #[test]
    fn test_preview_plan_round_trips_api_batches() {
        let batches = r#"[{
            "id": "1f4fb0f2-8a06-4c8e-93be-5be9f79cdf2e",
            "product_id": "7b2f4bc8-3f76-4f2e-9c03-2a90cd9d2b41",
            "batch_number": "HAMPER-1",
            "quantity": 5,
            "received_date": "2026-01-02",
            "has_expiry": false,
            "expiry_date": null,
            "notes": null,
            "created_at": "2026-01-02T09:00:00Z",
            "updated_at": "2026-01-02T09:00:00Z"
        }]"#;

        let plan = preview_consumption_plan(batches, 3, true).unwrap();
        assert!(plan.contains("HAMPER-1"));
        assert!(plan.contains("\"quantity\":3"));
    }

    #[test]
    fn test_validators_surface_messages() {
        assert!(validate_batch_number("HAMPER-1").is_none());
        assert!(validate_batch_number("").is_some());
        assert!(validate_transaction_quantity(0).is_some());
        assert!(validate_expiry_dates("2026-01-10".into(), "2026-01-05".into()).is_some());
        assert!(validate_expiry_dates("2026-01-05".into(), "2026-01-10".into()).is_none());
    }
}
