//! Validation utilities for the Gift Hamper Inventory Ledger
//!
//! Input checks shared by the backend services and the storefront forms
//! (via WASM), so both sides reject the same malformed input.

use chrono::NaiveDate;

// ============================================================================
// Batch Validations
// ============================================================================

/// Validate a batch number label (1-64 printable characters)
pub fn validate_batch_number(batch_number: &str) -> Result<(), &'static str> {
    let trimmed = batch_number.trim();
    if trimmed.is_empty() {
        return Err("Batch number cannot be empty");
    }
    if trimmed.len() > 64 {
        return Err("Batch number must be at most 64 characters");
    }
    if trimmed.chars().any(|c| c.is_control()) {
        return Err("Batch number cannot contain control characters");
    }
    Ok(())
}

/// Validate the received quantity of a new batch (zero is allowed: a batch
/// may be registered ahead of counting)
pub fn validate_initial_quantity(quantity: i64) -> Result<(), &'static str> {
    if quantity < 0 {
        return Err("Initial quantity cannot be negative");
    }
    Ok(())
}

/// Validate a transaction quantity (strictly positive; direction comes from
/// the transaction type, never from the sign)
pub fn validate_transaction_quantity(quantity: i64) -> Result<(), &'static str> {
    if quantity <= 0 {
        return Err("Transaction quantity must be positive");
    }
    Ok(())
}

/// Expiry date is required iff the batch is flagged as having one
pub fn validate_expiry_fields(
    has_expiry: bool,
    expiry_date: Option<NaiveDate>,
) -> Result<(), &'static str> {
    match (has_expiry, expiry_date) {
        (true, None) => Err("Expiry date is required for batches with expiry"),
        (false, Some(_)) => Err("Expiry date must be empty for batches without expiry"),
        _ => Ok(()),
    }
}

/// A batch cannot expire before it was received
pub fn validate_expiry_after_received(
    received_date: NaiveDate,
    expiry_date: NaiveDate,
) -> Result<(), &'static str> {
    if expiry_date < received_date {
        return Err("Expiry date cannot be before the received date");
    }
    Ok(())
}

// ============================================================================
// Policy Validations
// ============================================================================

/// Validate the expiry notification window (days before expiry)
pub fn validate_notification_days(days: i64) -> Result<(), &'static str> {
    if days < 0 {
        return Err("Notification days cannot be negative");
    }
    Ok(())
}

/// Validate a low-stock threshold
pub fn validate_minimum_stock(minimum_stock: i64) -> Result<(), &'static str> {
    if minimum_stock < 0 {
        return Err("Minimum stock cannot be negative");
    }
    Ok(())
}
