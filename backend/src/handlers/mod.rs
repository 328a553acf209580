//! HTTP request handlers

pub mod batch;
pub mod health;
pub mod inventory;
pub mod product;
