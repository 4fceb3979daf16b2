//! Readers for Shopify product exports and writers for aggregated records.

pub mod csv_read;
pub mod csv_write;
pub mod excel_read;
pub mod excel_write;
pub mod json_write;
