//! # Adapters
//!
//! Production implementations of the outbound ports.
//!
//! - `file_store`: durable `RecordStore` persisting to one JSON file
//! - `session`: static token table with constant-time comparison
//! - `workbook`: CSV bytes renderer for exports

pub mod file_store;
pub mod session;
pub mod workbook;
