//! # drive-quota
//!
//! Storage accounting: usage aggregates over the entity table, storage
//! ceiling resolution, and admission checks for incoming bytes.

pub mod accountant;

pub use accountant::QuotaAccountant;
