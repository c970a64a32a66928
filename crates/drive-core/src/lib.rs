//! # drive-core
//!
//! Core crate for Team Drive. Contains configuration schemas, the logging
//! bootstrap, sorting and listing-specification types, and the unified
//! error system.
//!
//! This crate has **no** internal dependencies on other Team Drive crates.

pub mod config;
pub mod error;
pub mod logging;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
