//! Shared type definitions.

pub mod listing;
pub mod sorting;

pub use listing::{EntityListing, ListingScope, SharedDirection, SharedListing, Visibility};
pub use sorting::{SortDirection, SortField};
