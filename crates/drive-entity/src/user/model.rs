//! Minimal user principal model.
//!
//! Authentication lives outside this core; the table exists so an acting
//! user id can be resolved (or rejected as unknown) before permissions are
//! computed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A known user principal.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: Uuid,
    /// Login email.
    pub email: String,
    /// Display name.
    pub full_name: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
