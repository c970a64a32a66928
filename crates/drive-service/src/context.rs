//! Per-request context.

use uuid::Uuid;

/// The identity a request is executed as. Every service entry point takes
/// one; services never fall back to an ambient identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestContext {
    /// The acting user.
    pub user_id: Uuid,
}

impl RequestContext {
    /// Create a context for the given user.
    pub fn new(user_id: Uuid) -> Self {
        Self { user_id }
    }
}
