//! Storage quota configuration.

use serde::{Deserialize, Serialize};

/// Storage quota configuration, loaded once at startup and passed into the
/// quota accountant constructor.
///
/// All limits are configured in MiB and converted to bytes internally with
/// base-1024 units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaConfig {
    /// Whether per-user quota rows are consulted at all.
    #[serde(default)]
    pub enforce_user_quota: bool,
    /// Plan-derived storage ceiling in MiB. When set it wins outright over
    /// both the default limit and any per-user quota row.
    #[serde(default)]
    pub plan_limit_mib: Option<i64>,
    /// Fallback storage ceiling in MiB when no plan limit is configured.
    #[serde(default = "default_limit_mib")]
    pub default_limit_mib: i64,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            enforce_user_quota: false,
            plan_limit_mib: None,
            default_limit_mib: default_limit_mib(),
        }
    }
}

fn default_limit_mib() -> i64 {
    5120
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = QuotaConfig::default();
        assert!(!config.enforce_user_quota);
        assert_eq!(config.plan_limit_mib, None);
        assert_eq!(config.default_limit_mib, 5120);
    }
}
