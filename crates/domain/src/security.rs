use serde::{Deserialize, Serialize};

/// Stable audit actions emitted by access-control use-cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Emitted when dashboard access is granted or its window replaced.
    DashboardAccessGranted,
    /// Emitted when dashboard access is revoked.
    DashboardAccessRevoked,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DashboardAccessGranted => "GRANT_DASHBOARD_ACCESS",
            Self::DashboardAccessRevoked => "REVOKE_DASHBOARD_ACCESS",
        }
    }
}
