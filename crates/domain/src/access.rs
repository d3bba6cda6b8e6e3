//! Time-windowed dashboard access grants.
//!
//! A grant is the persisted statement that a subject may enter the
//! dashboard between two instants. The decision rules live here so the
//! evaluator and the admin workflow share one definition of a usable window.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use voxgate_core::{AppError, AppResult};

use crate::UserId;

/// Inclusive, validated time range during which a grant is usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl AccessWindow {
    /// Creates a window, rejecting a start that falls after the end.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> AppResult<Self> {
        if start > end {
            return Err(AppError::Validation(format!(
                "invalid access window: start '{}' is after end '{}'",
                start.to_rfc3339(),
                end.to_rfc3339()
            )));
        }

        Ok(Self { start, end })
    }

    /// Returns the first instant of the window.
    #[must_use]
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Returns the last instant of the window.
    #[must_use]
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Returns whether `instant` lies inside the window, bounds included.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }
}

/// Why an evaluation denied access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    /// No grant record exists for the subject.
    NoGrant,
    /// The latest record is a revocation.
    Revoked,
    /// Bounds are missing or reversed.
    MalformedWindow,
    /// The window has not opened yet.
    NotYetActive,
    /// The window has closed.
    Expired,
}

impl DenialReason {
    /// Returns a stable label for logs and metrics.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoGrant => "no_grant",
            Self::Revoked => "revoked",
            Self::MalformedWindow => "malformed_window",
            Self::NotYetActive => "not_yet_active",
            Self::Expired => "expired",
        }
    }
}

/// Outcome of evaluating a subject's latest grant at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// Access is allowed; carries the window for client display.
    Allow(AccessWindow),
    /// Access is denied.
    Deny(DenialReason),
}

impl AccessDecision {
    /// Decides access from the subject's latest grant, if any.
    #[must_use]
    pub fn for_grant(grant: Option<&AccessGrant>, now: DateTime<Utc>) -> Self {
        grant.map_or(Self::Deny(DenialReason::NoGrant), |grant| grant.decide(now))
    }

    /// Returns whether the decision allows access.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow(_))
    }
}

/// Persisted dashboard access record for one subject.
///
/// Records are replaced, never deleted: a revocation is a grant with
/// `allowed == false` and no bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessGrant {
    subject: UserId,
    allowed: bool,
    window_start: Option<DateTime<Utc>>,
    window_end: Option<DateTime<Utc>>,
    granted_by: String,
    granted_at: DateTime<Utc>,
}

impl AccessGrant {
    /// Creates an allowing grant over a validated window.
    #[must_use]
    pub fn allow(
        subject: UserId,
        window: AccessWindow,
        granted_by: impl Into<String>,
        granted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            subject,
            allowed: true,
            window_start: Some(window.start()),
            window_end: Some(window.end()),
            granted_by: granted_by.into(),
            granted_at,
        }
    }

    /// Creates a revocation record.
    #[must_use]
    pub fn revoke(subject: UserId, granted_by: impl Into<String>, granted_at: DateTime<Utc>) -> Self {
        Self {
            subject,
            allowed: false,
            window_start: None,
            window_end: None,
            granted_by: granted_by.into(),
            granted_at,
        }
    }

    /// Rebuilds a grant from storage without validating its window.
    ///
    /// Stored rows may carry malformed windows; those are denied at
    /// decision time instead of failing the read.
    #[must_use]
    pub fn from_stored(
        subject: UserId,
        allowed: bool,
        window_start: Option<DateTime<Utc>>,
        window_end: Option<DateTime<Utc>>,
        granted_by: impl Into<String>,
        granted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            subject,
            allowed,
            window_start,
            window_end,
            granted_by: granted_by.into(),
            granted_at,
        }
    }

    /// Returns the subject the grant applies to.
    #[must_use]
    pub fn subject(&self) -> UserId {
        self.subject
    }

    /// Returns whether the record allows access.
    #[must_use]
    pub fn allowed(&self) -> bool {
        self.allowed
    }

    /// Returns the stored window start.
    #[must_use]
    pub fn window_start(&self) -> Option<DateTime<Utc>> {
        self.window_start
    }

    /// Returns the stored window end.
    #[must_use]
    pub fn window_end(&self) -> Option<DateTime<Utc>> {
        self.window_end
    }

    /// Returns the administrator subject that wrote the record.
    #[must_use]
    pub fn granted_by(&self) -> &str {
        self.granted_by.as_str()
    }

    /// Returns the mutation timestamp.
    #[must_use]
    pub fn granted_at(&self) -> DateTime<Utc> {
        self.granted_at
    }

    /// Returns the window when both bounds are present and ordered.
    #[must_use]
    pub fn window(&self) -> Option<AccessWindow> {
        match (self.window_start, self.window_end) {
            (Some(start), Some(end)) => AccessWindow::new(start, end).ok(),
            _ => None,
        }
    }

    /// Decides access at `now`.
    #[must_use]
    pub fn decide(&self, now: DateTime<Utc>) -> AccessDecision {
        if !self.allowed {
            return AccessDecision::Deny(DenialReason::Revoked);
        }

        let Some(window) = self.window() else {
            return AccessDecision::Deny(DenialReason::MalformedWindow);
        };

        if now < window.start() {
            AccessDecision::Deny(DenialReason::NotYetActive)
        } else if now > window.end() {
            AccessDecision::Deny(DenialReason::Expired)
        } else {
            AccessDecision::Allow(window)
        }
    }
}
