use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;
use voxgate_core::{AppResult, UserIdentity};
use voxgate_domain::{AccessDecision, DenialReason, UserId};

use crate::AccessGrantRepository;

/// Stateless dashboard access decision over the grant store.
///
/// Every call reads the store; nothing is cached, so a completed revoke is
/// observed by the next evaluation.
#[derive(Clone)]
pub struct AccessEvaluator {
    repository: Arc<dyn AccessGrantRepository>,
}

impl AccessEvaluator {
    /// Creates an evaluator over the grant store.
    #[must_use]
    pub fn new(repository: Arc<dyn AccessGrantRepository>) -> Self {
        Self { repository }
    }

    /// Decides whether `subject` may access the dashboard at `now`.
    ///
    /// Store failures are returned as errors and never coerced to a denial.
    pub async fn evaluate(&self, subject: UserId, now: DateTime<Utc>) -> AppResult<AccessDecision> {
        let grant = self.repository.latest_grant(subject).await?;
        let decision = AccessDecision::for_grant(grant.as_ref(), now);

        debug!(
            subject = %subject,
            allowed = decision.is_allowed(),
            "dashboard access evaluated"
        );

        Ok(decision)
    }

    /// Evaluates the subject carried by a session identity.
    pub async fn evaluate_identity(
        &self,
        identity: &UserIdentity,
        now: DateTime<Utc>,
    ) -> AppResult<AccessDecision> {
        // Grants are keyed by directory id; any other subject cannot hold one.
        let Ok(subject) = UserId::from_str(identity.subject()) else {
            return Ok(AccessDecision::Deny(DenialReason::NoGrant));
        };

        self.evaluate(subject, now).await
    }
}
