use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use voxgate_core::{AppError, AppResult, UserIdentity};
use voxgate_domain::{AccessGrant, AccessWindow, AuditAction, EmailAddress, UserId};

use crate::{
    AccessGrantListing, AccessGrantQuery, AccessGrantRepository, AuditEvent, AuditRepository,
    Clock, IdentityDirectory,
};

const GRANT_RESOURCE_TYPE: &str = "dashboard_access_grant";

/// Input payload for granting dashboard access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantAccessInput {
    /// Contact address of the subject.
    pub contact: String,
    /// First instant of the access window.
    pub window_start: DateTime<Utc>,
    /// Last instant of the access window.
    pub window_end: DateTime<Utc>,
}

/// Application service for dashboard access administration.
///
/// This is the only writer of the grant store.
#[derive(Clone)]
pub struct AccessAdminService {
    directory: Arc<dyn IdentityDirectory>,
    repository: Arc<dyn AccessGrantRepository>,
    audit_repository: Arc<dyn AuditRepository>,
    clock: Arc<dyn Clock>,
}

impl AccessAdminService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        directory: Arc<dyn IdentityDirectory>,
        repository: Arc<dyn AccessGrantRepository>,
        audit_repository: Arc<dyn AuditRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            directory,
            repository,
            audit_repository,
            clock,
        }
    }

    /// Grants or replaces dashboard access for the subject behind `input.contact`.
    pub async fn grant(&self, actor: &UserIdentity, input: GrantAccessInput) -> AppResult<AccessGrant> {
        require_admin(actor)?;

        let window = AccessWindow::new(input.window_start, input.window_end)?;
        let contact = EmailAddress::new(input.contact)?;

        let subject = self
            .directory
            .find_by_contact(&contact)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("no user with contact '{}'", contact.as_str()))
            })?;

        let grant = AccessGrant::allow(subject.user_id, window, actor.subject(), self.clock.now());
        self.repository.upsert_grant(grant.clone()).await?;

        info!(
            subject = %subject.user_id,
            actor = actor.subject(),
            window_start = %window.start().to_rfc3339(),
            window_end = %window.end().to_rfc3339(),
            "dashboard access granted"
        );

        self.append_audit_event(AuditEvent {
            subject: actor.subject().to_owned(),
            action: AuditAction::DashboardAccessGranted,
            resource_type: GRANT_RESOURCE_TYPE.to_owned(),
            resource_id: subject.user_id.to_string(),
            detail: Some(format!(
                "dashboard access granted to '{}' from '{}' until '{}'",
                contact.as_str(),
                window.start().to_rfc3339(),
                window.end().to_rfc3339()
            )),
            occurred_at: grant.granted_at(),
        })
        .await;

        Ok(grant)
    }

    /// Revokes dashboard access for a subject.
    pub async fn revoke(&self, actor: &UserIdentity, subject: UserId) -> AppResult<AccessGrant> {
        require_admin(actor)?;

        let grant = AccessGrant::revoke(subject, actor.subject(), self.clock.now());
        self.repository.upsert_grant(grant.clone()).await?;

        info!(subject = %subject, actor = actor.subject(), "dashboard access revoked");

        self.append_audit_event(AuditEvent {
            subject: actor.subject().to_owned(),
            action: AuditAction::DashboardAccessRevoked,
            resource_type: GRANT_RESOURCE_TYPE.to_owned(),
            resource_id: subject.to_string(),
            detail: Some("dashboard access revoked by admin".to_owned()),
            occurred_at: grant.granted_at(),
        })
        .await;

        Ok(grant)
    }

    /// Lists stored grants for the admin console.
    pub async fn list_grants(
        &self,
        actor: &UserIdentity,
        query: AccessGrantQuery,
    ) -> AppResult<Vec<AccessGrantListing>> {
        require_admin(actor)?;

        self.repository
            .list_grants(AccessGrantQuery {
                allowed_only: query.allowed_only,
                limit: query.limit.clamp(1, 200),
                offset: query.offset.min(5_000),
            })
            .await
    }

    // The audit trail is diagnostic; a failed append must not undo the grant.
    async fn append_audit_event(&self, event: AuditEvent) {
        let action = event.action;
        let resource_id = event.resource_id.clone();

        if let Err(error) = self.audit_repository.append_event(event).await {
            warn!(
                action = action.as_str(),
                resource_id = resource_id.as_str(),
                %error,
                "failed to append access audit event"
            );
        }
    }
}

fn require_admin(actor: &UserIdentity) -> AppResult<()> {
    if actor.is_admin() {
        return Ok(());
    }

    Err(AppError::Forbidden(format!(
        "subject '{}' is missing the admin role claim",
        actor.subject()
    )))
}
