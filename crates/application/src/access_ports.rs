use async_trait::async_trait;

use voxgate_core::{AppResult, UserIdentity, UserRole};
use voxgate_domain::{AccessGrant, EmailAddress, UserId};

/// Query parameters for grant listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessGrantQuery {
    /// Whether to return only records with `allowed == true`.
    pub allowed_only: bool,
    /// Maximum rows returned.
    pub limit: usize,
    /// Number of rows skipped for pagination.
    pub offset: usize,
}

impl Default for AccessGrantQuery {
    fn default() -> Self {
        Self {
            allowed_only: true,
            limit: 50,
            offset: 0,
        }
    }
}

/// Grant row joined with the subject's contact address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessGrantListing {
    /// Stored grant.
    pub grant: AccessGrant,
    /// Subject email, when the directory still knows the subject.
    pub subject_email: Option<String>,
}

/// Repository port for the grant store.
///
/// Only the admin workflow calls the write operation.
#[async_trait]
pub trait AccessGrantRepository: Send + Sync {
    /// Returns the most recent grant for a subject.
    async fn latest_grant(&self, subject: UserId) -> AppResult<Option<AccessGrant>>;

    /// Inserts or replaces the grant for `grant.subject()`.
    async fn upsert_grant(&self, grant: AccessGrant) -> AppResult<()>;

    /// Lists grants newest first.
    async fn list_grants(&self, query: AccessGrantQuery) -> AppResult<Vec<AccessGrantListing>>;
}

/// Directory entry for a known subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryIdentity {
    /// Stable subject identifier.
    pub user_id: UserId,
    /// Contact address.
    pub email: String,
    /// Display name.
    pub display_name: String,
    /// Role claim issued into sessions.
    pub role: UserRole,
}

impl DirectoryIdentity {
    /// Builds the identity stored in the session.
    #[must_use]
    pub fn to_session_identity(&self) -> UserIdentity {
        UserIdentity::new(
            self.user_id.to_string(),
            self.display_name.clone(),
            Some(self.email.clone()),
            Some(self.role),
        )
    }
}

/// Result of recording a sign-in against the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInRecord {
    /// Directory entry after the sign-in.
    pub identity: DirectoryIdentity,
    /// Whether this is the subject's first recorded sign-in.
    pub first_sign_in: bool,
}

/// Port over the identity directory.
#[async_trait]
pub trait IdentityDirectory: Send + Sync {
    /// Resolves a contact address to a known subject.
    async fn find_by_contact(&self, email: &EmailAddress) -> AppResult<Option<DirectoryIdentity>>;

    /// Ensures a directory entry exists and stamps the sign-in.
    async fn record_sign_in(
        &self,
        email: &EmailAddress,
        display_name: &str,
    ) -> AppResult<SignInRecord>;
}
