use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use voxgate_application::{AccessGrantListing, AccessGrantQuery, AccessGrantRepository};
use voxgate_core::AppResult;
use voxgate_domain::{AccessGrant, UserId};

/// In-memory grant store for local runs and tests.
#[derive(Debug, Default)]
pub struct InMemoryAccessGrantRepository {
    grants: RwLock<HashMap<UserId, AccessGrant>>,
}

impl InMemoryAccessGrantRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            grants: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl AccessGrantRepository for InMemoryAccessGrantRepository {
    async fn latest_grant(&self, subject: UserId) -> AppResult<Option<AccessGrant>> {
        Ok(self.grants.read().await.get(&subject).cloned())
    }

    async fn upsert_grant(&self, grant: AccessGrant) -> AppResult<()> {
        self.grants.write().await.insert(grant.subject(), grant);
        Ok(())
    }

    async fn list_grants(&self, query: AccessGrantQuery) -> AppResult<Vec<AccessGrantListing>> {
        let grants = self.grants.read().await;

        let mut values: Vec<AccessGrant> = grants
            .values()
            .filter(|grant| !query.allowed_only || grant.allowed())
            .cloned()
            .collect();
        values.sort_by(|left, right| {
            right
                .granted_at()
                .cmp(&left.granted_at())
                .then_with(|| left.subject().as_uuid().cmp(&right.subject().as_uuid()))
        });

        Ok(values
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .map(|grant| AccessGrantListing {
                grant,
                subject_email: None,
            })
            .collect())
    }
}
