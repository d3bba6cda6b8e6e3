use std::sync::Arc;

use tracing::info;
use voxgate_core::{AppResult, UserIdentity};
use voxgate_domain::EmailAddress;

use crate::{IdentityDirectory, OnboardingRepository};

/// Identity issued into a new session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionExchange {
    /// Identity to store in the session.
    pub identity: UserIdentity,
    /// Whether the subject has neither finished nor skipped onboarding.
    pub requires_onboarding: bool,
}

/// Turns an upstream-verified contact address into a session identity.
///
/// Authentication happens at the upstream identity provider; this service
/// only maps the verified address onto the directory and its role claim.
#[derive(Clone)]
pub struct SessionExchangeService {
    directory: Arc<dyn IdentityDirectory>,
    onboarding: Arc<dyn OnboardingRepository>,
}

impl SessionExchangeService {
    /// Creates a new service over the identity directory and onboarding store.
    #[must_use]
    pub fn new(
        directory: Arc<dyn IdentityDirectory>,
        onboarding: Arc<dyn OnboardingRepository>,
    ) -> Self {
        Self {
            directory,
            onboarding,
        }
    }

    /// Records the sign-in and returns the session identity.
    pub async fn exchange(
        &self,
        contact: &str,
        display_name: Option<&str>,
    ) -> AppResult<SessionExchange> {
        let email = EmailAddress::new(contact)?;
        let display_name = display_name
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| email.local_part())
            .to_owned();

        let record = self
            .directory
            .record_sign_in(&email, display_name.as_str())
            .await?;
        let requires_onboarding = self
            .onboarding
            .completed_at(record.identity.user_id)
            .await?
            .is_none();

        info!(
            subject = %record.identity.user_id,
            first_sign_in = record.first_sign_in,
            requires_onboarding,
            "session identity exchanged"
        );

        Ok(SessionExchange {
            identity: record.identity.to_session_identity(),
            requires_onboarding,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use tokio::sync::Mutex;
    use voxgate_core::{AppError, AppResult, UserRole};
    use voxgate_domain::{EmailAddress, OnboardingAnswers, OnboardingCompletion, UserId};

    use super::SessionExchangeService;
    use crate::{DirectoryIdentity, IdentityDirectory, OnboardingRepository, SignInRecord};

    #[derive(Default)]
    struct FakeIdentityDirectory {
        identities: Mutex<HashMap<String, (DirectoryIdentity, bool)>>,
    }

    #[async_trait]
    impl IdentityDirectory for FakeIdentityDirectory {
        async fn find_by_contact(
            &self,
            email: &EmailAddress,
        ) -> AppResult<Option<DirectoryIdentity>> {
            Ok(self
                .identities
                .lock()
                .await
                .get(email.as_str())
                .map(|(identity, _)| identity.clone()))
        }

        async fn record_sign_in(
            &self,
            email: &EmailAddress,
            display_name: &str,
        ) -> AppResult<SignInRecord> {
            let mut identities = self.identities.lock().await;
            let entry = identities.entry(email.as_str().to_owned()).or_insert_with(|| {
                (
                    DirectoryIdentity {
                        user_id: UserId::new(),
                        email: email.as_str().to_owned(),
                        display_name: display_name.to_owned(),
                        role: UserRole::Member,
                    },
                    false,
                )
            });

            let first_sign_in = !entry.1;
            entry.1 = true;

            Ok(SignInRecord {
                identity: entry.0.clone(),
                first_sign_in,
            })
        }
    }

    #[derive(Default)]
    struct FakeOnboardingRepository {
        completed: Mutex<HashMap<UserId, DateTime<Utc>>>,
    }

    #[async_trait]
    impl OnboardingRepository for FakeOnboardingRepository {
        async fn completed_at(&self, subject: UserId) -> AppResult<Option<DateTime<Utc>>> {
            Ok(self.completed.lock().await.get(&subject).copied())
        }

        async fn save_completion(&self, completion: OnboardingCompletion) -> AppResult<()> {
            self.completed
                .lock()
                .await
                .insert(completion.subject(), completion.completed_at());
            Ok(())
        }
    }

    fn service_with(
        directory: Arc<FakeIdentityDirectory>,
        onboarding: Arc<FakeOnboardingRepository>,
    ) -> SessionExchangeService {
        SessionExchangeService::new(directory, onboarding)
    }

    fn service() -> SessionExchangeService {
        service_with(
            Arc::new(FakeIdentityDirectory::default()),
            Arc::new(FakeOnboardingRepository::default()),
        )
    }

    #[tokio::test]
    async fn onboarding_is_required_until_completed() {
        let onboarding = Arc::new(FakeOnboardingRepository::default());
        let service = service_with(
            Arc::new(FakeIdentityDirectory::default()),
            onboarding.clone(),
        );

        let first = service.exchange("New@Example.com", None).await;
        let abandoned = service.exchange("new@example.com", None).await;

        let (Ok(first), Ok(abandoned)) = (first, abandoned) else {
            panic!("exchange should succeed");
        };
        assert!(first.requires_onboarding);
        assert!(abandoned.requires_onboarding);
        assert_eq!(first.identity.subject(), abandoned.identity.subject());
        assert_eq!(first.identity.display_name(), "new");
        assert_eq!(first.identity.email(), Some("new@example.com"));
        assert_eq!(first.identity.role(), Some(UserRole::Member));

        let subject = first
            .identity
            .subject()
            .parse::<UserId>()
            .unwrap_or_else(|_| panic!("directory subject"));
        let saved = onboarding
            .save_completion(OnboardingCompletion::new(
                subject,
                OnboardingAnswers::skipped(),
                Utc::now(),
            ))
            .await;
        assert!(saved.is_ok());

        let returning = service.exchange("new@example.com", None).await;
        assert!(matches!(returning, Ok(ref value) if !value.requires_onboarding));
    }

    #[tokio::test]
    async fn directory_role_becomes_session_claim() {
        let directory = Arc::new(FakeIdentityDirectory::default());
        directory.identities.lock().await.insert(
            "ops@example.com".to_owned(),
            (
                DirectoryIdentity {
                    user_id: UserId::new(),
                    email: "ops@example.com".to_owned(),
                    display_name: "Ops".to_owned(),
                    role: UserRole::Admin,
                },
                true,
            ),
        );
        let service = service_with(directory, Arc::new(FakeOnboardingRepository::default()));

        let exchanged = service.exchange("ops@example.com", Some("Ignored")).await;

        assert!(matches!(exchanged, Ok(ref value) if value.identity.is_admin()));
    }

    #[tokio::test]
    async fn malformed_contact_is_rejected() {
        let exchanged = service().exchange("not-an-email", None).await;

        assert!(matches!(exchanged, Err(AppError::Validation(_))));
    }
}
