use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tower_sessions::{MemoryStore, Session};
use voxgate_application::{
    AccessAdminService, AccessEvaluator, AccessGrantListing, AccessGrantQuery,
    AccessGrantRepository, AuditEvent, AuditRepository, Clock, ContactService,
    ContactSubmissionRepository, DirectoryIdentity, IdentityDirectory, OnboardingRepository,
    OnboardingService, SessionExchangeService, SignInRecord,
};
use voxgate_core::{AppError, AppResult, UserIdentity, UserRole};
use voxgate_domain::{
    AccessGrant, ContactMessage, EmailAddress, OnboardingAnswers, OnboardingCompletion, UserId,
};
use voxgate_infrastructure::InMemoryAccessGrantRepository;

use crate::boundary::AccessBoundaryConfig;
use crate::state::AppState;

pub(crate) const EXCHANGE_TOKEN: &str = "exchange-token-for-tests";
pub(crate) const SITE_URL: &str = "http://localhost:3000";

pub(crate) fn at(value: &str) -> DateTime<Utc> {
    value
        .parse::<DateTime<Utc>>()
        .unwrap_or_else(|_| panic!("invalid test instant '{value}'"))
}

pub(crate) fn test_session() -> Session {
    Session::new(None, Arc::new(MemoryStore::default()), None)
}

pub(crate) fn admin_identity() -> UserIdentity {
    UserIdentity::new(
        UserId::new().to_string(),
        "Operator",
        Some("ops@voxgate.example".to_owned()),
        Some(UserRole::Admin),
    )
}

pub(crate) fn member_identity(subject: UserId) -> UserIdentity {
    UserIdentity::new(
        subject.to_string(),
        "Customer",
        None,
        Some(UserRole::Member),
    )
}

pub(crate) struct FixedClock(pub(crate) DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[derive(Default)]
pub(crate) struct FakeIdentityDirectory {
    identities: Mutex<HashMap<String, (DirectoryIdentity, bool)>>,
}

impl FakeIdentityDirectory {
    /// Adds a subject that has signed in before.
    pub(crate) async fn register(&self, email: &str, role: UserRole) -> DirectoryIdentity {
        let identity = DirectoryIdentity {
            user_id: UserId::new(),
            email: email.to_owned(),
            display_name: email.to_owned(),
            role,
        };
        self.identities
            .lock()
            .await
            .insert(email.to_owned(), (identity.clone(), true));
        identity
    }
}

#[async_trait]
impl IdentityDirectory for FakeIdentityDirectory {
    async fn find_by_contact(&self, email: &EmailAddress) -> AppResult<Option<DirectoryIdentity>> {
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
        let (identity, signed_in_before) = identities
            .entry(email.as_str().to_owned())
            .or_insert_with(|| {
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

        let record = SignInRecord {
            identity: identity.clone(),
            first_sign_in: !*signed_in_before,
        };
        *signed_in_before = true;
        Ok(record)
    }
}

#[derive(Default)]
pub(crate) struct RecordingAuditRepository {
    pub(crate) events: Mutex<Vec<AuditEvent>>,
}

#[async_trait]
impl AuditRepository for RecordingAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        self.events.lock().await.push(event);
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct RecordingContactRepository {
    pub(crate) messages: Mutex<Vec<ContactMessage>>,
}

#[async_trait]
impl ContactSubmissionRepository for RecordingContactRepository {
    async fn save_submission(&self, message: ContactMessage) -> AppResult<()> {
        self.messages.lock().await.push(message);
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct RecordingOnboardingRepository {
    pub(crate) completions: Mutex<HashMap<UserId, OnboardingCompletion>>,
}

#[async_trait]
impl OnboardingRepository for RecordingOnboardingRepository {
    async fn completed_at(&self, subject: UserId) -> AppResult<Option<DateTime<Utc>>> {
        Ok(self
            .completions
            .lock()
            .await
            .get(&subject)
            .map(OnboardingCompletion::completed_at))
    }

    async fn save_completion(&self, completion: OnboardingCompletion) -> AppResult<()> {
        self.completions
            .lock()
            .await
            .insert(completion.subject(), completion);
        Ok(())
    }
}

/// Grant store whose backend is down.
pub(crate) struct UnavailableGrantRepository;

#[async_trait]
impl AccessGrantRepository for UnavailableGrantRepository {
    async fn latest_grant(&self, _subject: UserId) -> AppResult<Option<AccessGrant>> {
        Err(AppError::Internal("grant store unavailable".to_owned()))
    }

    async fn upsert_grant(&self, _grant: AccessGrant) -> AppResult<()> {
        Err(AppError::Internal("grant store unavailable".to_owned()))
    }

    async fn list_grants(&self, _query: AccessGrantQuery) -> AppResult<Vec<AccessGrantListing>> {
        Err(AppError::Internal("grant store unavailable".to_owned()))
    }
}

/// Grant store that answers only after `delay`.
pub(crate) struct StalledGrantRepository {
    pub(crate) delay: Duration,
}

#[async_trait]
impl AccessGrantRepository for StalledGrantRepository {
    async fn latest_grant(&self, _subject: UserId) -> AppResult<Option<AccessGrant>> {
        tokio::time::sleep(self.delay).await;
        Ok(None)
    }

    async fn upsert_grant(&self, _grant: AccessGrant) -> AppResult<()> {
        tokio::time::sleep(self.delay).await;
        Ok(())
    }

    async fn list_grants(&self, _query: AccessGrantQuery) -> AppResult<Vec<AccessGrantListing>> {
        tokio::time::sleep(self.delay).await;
        Ok(Vec::new())
    }
}

pub(crate) struct TestHarness {
    pub(crate) state: AppState,
    pub(crate) grants: Arc<InMemoryAccessGrantRepository>,
    pub(crate) directory: Arc<FakeIdentityDirectory>,
    pub(crate) audit: Arc<RecordingAuditRepository>,
    pub(crate) contacts: Arc<RecordingContactRepository>,
    pub(crate) onboarding: Arc<RecordingOnboardingRepository>,
}

impl TestHarness {
    /// Adds a returning subject that already went through onboarding.
    pub(crate) async fn register_onboarded(&self, email: &str, role: UserRole) -> DirectoryIdentity {
        let identity = self.directory.register(email, role).await;
        let saved = self
            .onboarding
            .save_completion(OnboardingCompletion::new(
                identity.user_id,
                OnboardingAnswers::skipped(),
                self.state.clock.now(),
            ))
            .await;
        assert!(saved.is_ok());
        identity
    }
}

/// State over in-memory stores with the clock pinned at `now`.
pub(crate) fn harness(now: DateTime<Utc>) -> TestHarness {
    let grants = Arc::new(InMemoryAccessGrantRepository::new());
    let directory = Arc::new(FakeIdentityDirectory::default());
    let audit = Arc::new(RecordingAuditRepository::default());
    let contacts = Arc::new(RecordingContactRepository::default());
    let onboarding = Arc::new(RecordingOnboardingRepository::default());

    let state = build_state(
        grants.clone(),
        directory.clone(),
        audit.clone(),
        contacts.clone(),
        onboarding.clone(),
        now,
    );

    TestHarness {
        state,
        grants,
        directory,
        audit,
        contacts,
        onboarding,
    }
}

/// State whose grant store is `grants`, for failure-mode tests.
pub(crate) fn state_with_grant_store(
    grants: Arc<dyn AccessGrantRepository>,
    now: DateTime<Utc>,
) -> AppState {
    build_state(
        grants,
        Arc::new(FakeIdentityDirectory::default()),
        Arc::new(RecordingAuditRepository::default()),
        Arc::new(RecordingContactRepository::default()),
        Arc::new(RecordingOnboardingRepository::default()),
        now,
    )
}

fn build_state(
    grants: Arc<dyn AccessGrantRepository>,
    directory: Arc<dyn IdentityDirectory>,
    audit: Arc<dyn AuditRepository>,
    contacts: Arc<dyn ContactSubmissionRepository>,
    onboarding: Arc<dyn OnboardingRepository>,
    now: DateTime<Utc>,
) -> AppState {
    let clock: Arc<dyn Clock> = Arc::new(FixedClock(now));

    AppState {
        access_evaluator: AccessEvaluator::new(grants.clone()),
        access_admin_service: AccessAdminService::new(
            directory.clone(),
            grants,
            audit,
            clock.clone(),
        ),
        session_exchange_service: SessionExchangeService::new(directory, onboarding.clone()),
        contact_service: ContactService::new(contacts),
        onboarding_service: OnboardingService::new(onboarding, clock.clone()),
        clock,
        access_boundary: AccessBoundaryConfig {
            evaluation_timeout: Duration::from_millis(50),
            ..AccessBoundaryConfig::default()
        },
        public_site_url: SITE_URL.to_owned(),
        exchange_token: EXCHANGE_TOKEN.to_owned(),
    }
}
