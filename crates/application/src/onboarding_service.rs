use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::info;
use voxgate_core::{AppError, AppResult, UserIdentity};
use voxgate_domain::{
    OnboardingAnswers, OnboardingCompletion, ReferralSource, UserId, UserType,
};

use crate::Clock;

/// Port for the per-subject onboarding record.
#[async_trait]
pub trait OnboardingRepository: Send + Sync {
    /// Returns when `subject` finished or skipped onboarding, if ever.
    async fn completed_at(&self, subject: UserId) -> AppResult<Option<DateTime<Utc>>>;

    /// Stores the completion, replacing any earlier answers for the subject.
    async fn save_completion(&self, completion: OnboardingCompletion) -> AppResult<()>;
}

/// Raw questionnaire submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OnboardingInput {
    /// Account type storage value; required unless skipped.
    pub user_type: Option<String>,
    /// Whether the user builds software.
    pub is_developer: bool,
    /// Whether the user wants AI features.
    pub interested_in_ai: bool,
    /// Referral source storage value.
    pub referral_source: Option<String>,
    /// Ends onboarding without answers.
    pub skipped: bool,
}

impl OnboardingInput {
    fn into_answers(self) -> AppResult<OnboardingAnswers> {
        if self.skipped {
            return Ok(OnboardingAnswers::skipped());
        }

        let user_type = self
            .user_type
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| AppError::Validation("user type is required".to_owned()))
            .and_then(UserType::from_str)?;
        let referral_source = self
            .referral_source
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(ReferralSource::from_str)
            .transpose()?;

        Ok(OnboardingAnswers::answered(
            user_type,
            self.is_developer,
            self.interested_in_ai,
            referral_source,
        ))
    }
}

/// Records onboarding answers for signed-in subjects.
#[derive(Clone)]
pub struct OnboardingService {
    repository: Arc<dyn OnboardingRepository>,
    clock: Arc<dyn Clock>,
}

impl OnboardingService {
    /// Creates a new service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn OnboardingRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Completes or skips onboarding for the session subject.
    pub async fn complete(
        &self,
        actor: &UserIdentity,
        input: OnboardingInput,
    ) -> AppResult<OnboardingCompletion> {
        let subject = UserId::from_str(actor.subject())?;
        let completion =
            OnboardingCompletion::new(subject, input.into_answers()?, self.clock.now());

        self.repository.save_completion(completion).await?;

        info!(
            subject = %subject,
            skipped = completion.answers().is_skipped(),
            "onboarding completed"
        );

        Ok(completion)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone, Utc};
    use tokio::sync::Mutex;
    use voxgate_core::{AppError, AppResult, UserIdentity, UserRole};
    use voxgate_domain::{OnboardingCompletion, ReferralSource, UserId, UserType};

    use super::{OnboardingInput, OnboardingRepository, OnboardingService};
    use crate::Clock;

    #[derive(Default)]
    struct FakeOnboardingRepository {
        completions: Mutex<HashMap<UserId, OnboardingCompletion>>,
    }

    #[async_trait]
    impl OnboardingRepository for FakeOnboardingRepository {
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

    struct FixedClock;

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            Utc.with_ymd_and_hms(2025, 1, 15, 9, 30, 0)
                .single()
                .unwrap_or_else(|| panic!("fixed clock instant"))
        }
    }

    fn member(subject: UserId) -> UserIdentity {
        UserIdentity::new(subject.to_string(), "Customer", None, Some(UserRole::Member))
    }

    fn service(repository: Arc<FakeOnboardingRepository>) -> OnboardingService {
        OnboardingService::new(repository, Arc::new(FixedClock))
    }

    #[tokio::test]
    async fn answered_questionnaire_is_stored_with_clock_time() {
        let repository = Arc::new(FakeOnboardingRepository::default());
        let subject = UserId::new();

        let completed = service(repository.clone())
            .complete(
                &member(subject),
                OnboardingInput {
                    user_type: Some("business".to_owned()),
                    is_developer: true,
                    interested_in_ai: true,
                    referral_source: Some("friend".to_owned()),
                    skipped: false,
                },
            )
            .await;

        let Ok(completed) = completed else {
            panic!("expected onboarding to complete");
        };
        assert_eq!(completed.answers().user_type(), Some(UserType::Business));
        assert_eq!(
            completed.answers().referral_source(),
            Some(ReferralSource::Friend)
        );
        assert!(!completed.answers().is_skipped());

        let stored = repository.completed_at(subject).await;
        assert!(matches!(stored, Ok(Some(at)) if at == FixedClock.now()));
    }

    #[tokio::test]
    async fn skip_ends_onboarding_without_answers() {
        let repository = Arc::new(FakeOnboardingRepository::default());
        let subject = UserId::new();

        let completed = service(repository.clone())
            .complete(
                &member(subject),
                OnboardingInput {
                    user_type: Some("not-a-type".to_owned()),
                    skipped: true,
                    ..OnboardingInput::default()
                },
            )
            .await;

        assert!(matches!(completed, Ok(ref value) if value.answers().is_skipped()));
        assert!(matches!(repository.completed_at(subject).await, Ok(Some(_))));
    }

    #[tokio::test]
    async fn missing_or_unknown_answers_are_rejected_without_write() {
        let repository = Arc::new(FakeOnboardingRepository::default());
        let subject = UserId::new();
        let service = service(repository.clone());

        let missing = service
            .complete(&member(subject), OnboardingInput::default())
            .await;
        let unknown = service
            .complete(
                &member(subject),
                OnboardingInput {
                    user_type: Some("student".to_owned()),
                    referral_source: Some("podcast".to_owned()),
                    ..OnboardingInput::default()
                },
            )
            .await;

        assert!(matches!(missing, Err(AppError::Validation(_))));
        assert!(matches!(unknown, Err(AppError::Validation(_))));
        assert!(matches!(repository.completed_at(subject).await, Ok(None)));
    }
}
