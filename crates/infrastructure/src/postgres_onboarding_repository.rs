use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use voxgate_application::OnboardingRepository;
use voxgate_core::{AppError, AppResult};
use voxgate_domain::{OnboardingCompletion, UserId};

/// PostgreSQL-backed onboarding record per subject.
#[derive(Clone)]
pub struct PostgresOnboardingRepository {
    pool: PgPool,
}

impl PostgresOnboardingRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OnboardingRepository for PostgresOnboardingRepository {
    async fn completed_at(&self, subject: UserId) -> AppResult<Option<DateTime<Utc>>> {
        sqlx::query_scalar::<_, DateTime<Utc>>(
            r#"
            SELECT completed_at
            FROM user_onboarding
            WHERE user_id = $1
            "#,
        )
        .bind(subject.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to load onboarding state for subject '{subject}': {error}"
            ))
        })
    }

    async fn save_completion(&self, completion: OnboardingCompletion) -> AppResult<()> {
        let subject = completion.subject();
        let answers = completion.answers();

        sqlx::query(
            r#"
            INSERT INTO user_onboarding (
                user_id,
                user_type,
                is_developer,
                interested_in_ai,
                referral_source,
                skipped,
                completed_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (user_id) DO UPDATE
            SET user_type = EXCLUDED.user_type,
                is_developer = EXCLUDED.is_developer,
                interested_in_ai = EXCLUDED.interested_in_ai,
                referral_source = EXCLUDED.referral_source,
                skipped = EXCLUDED.skipped,
                completed_at = EXCLUDED.completed_at
            "#,
        )
        .bind(subject.as_uuid())
        .bind(answers.user_type().map(|value| value.as_str()))
        .bind(answers.is_developer())
        .bind(answers.interested_in_ai())
        .bind(answers.referral_source().map(|value| value.as_str()))
        .bind(answers.is_skipped())
        .bind(completion.completed_at())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to store onboarding for subject '{subject}': {error}"
            ))
        })?;

        Ok(())
    }
}
