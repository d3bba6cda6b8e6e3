use async_trait::async_trait;
use sqlx::PgPool;

use voxgate_application::ContactSubmissionRepository;
use voxgate_core::{AppError, AppResult};
use voxgate_domain::ContactMessage;

/// PostgreSQL-backed store for contact-form submissions.
#[derive(Clone)]
pub struct PostgresContactSubmissionRepository {
    pool: PgPool,
}

impl PostgresContactSubmissionRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContactSubmissionRepository for PostgresContactSubmissionRepository {
    async fn save_submission(&self, message: ContactMessage) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO contact_submissions (email, message)
            VALUES ($1, $2)
            "#,
        )
        .bind(message.email().as_str())
        .bind(message.message())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to store contact submission: {error}"))
        })?;

        Ok(())
    }
}
