//! PostgreSQL-backed dashboard access grant store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::warn;

use voxgate_application::{AccessGrantListing, AccessGrantQuery, AccessGrantRepository};
use voxgate_core::{AppError, AppResult};
use voxgate_domain::{AccessGrant, UserId};

/// PostgreSQL implementation of the grant store port.
#[derive(Clone)]
pub struct PostgresAccessGrantRepository {
    pool: PgPool,
}

impl PostgresAccessGrantRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AccessGrantRow {
    user_id: uuid::Uuid,
    allowed: bool,
    window_start: Option<DateTime<Utc>>,
    window_end: Option<DateTime<Utc>>,
    granted_by: String,
    granted_at: DateTime<Utc>,
}

impl From<AccessGrantRow> for AccessGrant {
    fn from(row: AccessGrantRow) -> Self {
        AccessGrant::from_stored(
            UserId::from_uuid(row.user_id),
            row.allowed,
            row.window_start,
            row.window_end,
            row.granted_by,
            row.granted_at,
        )
    }
}

#[derive(Debug, FromRow)]
struct AccessGrantListingRow {
    #[sqlx(flatten)]
    grant: AccessGrantRow,
    subject_email: Option<String>,
}

#[async_trait]
impl AccessGrantRepository for PostgresAccessGrantRepository {
    async fn latest_grant(&self, subject: UserId) -> AppResult<Option<AccessGrant>> {
        let row = sqlx::query_as::<_, AccessGrantRow>(
            r#"
            SELECT user_id, allowed, window_start, window_end, granted_by, granted_at
            FROM dashboard_access_grants
            WHERE user_id = $1
            ORDER BY granted_at DESC
            LIMIT 1
            "#,
        )
        .bind(subject.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to load dashboard access grant for subject '{subject}': {error}"
            ))
        })?;

        Ok(row.map(AccessGrant::from))
    }

    async fn upsert_grant(&self, grant: AccessGrant) -> AppResult<()> {
        let subject = grant.subject();

        sqlx::query(
            r#"
            INSERT INTO dashboard_access_grants (
                user_id,
                allowed,
                window_start,
                window_end,
                granted_by,
                granted_at
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id) DO UPDATE
            SET allowed = EXCLUDED.allowed,
                window_start = EXCLUDED.window_start,
                window_end = EXCLUDED.window_end,
                granted_by = EXCLUDED.granted_by,
                granted_at = EXCLUDED.granted_at
            "#,
        )
        .bind(subject.as_uuid())
        .bind(grant.allowed())
        .bind(grant.window_start())
        .bind(grant.window_end())
        .bind(grant.granted_by())
        .bind(grant.granted_at())
        .execute(&self.pool)
        .await
        .map_err(|error| map_upsert_error(error, subject))?;

        Ok(())
    }

    async fn list_grants(&self, query: AccessGrantQuery) -> AppResult<Vec<AccessGrantListing>> {
        let capped_limit = query.limit.clamp(1, 200) as i64;
        let capped_offset = query.offset.min(5_000) as i64;

        let rows = sqlx::query_as::<_, AccessGrantListingRow>(
            r#"
            SELECT
                grants.user_id,
                grants.allowed,
                grants.window_start,
                grants.window_end,
                grants.granted_by,
                grants.granted_at,
                users.email AS subject_email
            FROM dashboard_access_grants AS grants
            LEFT JOIN users
                ON users.id = grants.user_id
            WHERE ($1::BOOLEAN = false OR grants.allowed)
            ORDER BY grants.granted_at DESC, grants.user_id
            LIMIT $2
            OFFSET $3
            "#,
        )
        .bind(query.allowed_only)
        .bind(capped_limit)
        .bind(capped_offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list dashboard access grants: {error}"))
        })?;

        Ok(rows
            .into_iter()
            .map(|row| AccessGrantListing {
                grant: AccessGrant::from(row.grant),
                subject_email: row.subject_email,
            })
            .collect())
    }
}

fn map_upsert_error(error: sqlx::Error, subject: UserId) -> AppError {
    let is_unknown_subject = error
        .as_database_error()
        .is_some_and(|database_error| database_error.is_foreign_key_violation());

    if is_unknown_subject {
        warn!(%subject, "grant write referenced an unknown user");
        return AppError::NotFound(format!("user '{subject}' does not exist"));
    }

    AppError::Internal(format!(
        "failed to store dashboard access grant for subject '{subject}': {error}"
    ))
}
