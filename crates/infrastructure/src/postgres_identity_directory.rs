//! PostgreSQL-backed identity directory.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use voxgate_application::{DirectoryIdentity, IdentityDirectory, SignInRecord};
use voxgate_core::{AppError, AppResult, UserRole};
use voxgate_domain::{EmailAddress, UserId};

/// PostgreSQL implementation of the identity directory port.
#[derive(Clone)]
pub struct PostgresIdentityDirectory {
    pool: PgPool,
}

impl PostgresIdentityDirectory {
    /// Creates a directory with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct DirectoryRow {
    id: uuid::Uuid,
    email: String,
    display_name: String,
    role: String,
}

impl TryFrom<DirectoryRow> for DirectoryIdentity {
    type Error = AppError;

    fn try_from(row: DirectoryRow) -> Result<Self, Self::Error> {
        let role = UserRole::from_str(row.role.as_str()).map_err(|_| {
            AppError::Internal(format!(
                "user '{}' has unsupported role '{}'",
                row.id, row.role
            ))
        })?;

        Ok(Self {
            user_id: UserId::from_uuid(row.id),
            email: row.email,
            display_name: row.display_name,
            role,
        })
    }
}

#[derive(Debug, FromRow)]
struct SignInRow {
    #[sqlx(flatten)]
    identity: DirectoryRow,
    first_sign_in: bool,
}

#[async_trait]
impl IdentityDirectory for PostgresIdentityDirectory {
    async fn find_by_contact(&self, email: &EmailAddress) -> AppResult<Option<DirectoryIdentity>> {
        let row = sqlx::query_as::<_, DirectoryRow>(
            r#"
            SELECT id, email, display_name, role
            FROM users
            WHERE LOWER(email) = LOWER($1)
            LIMIT 1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find user by email: {error}")))?;

        row.map(DirectoryIdentity::try_from).transpose()
    }

    async fn record_sign_in(
        &self,
        email: &EmailAddress,
        display_name: &str,
    ) -> AppResult<SignInRecord> {
        // The CTE reads the row as it was before this statement's write.
        let row = sqlx::query_as::<_, SignInRow>(
            r#"
            WITH previous AS (
                SELECT last_sign_in_at
                FROM users
                WHERE LOWER(email) = LOWER($1)
            )
            INSERT INTO users (email, display_name, last_sign_in_at)
            VALUES ($1, $2, now())
            ON CONFLICT ((LOWER(email))) DO UPDATE
            SET last_sign_in_at = now()
            RETURNING
                id,
                email,
                display_name,
                role,
                NOT EXISTS (
                    SELECT 1 FROM previous WHERE previous.last_sign_in_at IS NOT NULL
                ) AS first_sign_in
            "#,
        )
        .bind(email.as_str())
        .bind(display_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to record sign-in: {error}")))?;

        Ok(SignInRecord {
            identity: DirectoryIdentity::try_from(row.identity)?,
            first_sign_in: row.first_sign_in,
        })
    }
}

#[cfg(test)]
mod tests {
    use sqlx::migrate::Migrator;
    use sqlx::postgres::PgPoolOptions;
    use voxgate_application::IdentityDirectory;
    use voxgate_core::UserRole;
    use voxgate_domain::{EmailAddress, UserId};

    use super::PostgresIdentityDirectory;

    static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

    async fn test_directory() -> Option<PostgresIdentityDirectory> {
        let Ok(database_url) = std::env::var("DATABASE_URL") else {
            return None;
        };

        let pool = match PgPoolOptions::new()
            .max_connections(2)
            .connect(database_url.as_str())
            .await
        {
            Ok(pool) => pool,
            Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
        };

        if let Err(error) = MIGRATOR.run(&pool).await {
            panic!("failed to run migrations for identity directory tests: {error}");
        }

        Some(PostgresIdentityDirectory::new(pool))
    }

    #[tokio::test]
    async fn first_sign_in_is_reported_once() {
        let Some(directory) = test_directory().await else {
            return;
        };
        let email = EmailAddress::new(format!("{}@example.com", UserId::new()))
            .unwrap_or_else(|_| panic!("test email"));

        let first = directory.record_sign_in(&email, "First").await;
        let second = directory.record_sign_in(&email, "Second").await;

        let (Ok(first), Ok(second)) = (first, second) else {
            panic!("expected both sign-ins to be recorded");
        };
        assert!(first.first_sign_in);
        assert!(!second.first_sign_in);
        assert_eq!(first.identity.user_id, second.identity.user_id);
        assert_eq!(second.identity.display_name, "First");
        assert_eq!(second.identity.role, UserRole::Member);
    }

    #[tokio::test]
    async fn contact_lookup_ignores_case() {
        let Some(directory) = test_directory().await else {
            return;
        };
        let local = UserId::new();
        let email = EmailAddress::new(format!("{local}@example.com"))
            .unwrap_or_else(|_| panic!("test email"));
        let recorded = directory.record_sign_in(&email, "Lookup").await;
        assert!(recorded.is_ok());

        let upper = EmailAddress::new(format!("{local}@EXAMPLE.com"))
            .unwrap_or_else(|_| panic!("test email"));
        let found = directory.find_by_contact(&upper).await;

        assert!(matches!(found, Ok(Some(ref identity)) if identity.email == email.as_str()));
    }
}
