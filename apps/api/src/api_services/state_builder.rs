use std::sync::Arc;

use sqlx::PgPool;
use voxgate_application::{
    AccessAdminService, AccessEvaluator, AccessGrantRepository, AuditRepository, Clock,
    ContactService, IdentityDirectory, OnboardingRepository, OnboardingService,
    SessionExchangeService, SystemClock,
};
use voxgate_infrastructure::{
    PostgresAccessGrantRepository, PostgresAuditRepository, PostgresContactSubmissionRepository,
    PostgresIdentityDirectory, PostgresOnboardingRepository,
};

use crate::api_config::ApiConfig;
use crate::state::AppState;

pub fn build_app_state(pool: PgPool, config: &ApiConfig) -> AppState {
    let grant_repository: Arc<dyn AccessGrantRepository> =
        Arc::new(PostgresAccessGrantRepository::new(pool.clone()));
    let identity_directory: Arc<dyn IdentityDirectory> =
        Arc::new(PostgresIdentityDirectory::new(pool.clone()));
    let audit_repository: Arc<dyn AuditRepository> =
        Arc::new(PostgresAuditRepository::new(pool.clone()));
    let onboarding_repository: Arc<dyn OnboardingRepository> =
        Arc::new(PostgresOnboardingRepository::new(pool.clone()));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    AppState {
        access_evaluator: AccessEvaluator::new(grant_repository.clone()),
        access_admin_service: AccessAdminService::new(
            identity_directory.clone(),
            grant_repository,
            audit_repository,
            clock.clone(),
        ),
        session_exchange_service: SessionExchangeService::new(
            identity_directory,
            onboarding_repository.clone(),
        ),
        contact_service: ContactService::new(Arc::new(PostgresContactSubmissionRepository::new(
            pool,
        ))),
        onboarding_service: OnboardingService::new(onboarding_repository, clock.clone()),
        clock,
        access_boundary: config.access_boundary.clone(),
        public_site_url: config.public_site_url.clone(),
        exchange_token: config.exchange_token.clone(),
    }
}
