use std::sync::Arc;

use voxgate_application::{
    AccessAdminService, AccessEvaluator, Clock, ContactService, OnboardingService,
    SessionExchangeService,
};

use crate::boundary::AccessBoundaryConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub access_evaluator: AccessEvaluator,
    pub access_admin_service: AccessAdminService,
    pub session_exchange_service: SessionExchangeService,
    pub contact_service: ContactService,
    pub onboarding_service: OnboardingService,
    pub clock: Arc<dyn Clock>,
    pub access_boundary: AccessBoundaryConfig,
    pub public_site_url: String,
    pub exchange_token: String,
}
