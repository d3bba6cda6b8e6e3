mod access;
mod auth;
mod common;
mod contact;
mod onboarding;

pub use access::{
    DashboardAccessGrantResponse, DashboardAccessWindowResponse, GrantDashboardAccessRequest,
    ListDashboardAccessQuery, RevokeDashboardAccessRequest,
};
pub use auth::{SessionExchangeRequest, SessionExchangeResponse, UserIdentityResponse};
pub use common::{HealthResponse, SuccessResponse};
pub use contact::ContactRequest;
pub use onboarding::{OnboardingRequest, OnboardingResponse};
