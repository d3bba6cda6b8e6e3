//! Application services and ports.

#![forbid(unsafe_code)]

mod access_admin_service;
mod access_evaluator;
mod access_ports;
mod audit_ports;
mod clock;
mod contact_service;
mod onboarding_service;
mod session_exchange_service;

pub use access_admin_service::{AccessAdminService, GrantAccessInput};
pub use access_evaluator::AccessEvaluator;
pub use access_ports::{
    AccessGrantListing, AccessGrantQuery, AccessGrantRepository, DirectoryIdentity,
    IdentityDirectory, SignInRecord,
};
pub use audit_ports::{AuditEvent, AuditRepository};
pub use clock::{Clock, SystemClock};
pub use contact_service::{ContactService, ContactSubmissionRepository};
pub use onboarding_service::{OnboardingInput, OnboardingRepository, OnboardingService};
pub use session_exchange_service::{SessionExchange, SessionExchangeService};
