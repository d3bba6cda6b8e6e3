//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod in_memory_access_grant_repository;
mod postgres_access_grant_repository;
mod postgres_audit_repository;
mod postgres_contact_submission_repository;
mod postgres_identity_directory;
mod postgres_onboarding_repository;

pub use in_memory_access_grant_repository::InMemoryAccessGrantRepository;
pub use postgres_access_grant_repository::PostgresAccessGrantRepository;
pub use postgres_audit_repository::PostgresAuditRepository;
pub use postgres_contact_submission_repository::PostgresContactSubmissionRepository;
pub use postgres_identity_directory::PostgresIdentityDirectory;
pub use postgres_onboarding_repository::PostgresOnboardingRepository;
