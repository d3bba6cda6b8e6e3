//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod access;
mod contact;
mod onboarding;
mod security;
mod user;

pub use access::{AccessDecision, AccessGrant, AccessWindow, DenialReason};
pub use contact::{CONTACT_MESSAGE_MAX_LENGTH, ContactMessage};
pub use onboarding::{OnboardingAnswers, OnboardingCompletion, ReferralSource, UserType};
pub use security::AuditAction;
pub use user::{EmailAddress, UserId};
