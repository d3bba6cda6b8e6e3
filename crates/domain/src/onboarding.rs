use std::str::FromStr;

use chrono::{DateTime, Utc};
use voxgate_core::AppError;

use crate::UserId;

/// Self-reported account type collected during onboarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserType {
    /// Individual learning or evaluating the product.
    Student,
    /// Individual using the product for work.
    Professional,
    /// Team or company account.
    Business,
    /// Anything else.
    Other,
}

impl UserType {
    /// Returns a stable storage value for this type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Professional => "professional",
            Self::Business => "business",
            Self::Other => "other",
        }
    }
}

impl FromStr for UserType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "student" => Ok(Self::Student),
            "professional" => Ok(Self::Professional),
            "business" => Ok(Self::Business),
            "other" => Ok(Self::Other),
            _ => Err(AppError::Validation(format!(
                "unknown user type value '{value}'"
            ))),
        }
    }
}

/// How the user heard about the product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferralSource {
    /// Search engine.
    Search,
    /// Social media post.
    SocialMedia,
    /// Personal recommendation.
    Friend,
    /// Paid advertisement.
    Advertisement,
    /// Anything else.
    Other,
}

impl ReferralSource {
    /// Returns a stable storage value for this source.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::SocialMedia => "social_media",
            Self::Friend => "friend",
            Self::Advertisement => "advertisement",
            Self::Other => "other",
        }
    }
}

impl FromStr for ReferralSource {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "search" => Ok(Self::Search),
            "social_media" => Ok(Self::SocialMedia),
            "friend" => Ok(Self::Friend),
            "advertisement" => Ok(Self::Advertisement),
            "other" => Ok(Self::Other),
            _ => Err(AppError::Validation(format!(
                "unknown referral source value '{value}'"
            ))),
        }
    }
}

/// Answers recorded when onboarding is finished or skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OnboardingAnswers {
    user_type: Option<UserType>,
    is_developer: bool,
    interested_in_ai: bool,
    referral_source: Option<ReferralSource>,
    skipped: bool,
}

impl OnboardingAnswers {
    /// Answers from a completed questionnaire.
    #[must_use]
    pub fn answered(
        user_type: UserType,
        is_developer: bool,
        interested_in_ai: bool,
        referral_source: Option<ReferralSource>,
    ) -> Self {
        Self {
            user_type: Some(user_type),
            is_developer,
            interested_in_ai,
            referral_source,
            skipped: false,
        }
    }

    /// Marker for a questionnaire the user chose to skip.
    #[must_use]
    pub fn skipped() -> Self {
        Self {
            user_type: None,
            is_developer: false,
            interested_in_ai: false,
            referral_source: None,
            skipped: true,
        }
    }

    /// Returns the reported account type.
    #[must_use]
    pub fn user_type(&self) -> Option<UserType> {
        self.user_type
    }

    /// Returns whether the user builds software.
    #[must_use]
    pub fn is_developer(&self) -> bool {
        self.is_developer
    }

    /// Returns whether the user wants AI features.
    #[must_use]
    pub fn interested_in_ai(&self) -> bool {
        self.interested_in_ai
    }

    /// Returns the reported referral source.
    #[must_use]
    pub fn referral_source(&self) -> Option<ReferralSource> {
        self.referral_source
    }

    /// Returns whether the questionnaire was skipped.
    #[must_use]
    pub fn is_skipped(&self) -> bool {
        self.skipped
    }
}

/// Onboarding state of one subject. Either outcome ends the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OnboardingCompletion {
    subject: UserId,
    answers: OnboardingAnswers,
    completed_at: DateTime<Utc>,
}

impl OnboardingCompletion {
    /// Records `answers` for `subject` at `completed_at`.
    #[must_use]
    pub fn new(subject: UserId, answers: OnboardingAnswers, completed_at: DateTime<Utc>) -> Self {
        Self {
            subject,
            answers,
            completed_at,
        }
    }

    /// Returns the onboarded subject.
    #[must_use]
    pub fn subject(&self) -> UserId {
        self.subject
    }

    /// Returns the recorded answers.
    #[must_use]
    pub fn answers(&self) -> &OnboardingAnswers {
        &self.answers
    }

    /// Returns when onboarding ended.
    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }
}
