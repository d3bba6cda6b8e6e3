use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Onboarding questionnaire answers, or a skip.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/onboarding-request.ts"
)]
pub struct OnboardingRequest {
    #[serde(default)]
    pub user_type: Option<String>,
    #[serde(default)]
    pub is_developer: bool,
    #[serde(default)]
    pub interested_in_ai: bool,
    #[serde(default)]
    pub referral_source: Option<String>,
    #[serde(default)]
    pub skipped: bool,
    #[serde(default)]
    pub redirect_to: Option<String>,
}

/// Where the client continues once onboarding is recorded.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/onboarding-response.ts"
)]
pub struct OnboardingResponse {
    pub redirect_to: String,
    pub completed_at: String,
}
