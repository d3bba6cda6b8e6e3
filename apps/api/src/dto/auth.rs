use serde::{Deserialize, Serialize};
use ts_rs::TS;
use voxgate_core::UserIdentity;

/// Incoming payload from the sign-in frontend after upstream verification.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/session-exchange-request.ts"
)]
pub struct SessionExchangeRequest {
    pub token: String,
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub redirect_to: Option<String>,
}

/// Result of a successful session exchange.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/session-exchange-response.ts"
)]
pub struct SessionExchangeResponse {
    pub redirect_to: String,
    pub requires_onboarding: bool,
    pub user: UserIdentityResponse,
}

/// API representation of the authenticated user.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/user-identity-response.ts"
)]
pub struct UserIdentityResponse {
    pub subject: String,
    pub display_name: String,
    pub email: Option<String>,
    pub role: Option<String>,
}

impl From<UserIdentity> for UserIdentityResponse {
    fn from(identity: UserIdentity) -> Self {
        Self {
            subject: identity.subject().to_owned(),
            display_name: identity.display_name().to_owned(),
            email: identity.email().map(ToOwned::to_owned),
            role: identity.role().map(|role| role.as_str().to_owned()),
        }
    }
}
