use serde::Deserialize;
use ts_rs::TS;

/// Incoming payload for the public contact form.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/contact-request.ts"
)]
pub struct ContactRequest {
    pub email: String,
    pub message: String,
}
