use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use voxgate_application::AccessGrantListing;
use voxgate_core::{AppError, AppResult};
use voxgate_domain::{AccessGrant, AccessWindow};

/// Incoming payload for granting dashboard access.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/grant-dashboard-access-request.ts"
)]
pub struct GrantDashboardAccessRequest {
    pub email: String,
    /// RFC 3339 instant.
    pub start_time: String,
    /// RFC 3339 instant.
    pub end_time: String,
}

impl GrantDashboardAccessRequest {
    /// Parses the window bounds.
    pub fn window_bounds(&self) -> AppResult<(DateTime<Utc>, DateTime<Utc>)> {
        Ok((
            parse_instant("start_time", self.start_time.as_str())?,
            parse_instant("end_time", self.end_time.as_str())?,
        ))
    }
}

/// Incoming payload for revoking dashboard access.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/revoke-dashboard-access-request.ts"
)]
pub struct RevokeDashboardAccessRequest {
    pub user_id: String,
}

/// Pagination for the admin grant listing.
#[derive(Debug, Default, Deserialize)]
pub struct ListDashboardAccessQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// API representation of a stored grant.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/dashboard-access-grant-response.ts"
)]
pub struct DashboardAccessGrantResponse {
    pub user_id: String,
    pub email: Option<String>,
    pub allowed: bool,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub granted_by: String,
    pub granted_at: String,
}

impl From<AccessGrant> for DashboardAccessGrantResponse {
    fn from(grant: AccessGrant) -> Self {
        Self {
            user_id: grant.subject().to_string(),
            email: None,
            allowed: grant.allowed(),
            start_time: grant.window_start().map(format_instant),
            end_time: grant.window_end().map(format_instant),
            granted_by: grant.granted_by().to_owned(),
            granted_at: format_instant(grant.granted_at()),
        }
    }
}

impl From<AccessGrantListing> for DashboardAccessGrantResponse {
    fn from(listing: AccessGrantListing) -> Self {
        Self {
            email: listing.subject_email,
            ..Self::from(listing.grant)
        }
    }
}

/// The caller's active dashboard window.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/dashboard-access-window-response.ts"
)]
pub struct DashboardAccessWindowResponse {
    pub subject: String,
    pub start_time: String,
    pub end_time: String,
}

impl DashboardAccessWindowResponse {
    pub fn new(subject: &str, window: &AccessWindow) -> Self {
        Self {
            subject: subject.to_owned(),
            start_time: format_instant(window.start()),
            end_time: format_instant(window.end()),
        }
    }
}

fn format_instant(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn parse_instant(field: &str, value: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|error| {
            AppError::Validation(format!("{field} must be an RFC 3339 timestamp: {error}"))
        })
}
