use std::str::FromStr;

use axum::Json;
use axum::extract::{Extension, Query, State};
use axum::http::StatusCode;
use voxgate_application::{AccessGrantQuery, GrantAccessInput};
use voxgate_core::UserIdentity;
use voxgate_domain::{EmailAddress, UserId};

use crate::dto::{
    DashboardAccessGrantResponse, GrantDashboardAccessRequest, ListDashboardAccessQuery,
    RevokeDashboardAccessRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_dashboard_access_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(query): Query<ListDashboardAccessQuery>,
) -> ApiResult<Json<Vec<DashboardAccessGrantResponse>>> {
    let defaults = AccessGrantQuery::default();
    let listings = state
        .access_admin_service
        .list_grants(
            &user,
            AccessGrantQuery {
                allowed_only: true,
                limit: query.limit.unwrap_or(defaults.limit),
                offset: query.offset.unwrap_or(defaults.offset),
            },
        )
        .await?;

    Ok(Json(
        listings
            .into_iter()
            .map(DashboardAccessGrantResponse::from)
            .collect(),
    ))
}

pub async fn grant_dashboard_access_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<GrantDashboardAccessRequest>,
) -> ApiResult<(StatusCode, Json<DashboardAccessGrantResponse>)> {
    let (window_start, window_end) = payload.window_bounds()?;
    let grant = state
        .access_admin_service
        .grant(
            &user,
            GrantAccessInput {
                contact: payload.email.clone(),
                window_start,
                window_end,
            },
        )
        .await?;

    // The grant resolved this contact, so it normalizes.
    let email = EmailAddress::new(payload.email)
        .ok()
        .map(|email| email.as_str().to_owned());

    Ok((
        StatusCode::OK,
        Json(DashboardAccessGrantResponse {
            email,
            ..DashboardAccessGrantResponse::from(grant)
        }),
    ))
}

pub async fn revoke_dashboard_access_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<RevokeDashboardAccessRequest>,
) -> ApiResult<Json<DashboardAccessGrantResponse>> {
    let subject = UserId::from_str(payload.user_id.trim())?;
    let grant = state.access_admin_service.revoke(&user, subject).await?;

    Ok(Json(DashboardAccessGrantResponse::from(grant)))
}
