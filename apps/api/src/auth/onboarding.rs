use axum::Json;
use axum::extract::State;
use chrono::SecondsFormat;
use tower_sessions::Session;
use voxgate_application::OnboardingInput;
use voxgate_core::{AppError, UserIdentity};

use crate::dto::{OnboardingRequest, OnboardingResponse};
use crate::error::ApiResult;
use crate::state::AppState;

use super::SESSION_USER_KEY;
use super::redirect::safe_redirect_target;

/// Records completion or skip of onboarding for the session subject.
pub async fn onboarding_handler(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<OnboardingRequest>,
) -> ApiResult<Json<OnboardingResponse>> {
    let identity = session
        .get::<UserIdentity>(SESSION_USER_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session identity: {error}")))?
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    let completion = state
        .onboarding_service
        .complete(
            &identity,
            OnboardingInput {
                user_type: payload.user_type,
                is_developer: payload.is_developer,
                interested_in_ai: payload.interested_in_ai,
                referral_source: payload.referral_source,
                skipped: payload.skipped,
            },
        )
        .await?;

    Ok(Json(OnboardingResponse {
        redirect_to: safe_redirect_target(
            payload.redirect_to.as_deref(),
            state.access_boundary.dashboard_prefix.as_str(),
        ),
        completed_at: completion
            .completed_at()
            .to_rfc3339_opts(SecondsFormat::Secs, true),
    }))
}
