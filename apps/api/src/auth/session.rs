use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tower_sessions::Session;
use tracing::info;
use voxgate_core::{AppError, UserIdentity};

use crate::dto::{SessionExchangeRequest, SessionExchangeResponse, UserIdentityResponse};
use crate::error::ApiResult;
use crate::state::AppState;

use super::SESSION_USER_KEY;
use super::redirect::{onboarding_location, safe_redirect_target};

pub async fn session_exchange_handler(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<SessionExchangeRequest>,
) -> ApiResult<Json<SessionExchangeResponse>> {
    if payload.token != state.exchange_token {
        return Err(AppError::Unauthorized("invalid exchange token".to_owned()).into());
    }

    let exchange = state
        .session_exchange_service
        .exchange(payload.email.as_str(), payload.display_name.as_deref())
        .await?;

    session
        .cycle_id()
        .await
        .map_err(|error| AppError::Internal(format!("failed to cycle session id: {error}")))?;

    session
        .insert(SESSION_USER_KEY, &exchange.identity)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to persist session identity: {error}"))
        })?;

    let target = safe_redirect_target(
        payload.redirect_to.as_deref(),
        state.access_boundary.dashboard_prefix.as_str(),
    );
    let redirect_to = if exchange.requires_onboarding {
        onboarding_location(target.as_str())
    } else {
        target
    };

    info!(
        subject = exchange.identity.subject(),
        requires_onboarding = exchange.requires_onboarding,
        "session established"
    );

    Ok(Json(SessionExchangeResponse {
        redirect_to,
        requires_onboarding: exchange.requires_onboarding,
        user: UserIdentityResponse::from(exchange.identity),
    }))
}

pub async fn logout_handler(session: Session) -> ApiResult<StatusCode> {
    let subject = session
        .get::<UserIdentity>(SESSION_USER_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session identity: {error}")))?
        .map(|identity| identity.subject().to_owned());

    session
        .flush()
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete session: {error}")))?;

    if let Some(subject) = subject {
        info!(%subject, "session ended");
    }

    Ok(StatusCode::NO_CONTENT)
}

pub async fn me_handler(session: Session) -> ApiResult<Json<UserIdentityResponse>> {
    let identity = session
        .get::<UserIdentity>(SESSION_USER_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session identity: {error}")))?
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    Ok(Json(UserIdentityResponse::from(identity)))
}
