//! Dashboard and admin access boundary.
//!
//! The boundary runs before routing for every request under the dashboard or
//! admin prefix. Outcomes are computed as a [`BoundaryDecision`] and only
//! then turned into a forward or a redirect, so denial never surfaces as an
//! error response.

use std::time::Duration;

use axum::extract::{Request, State};
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use chrono::{DateTime, SecondsFormat, Utc};
use tower_sessions::Session;
use tracing::{debug, error};
use url::form_urlencoded;
use voxgate_application::AccessEvaluator;
use voxgate_core::UserIdentity;
use voxgate_domain::{AccessDecision, AccessWindow, DenialReason};

use crate::auth::SESSION_USER_KEY;
use crate::state::AppState;

/// Response header carrying the active window start.
pub const ACCESS_START_HEADER: &str = "x-access-start";
/// Response header carrying the active window end.
pub const ACCESS_END_HEADER: &str = "x-access-end";

const REDIRECT_TO_PARAM: &str = "redirectTo";

/// Paths and limits the boundary enforces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessBoundaryConfig {
    pub dashboard_prefix: String,
    pub admin_prefix: String,
    pub sign_in_path: String,
    pub landing_path: String,
    pub evaluation_timeout: Duration,
}

impl Default for AccessBoundaryConfig {
    fn default() -> Self {
        Self {
            dashboard_prefix: "/dashboard".to_owned(),
            admin_prefix: "/admin".to_owned(),
            sign_in_path: "/signin".to_owned(),
            landing_path: "/".to_owned(),
            evaluation_timeout: Duration::from_millis(2_000),
        }
    }
}

impl AccessBoundaryConfig {
    /// Returns the protected area a request path falls under, if any.
    ///
    /// Matching is per path segment and the longest matching prefix wins.
    /// Redirect targets are never protected so a denial cannot loop.
    #[must_use]
    pub fn protected_area(&self, path: &str) -> Option<ProtectedArea> {
        if path == self.sign_in_path || path == self.landing_path {
            return None;
        }

        [
            (self.dashboard_prefix.as_str(), ProtectedArea::Dashboard),
            (self.admin_prefix.as_str(), ProtectedArea::Admin),
        ]
        .into_iter()
        .filter(|(prefix, _)| matches_prefix(path, prefix))
        .max_by_key(|(prefix, _)| prefix.len())
        .map(|(_, area)| area)
    }

    /// Builds the sign-in location carrying the original path and query.
    #[must_use]
    pub fn sign_in_location(&self, return_to: &str) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair(REDIRECT_TO_PARAM, return_to)
            .finish();
        let separator = if self.sign_in_path.contains('?') {
            '&'
        } else {
            '?'
        };

        format!("{}{separator}{query}", self.sign_in_path)
    }
}

fn matches_prefix(path: &str, prefix: &str) -> bool {
    if prefix == "/" {
        return path.starts_with('/');
    }

    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// Protected route family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtectedArea {
    /// Customer dashboard, gated by an active access window.
    Dashboard,
    /// Operator area, gated by the admin role claim.
    Admin,
}

/// Outcome of the boundary check for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundaryDecision {
    /// Forward the request. Dashboard allows carry the active window.
    Allow { window: Option<AccessWindow> },
    /// No session identity.
    Unauthenticated,
    /// Authenticated but without an active dashboard grant.
    Unauthorized(DenialReason),
    /// Authenticated but missing the admin role claim.
    Forbidden,
    /// The grant store failed or timed out; access is refused.
    EvaluationFailed,
}

impl BoundaryDecision {
    /// Returns where a refused request is sent, or `None` when it may proceed.
    #[must_use]
    pub fn redirect_location(
        &self,
        config: &AccessBoundaryConfig,
        return_to: &str,
    ) -> Option<String> {
        match self {
            Self::Allow { .. } => None,
            Self::Unauthenticated => Some(config.sign_in_location(return_to)),
            Self::Unauthorized(_) | Self::Forbidden | Self::EvaluationFailed => {
                Some(config.landing_path.clone())
            }
        }
    }
}

/// Access window of the current dashboard request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveAccessWindow(pub AccessWindow);

/// Decides the boundary outcome for a request in `area`.
pub async fn evaluate_boundary(
    config: &AccessBoundaryConfig,
    evaluator: &AccessEvaluator,
    area: ProtectedArea,
    identity: Option<&UserIdentity>,
    now: DateTime<Utc>,
) -> BoundaryDecision {
    let Some(identity) = identity else {
        return BoundaryDecision::Unauthenticated;
    };

    match area {
        ProtectedArea::Admin => {
            if identity.is_admin() {
                BoundaryDecision::Allow { window: None }
            } else {
                debug!(subject = identity.subject(), "admin area refused without admin claim");
                BoundaryDecision::Forbidden
            }
        }
        ProtectedArea::Dashboard => {
            let evaluation = tokio::time::timeout(
                config.evaluation_timeout,
                evaluator.evaluate_identity(identity, now),
            )
            .await;

            match evaluation {
                Ok(Ok(AccessDecision::Allow(window))) => BoundaryDecision::Allow {
                    window: Some(window),
                },
                Ok(Ok(AccessDecision::Deny(reason))) => BoundaryDecision::Unauthorized(reason),
                Ok(Err(error)) => {
                    error!(
                        subject = identity.subject(),
                        outcome = "evaluation_error",
                        %error,
                        "dashboard access evaluation failed"
                    );
                    BoundaryDecision::EvaluationFailed
                }
                Err(_) => {
                    error!(
                        subject = identity.subject(),
                        outcome = "evaluation_error",
                        timeout_ms = config.evaluation_timeout.as_millis() as u64,
                        "dashboard access evaluation timed out"
                    );
                    BoundaryDecision::EvaluationFailed
                }
            }
        }
    }
}

/// Adds the active window bounds to a forwarded response.
pub fn annotate_access_window(response: &mut Response, window: &AccessWindow) {
    let headers = response.headers_mut();

    for (name, instant) in [
        (ACCESS_START_HEADER, window.start()),
        (ACCESS_END_HEADER, window.end()),
    ] {
        if let Ok(value) =
            HeaderValue::from_str(instant.to_rfc3339_opts(SecondsFormat::Secs, true).as_str())
        {
            headers.insert(name, value);
        }
    }
}

/// Middleware enforcing the dashboard and admin boundaries.
pub async fn access_boundary(
    State(state): State<AppState>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Response {
    let config = &state.access_boundary;
    let Some(area) = config.protected_area(request.uri().path()) else {
        return next.run(request).await;
    };

    let return_to = request
        .uri()
        .path_and_query()
        .map_or_else(|| request.uri().path().to_owned(), |value| value.as_str().to_owned());

    let decision = match session.get::<UserIdentity>(SESSION_USER_KEY).await {
        Ok(identity) => {
            let decision = evaluate_boundary(
                config,
                &state.access_evaluator,
                area,
                identity.as_ref(),
                state.clock.now(),
            )
            .await;

            if let (BoundaryDecision::Allow { .. }, Some(identity)) = (&decision, identity) {
                request.extensions_mut().insert(identity);
            }
            decision
        }
        Err(error) => {
            error!(
                outcome = "evaluation_error",
                %error,
                "failed to read session identity at access boundary"
            );
            BoundaryDecision::EvaluationFailed
        }
    };

    if let BoundaryDecision::Unauthorized(reason) = &decision {
        debug!(
            path = request.uri().path(),
            reason = reason.as_str(),
            "dashboard access denied"
        );
    }

    if let Some(location) = decision.redirect_location(config, return_to.as_str()) {
        return Redirect::to(location.as_str()).into_response();
    }

    let window = match decision {
        BoundaryDecision::Allow { window } => window,
        _ => None,
    };
    if let Some(window) = window {
        request.extensions_mut().insert(ActiveAccessWindow(window));
    }

    let mut response = next.run(request).await;
    if let Some(window) = window {
        annotate_access_window(&mut response, &window);
    }

    response
}
