mod cors;

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;
use tower_sessions::{SessionManagerLayer, SessionStore};
use voxgate_core::AppError;

use crate::state::AppState;
use crate::{auth, boundary, handlers, middleware};

use self::cors::build_cors_layer;

pub fn build_router<Store>(
    app_state: AppState,
    session_layer: SessionManagerLayer<Store>,
) -> Result<Router, AppError>
where
    Store: SessionStore + Clone,
{
    let dashboard_prefix = app_state.access_boundary.dashboard_prefix.clone();
    let admin_prefix = app_state.access_boundary.admin_prefix.clone();

    let dashboard_routes = Router::new().route(
        join_path(dashboard_prefix.as_str(), "/access").as_str(),
        get(handlers::dashboard::dashboard_access_handler),
    );

    let admin_routes = Router::new()
        .route(
            join_path(admin_prefix.as_str(), "/dashboard-access").as_str(),
            get(handlers::admin_access::list_dashboard_access_handler)
                .post(handlers::admin_access::grant_dashboard_access_handler),
        )
        .route(
            join_path(admin_prefix.as_str(), "/dashboard-access/revocations").as_str(),
            post(handlers::admin_access::revoke_dashboard_access_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_same_origin_for_mutations,
        ));

    let public_form_routes = Router::new()
        .route("/api/contact", post(handlers::contact::contact_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .route("/onboarding", post(auth::onboarding_handler))
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_same_origin_for_mutations,
        ));

    let cors_layer = build_cors_layer(app_state.public_site_url.as_str())?;

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/auth/session", post(auth::session_exchange_handler))
        .route("/auth/me", get(auth::me_handler))
        .merge(public_form_routes)
        .merge(dashboard_routes)
        .merge(admin_routes)
        .layer(from_fn_with_state(
            app_state.clone(),
            boundary::access_boundary,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .layer(session_layer)
        .with_state(app_state))
}

fn join_path(prefix: &str, suffix: &str) -> String {
    format!("{}{suffix}", prefix.trim_end_matches('/'))
}
