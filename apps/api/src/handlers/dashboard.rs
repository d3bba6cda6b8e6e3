use axum::Json;
use axum::extract::Extension;
use voxgate_core::UserIdentity;

use crate::boundary::ActiveAccessWindow;
use crate::dto::DashboardAccessWindowResponse;

/// Returns the window the boundary admitted this request under.
pub async fn dashboard_access_handler(
    Extension(user): Extension<UserIdentity>,
    Extension(ActiveAccessWindow(window)): Extension<ActiveAccessWindow>,
) -> Json<DashboardAccessWindowResponse> {
    Json(DashboardAccessWindowResponse::new(user.subject(), &window))
}
