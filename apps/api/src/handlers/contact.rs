use axum::Json;
use axum::extract::State;

use crate::dto::{ContactRequest, SuccessResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn contact_handler(
    State(state): State<AppState>,
    Json(payload): Json<ContactRequest>,
) -> ApiResult<Json<SuccessResponse>> {
    state
        .contact_service
        .submit(payload.email.as_str(), payload.message.as_str())
        .await?;

    Ok(Json(SuccessResponse { success: true }))
}
