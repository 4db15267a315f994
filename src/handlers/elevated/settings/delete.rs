use axum::{
    extract::{Path, State},
    Extension,
};

use crate::handlers::parse_id;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::server::AppState;
use crate::timeline::DeleteOutcome;

/// DELETE /api/admin/settings/:id - remove a setting that has not started yet
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<DeleteOutcome> {
    let id = parse_id(&id)?;
    let today = state.clock.today();
    let outcome = state.settings.delete(id, Some(user.user_id), today).await?;
    Ok(ApiResponse::success(outcome))
}
