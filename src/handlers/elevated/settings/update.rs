use axum::{
    extract::{Path, State},
    Extension,
};

use crate::handlers::{parse_id, JsonBody};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::server::AppState;
use crate::timeline::{SettingInput, UpdateOutcome};

/// PUT /api/admin/settings/:id - replace a setting's fields
///
/// Neighbouring records are left alone; use recalculate to repair the
/// timeline after moving dates.
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<SettingInput>,
) -> ApiResult<UpdateOutcome> {
    let id = parse_id(&id)?;
    let today = state.clock.today();
    let outcome = state.settings.update(id, input, Some(user.user_id), today).await?;
    Ok(ApiResponse::success(outcome))
}
