use axum::{extract::State, Extension};

use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::server::AppState;
use crate::timeline::{RecalculateOutcome, SettingRecord};

/// POST /api/admin/settings/recalculate - rebuild every end date
pub async fn recalculate(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<RecalculateOutcome> {
    let today = state.clock.today();
    let outcome = state.settings.recalculate(Some(user.user_id), today).await?;
    Ok(ApiResponse::success(outcome))
}

/// POST /api/admin/settings/refresh - re-derive the active flag for today
pub async fn refresh_active(State(state): State<AppState>) -> ApiResult<Option<SettingRecord>> {
    let today = state.clock.today();
    let active = state.settings.refresh_active(today).await?;
    Ok(ApiResponse::success(active))
}
