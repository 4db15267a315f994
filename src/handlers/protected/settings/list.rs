use axum::extract::State;

use crate::middleware::{ApiResponse, ApiResult};
use crate::server::AppState;
use crate::timeline::SettingRecord;

/// GET /api/settings - full timeline, newest start first
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<SettingRecord>> {
    let records = state.settings.list().await?;
    Ok(ApiResponse::success(records))
}

/// GET /api/settings/current - the setting in effect today
///
/// `data` is `null` when today falls into a gap or before the first record.
pub async fn current(State(state): State<AppState>) -> ApiResult<Option<SettingRecord>> {
    let today = state.clock.today();
    let record = state.settings.current(today).await?;
    Ok(ApiResponse::success(record))
}
