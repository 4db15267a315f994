use axum::{extract::State, Extension};

use crate::handlers::JsonBody;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::server::AppState;
use crate::timeline::{CreateOutcome, SettingInput};

/// POST /api/admin/settings - add a setting to the timeline
///
/// ```json
/// {
///   "monthlyLimit": "556.00",
///   "description": "Minijob limit 2025",
///   "validFrom": "2025-01-01",
///   "validUntil": null
/// }
/// ```
///
/// Responds 201 with `{ record, autoAdjusted }`. An open-ended predecessor
/// that started earlier is closed the day before `validFrom`; any other
/// overlap is a 409 listing the blocking records.
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    JsonBody(input): JsonBody<SettingInput>,
) -> ApiResult<CreateOutcome> {
    let today = state.clock.today();
    let outcome = state.settings.create(input, Some(user.user_id), today).await?;
    Ok(ApiResponse::created(outcome))
}
