use axum::extract::State;
use serde::Deserialize;

use crate::auth::TokenPair;
use crate::handlers::JsonBody;
use crate::middleware::{ApiResponse, ApiResult};
use crate::server::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// POST /auth/refresh - rotate a refresh token into a new token pair
pub async fn refresh(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<RefreshRequest>,
) -> ApiResult<TokenPair> {
    let pair = state.auth.refresh(body.refresh_token.trim()).await?;
    Ok(ApiResponse::success(pair))
}
