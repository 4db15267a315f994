use axum::{extract::State, Extension};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::database::models::User;
use crate::error::ApiError;
use crate::handlers::JsonBody;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::server::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WhoAmI {
    #[serde(flatten)]
    pub user: User,
    pub is_admin: bool,
}

/// GET /api/auth/whoami - the account behind the presented token
pub async fn whoami(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<WhoAmI> {
    let user = state
        .auth
        .find_user(auth_user.user_id)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Account no longer exists"))?;

    Ok(ApiResponse::success(WhoAmI {
        is_admin: auth_user.is_admin(),
        user,
    }))
}

/// DELETE /api/auth/session - revoke the given refresh token
///
/// The access token stays valid until it expires.
pub async fn logout(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    JsonBody(body): JsonBody<LogoutRequest>,
) -> ApiResult<Value> {
    let revoked = state.auth.logout(body.refresh_token.trim()).await?;
    tracing::info!("User '{}' logged out (token revoked: {})", auth_user.username, revoked);

    Ok(ApiResponse::success(json!({ "revoked": revoked })))
}
