use axum::extract::State;
use serde::Deserialize;

use crate::auth::TokenPair;
use crate::error::ApiError;
use crate::handlers::JsonBody;
use crate::middleware::{ApiResponse, ApiResult};
use crate::server::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// POST /auth/login - exchange credentials for an access and refresh token
///
/// ```json
/// { "username": "hr-admin", "password": "..." }
/// ```
///
/// Unknown users and wrong passwords get the same 401.
pub async fn login(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<LoginRequest>,
) -> ApiResult<TokenPair> {
    if body.username.trim().is_empty() || body.password.is_empty() {
        return Err(ApiError::validation_error("Username and password are required", None));
    }

    let pair = state.auth.login(&body.username, &body.password).await?;
    Ok(ApiResponse::success(pair))
}
