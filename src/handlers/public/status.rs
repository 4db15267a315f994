use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::server::AppState;

/// GET / - service banner and route overview
pub async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "Minijob Portal API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "HR admin portal backend with the minijob earnings-limit timeline",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "public_auth": "/auth/login, /auth/refresh (public - token acquisition)",
                "auth": "/api/auth/whoami, /api/auth/session (protected)",
                "settings": "/api/settings, /api/settings/current (protected)",
                "admin": "/api/admin/settings[/:id], /api/admin/settings/recalculate, /api/admin/settings/refresh (admin)",
            }
        }
    }))
}

/// GET /health - storage connectivity probe
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.settings.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "today": state.clock.today(),
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": {
                        "status": "degraded",
                        "timestamp": now
                    }
                })),
            )
        }
    }
}
