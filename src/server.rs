use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::AuthService;
use crate::config::AppConfig;
use crate::handlers::{elevated, protected, public};
use crate::middleware::{jwt_auth_middleware, require_admin};
use crate::services::SettingService;
use crate::timeline::Clock;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub settings: SettingService,
    pub auth: AuthService,
    pub clock: Clock,
}

/// All routes, without transport layers.
pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .merge(auth_public_routes())
        // Protected API
        .merge(protected_routes(state.clone()))
        // Admin API
        .merge(admin_routes(state.clone()))
        .with_state(state)
}

/// Routes plus CORS, request tracing and the body size limit.
pub fn app_with_layers(state: AppState, config: &AppConfig) -> Router {
    let mut router = app(state).layer(DefaultBodyLimit::max(config.api.max_request_size_bytes));

    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }
    if config.security.enable_cors {
        router = router.layer(cors_layer(&config.security.cors_origins));
    }
    router
}

fn auth_public_routes() -> Router<AppState> {
    use public::auth;

    Router::new()
        .route("/auth/login", post(auth::session_login))
        .route("/auth/refresh", post(auth::session_refresh))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use protected::{auth, settings};

    Router::new()
        .route("/api/auth/whoami", get(auth::session_whoami))
        .route("/api/auth/session", delete(auth::session_logout))
        .route("/api/settings", get(settings::settings_list))
        .route("/api/settings/current", get(settings::settings_current))
        .route_layer(from_fn_with_state(state, jwt_auth_middleware))
}

fn admin_routes(state: AppState) -> Router<AppState> {
    use elevated::settings;

    // Layers run outermost-last: token check first, then the role check
    Router::new()
        .route("/api/admin/settings", post(settings::setting_create))
        .route(
            "/api/admin/settings/:id",
            put(settings::setting_update).delete(settings::setting_delete),
        )
        .route("/api/admin/settings/recalculate", post(settings::settings_recalculate))
        .route("/api/admin/settings/refresh", post(settings::settings_refresh))
        .route_layer(from_fn(require_admin))
        .route_layer(from_fn_with_state(state, jwt_auth_middleware))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}
