use anyhow::Context;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use minijob_portal::auth::AuthService;
use minijob_portal::config;
use minijob_portal::database::{
    DatabaseManager, MemorySettingStore, MemoryUserStore, PgSettingStore, PgUserStore, SettingStore,
    UserStore,
};
use minijob_portal::server::{app_with_layers, AppState};
use minijob_portal::services::SettingService;
use minijob_portal::timeline::Clock;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    info!("Starting Minijob Portal in {:?} mode", config.environment);

    let (setting_store, user_store): (Arc<dyn SettingStore>, Arc<dyn UserStore>) = match config.database.url {
        Some(_) => {
            let pool = DatabaseManager::connect(&config.database).await?;
            DatabaseManager::ensure_schema(&pool).await?;
            (
                Arc::new(PgSettingStore::new(pool.clone())),
                Arc::new(PgUserStore::new(pool)),
            )
        }
        None if minijob_portal::is_production!() => {
            anyhow::bail!("DATABASE_URL is required in production");
        }
        None => {
            warn!("DATABASE_URL not set; using the in-memory store, data is lost on exit");
            (Arc::new(MemorySettingStore::new()), Arc::new(MemoryUserStore::new()))
        }
    };

    let auth = AuthService::new(user_store, &config.security).context("JWT_SECRET must be set")?;
    if let Some((username, password)) = &config.security.bootstrap_admin {
        if auth.ensure_admin(username, password).await? {
            info!("Bootstrapped admin account '{}'", username);
        }
    }

    let settings = SettingService::new(setting_store).with_audit(config.security.enable_audit_logging);
    let clock = Clock::System(config.timeline.reference_offset());
    settings.refresh_active(clock.today()).await?;

    let app = app_with_layers(AppState { settings, auth, clock }, config);

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("Minijob Portal listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server")?;
    Ok(())
}
