#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use reqwest::{Client, Response};
use serde_json::{json, Value};

use minijob_portal::auth::AuthService;
use minijob_portal::config::SecurityConfig;
use minijob_portal::database::models::Role;
use minijob_portal::database::{MemorySettingStore, MemoryUserStore};
use minijob_portal::server::{self, AppState};
use minijob_portal::services::SettingService;
use minijob_portal::timeline::Clock;

pub const TODAY: &str = "2025-03-15";
pub const ADMIN: (&str, &str) = ("hr-admin", "admin-password");
pub const EMPLOYEE: (&str, &str) = ("clerk", "employee-password");

pub struct TestServer {
    pub base_url: String,
    pub state: AppState,
    pub client: Client,
}

pub fn today() -> NaiveDate {
    NaiveDate::parse_from_str(TODAY, "%Y-%m-%d").expect("valid test date")
}

pub fn security() -> SecurityConfig {
    SecurityConfig {
        jwt_secret: "integration-test-secret".into(),
        access_token_minutes: 15,
        refresh_token_days: 7,
        bcrypt_cost: 4,
        enable_cors: false,
        cors_origins: Vec::new(),
        enable_audit_logging: true,
        bootstrap_admin: None,
    }
}

/// App state on fresh in-memory stores, with one admin and one employee.
pub async fn test_state() -> Result<AppState> {
    let auth = AuthService::new(Arc::new(MemoryUserStore::new()), &security())?;
    auth.create_user(ADMIN.0, ADMIN.1, Role::Admin).await?;
    auth.create_user(EMPLOYEE.0, EMPLOYEE.1, Role::Employee).await?;

    Ok(AppState {
        settings: SettingService::new(Arc::new(MemorySettingStore::new())).with_audit(true),
        auth,
        clock: Clock::Fixed(today()),
    })
}

/// Serve the router in-process on an ephemeral port.
pub async fn spawn_server() -> Result<TestServer> {
    let state = test_state().await?;

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .context("failed to bind test listener")?;
    let addr = listener.local_addr()?;

    let app = server::app(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(TestServer {
        base_url: format!("http://{}", addr),
        state,
        client: Client::new(),
    })
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn login(&self, (username, password): (&str, &str)) -> Result<Value> {
        let res = self
            .client
            .post(self.url("/auth/login"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await?;
        anyhow::ensure!(res.status().is_success(), "login failed: {}", res.status());
        Ok(res.json::<Value>().await?["data"].clone())
    }

    pub async fn token(&self, credentials: (&str, &str)) -> Result<String> {
        let data = self.login(credentials).await?;
        data["accessToken"]
            .as_str()
            .map(str::to_string)
            .context("login response without accessToken")
    }

    pub async fn admin_token(&self) -> Result<String> {
        self.token(ADMIN).await
    }

    pub async fn employee_token(&self) -> Result<String> {
        self.token(EMPLOYEE).await
    }

    pub async fn get(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).bearer_auth(token).send().await?)
    }

    pub async fn post(&self, path: &str, token: &str, body: Value) -> Result<Response> {
        Ok(self.client.post(self.url(path)).bearer_auth(token).json(&body).send().await?)
    }

    pub async fn put(&self, path: &str, token: &str, body: Value) -> Result<Response> {
        Ok(self.client.put(self.url(path)).bearer_auth(token).json(&body).send().await?)
    }

    pub async fn delete(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self.client.delete(self.url(path)).bearer_auth(token).send().await?)
    }

    /// Create a setting as admin and return the response `data`.
    pub async fn create_setting(&self, token: &str, body: Value) -> Result<Value> {
        let res = self.post("/api/admin/settings", token, body).await?;
        anyhow::ensure!(res.status() == 201, "create failed: {}", res.status());
        Ok(res.json::<Value>().await?["data"].clone())
    }
}

pub fn setting(limit: &str, description: &str, from: &str, until: Option<&str>) -> Value {
    json!({
        "monthlyLimit": limit,
        "description": description,
        "validFrom": from,
        "validUntil": until,
    })
}
