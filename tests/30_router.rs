mod common;

use anyhow::Result;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
};
use serde_json::Value;
use tower::ServiceExt;

use minijob_portal::server;

async fn call(method: Method, uri: &str, token: Option<&str>) -> Result<(StatusCode, Value)> {
    let app = server::app(common::test_state().await?);

    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let response = app.oneshot(request.body(Body::empty())?).await?;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    Ok((status, body))
}

#[tokio::test]
async fn admin_routes_check_the_token_before_the_role() -> Result<()> {
    let (status, body) = call(Method::POST, "/api/admin/settings/recalculate", None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
    Ok(())
}

#[tokio::test]
async fn garbage_bearer_token_is_unauthorized() -> Result<()> {
    let (status, _) = call(Method::GET, "/api/settings/current", Some("not.a.jwt")).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn token_from_another_secret_is_unauthorized() -> Result<()> {
    use minijob_portal::auth::{Claims, TokenKeys};
    use minijob_portal::database::models::{Role, User};

    let forged = TokenKeys::from_secret("someone-elses-secret")?.sign(&Claims::for_user(
        &User {
            id: uuid::Uuid::new_v4(),
            username: "hr-admin".into(),
            password_hash: String::new(),
            role: Role::Admin,
            created_at: chrono::Utc::now(),
        },
        chrono::Duration::minutes(5),
    ))?;

    let (status, _) = call(Method::POST, "/api/admin/settings/refresh", Some(&forged)).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn unknown_paths_are_not_found() -> Result<()> {
    let (status, _) = call(Method::GET, "/api/nothing-here", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn health_is_public() -> Result<()> {
    let (status, body) = call(Method::GET, "/health", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["database"], "ok");
    Ok(())
}
