mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server.client.get(server.url("/health")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<Value>().await?;
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["today"], common::TODAY);
    Ok(())
}

#[tokio::test]
async fn root_lists_endpoints() -> Result<()> {
    let server = common::spawn_server().await?;

    let body = server.client.get(server.url("/")).send().await?.json::<Value>().await?;
    assert_eq!(body["success"], true);
    assert!(body["data"]["endpoints"]["settings"].is_string());
    Ok(())
}

#[tokio::test]
async fn login_returns_token_pair() -> Result<()> {
    let server = common::spawn_server().await?;

    let data = server.login(common::ADMIN).await?;
    assert_eq!(data["tokenType"], "Bearer");
    assert_eq!(data["expiresIn"], 900);
    assert_eq!(data["user"]["username"], "hr-admin");
    assert_eq!(data["user"]["role"], "admin");
    assert!(data["user"].get("passwordHash").is_none());
    assert!(data["refreshToken"].as_str().is_some_and(|t| !t.is_empty()));
    Ok(())
}

#[tokio::test]
async fn bad_credentials_are_rejected_uniformly() -> Result<()> {
    let server = common::spawn_server().await?;

    let wrong_password = server
        .client
        .post(server.url("/auth/login"))
        .json(&json!({ "username": "hr-admin", "password": "not-the-password" }))
        .send()
        .await?;
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    let wrong_body = wrong_password.json::<Value>().await?;

    let unknown_user = server
        .client
        .post(server.url("/auth/login"))
        .json(&json!({ "username": "nobody", "password": "admin-password" }))
        .send()
        .await?;
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);
    let unknown_body = unknown_user.json::<Value>().await?;

    assert_eq!(wrong_body["message"], unknown_body["message"]);
    assert_eq!(wrong_body["code"], "UNAUTHORIZED");
    Ok(())
}

#[tokio::test]
async fn malformed_login_body_is_invalid_json() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server
        .client
        .post(server.url("/auth/login"))
        .header("content-type", "application/json")
        .body("{\"username\": ")
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["code"], "INVALID_JSON");
    Ok(())
}

#[tokio::test]
async fn whoami_reflects_the_token() -> Result<()> {
    let server = common::spawn_server().await?;
    let token = server.employee_token().await?;

    let res = server.get("/api/auth/whoami", &token).await?;
    assert_eq!(res.status(), StatusCode::OK);

    let data = res.json::<Value>().await?["data"].clone();
    assert_eq!(data["username"], "clerk");
    assert_eq!(data["role"], "employee");
    assert_eq!(data["isAdmin"], false);
    Ok(())
}

#[tokio::test]
async fn protected_routes_require_a_valid_token() -> Result<()> {
    let server = common::spawn_server().await?;

    let missing = server.client.get(server.url("/api/settings")).send().await?;
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

    let token = server.admin_token().await?;
    let mut tampered = token.clone();
    tampered.push('x');
    let res = server.get("/api/settings", &tampered).await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = server.get("/api/settings", &token).await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn refresh_rotates_the_token() -> Result<()> {
    let server = common::spawn_server().await?;
    let first = server.login(common::EMPLOYEE).await?;
    let first_refresh = first["refreshToken"].as_str().unwrap_or_default().to_string();

    let res = server
        .client
        .post(server.url("/auth/refresh"))
        .json(&json!({ "refreshToken": first_refresh }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let second = res.json::<Value>().await?["data"].clone();
    assert_ne!(second["refreshToken"], first["refreshToken"]);

    let replay = server
        .client
        .post(server.url("/auth/refresh"))
        .json(&json!({ "refreshToken": first_refresh }))
        .send()
        .await?;
    assert_eq!(replay.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn logout_revokes_the_refresh_token() -> Result<()> {
    let server = common::spawn_server().await?;
    let session = server.login(common::EMPLOYEE).await?;
    let access = session["accessToken"].as_str().unwrap_or_default();
    let refresh = session["refreshToken"].as_str().unwrap_or_default();

    let res = server
        .client
        .delete(server.url("/api/auth/session"))
        .bearer_auth(access)
        .json(&json!({ "refreshToken": refresh }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?["data"]["revoked"], true);

    let res = server
        .client
        .post(server.url("/auth/refresh"))
        .json(&json!({ "refreshToken": refresh }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
