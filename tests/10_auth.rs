mod common;

use anyhow::Result;
use reqwest::{header, StatusCode};
use serde_json::json;

use common::{client, authed_client, json_of, TestServer, PASSWORD, USERNAME};

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = TestServer::spawn().await?;

    let (status, body) = json_of(client().get(server.url("/health")).send().await?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["database"], "ok");
    Ok(())
}

#[tokio::test]
async fn root_lists_endpoints() -> Result<()> {
    let server = TestServer::spawn().await?;

    let (status, body) = json_of(client().get(server.url("/")).send().await?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["data"]["endpoints"]["marcacoes"].is_string());
    Ok(())
}

#[tokio::test]
async fn login_sets_session_cookie_and_returns_token() -> Result<()> {
    let server = TestServer::spawn().await?;
    server.create_user(USERNAME, PASSWORD).await?;

    let res = client()
        .post(server.url("/api/v1/auth/login"))
        .json(&json!({ "username": USERNAME, "password": PASSWORD }))
        .send()
        .await?;

    let cookie = res
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .expect("Set-Cookie header");
    assert!(cookie.starts_with("session="), "cookie: {}", cookie);
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));

    let (status, body) = json_of(res).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["username"], USERNAME);
    let token = body["data"]["token"].as_str().expect("token");
    assert_eq!(token.split('.').count(), 3);
    Ok(())
}

#[tokio::test]
async fn login_rejects_wrong_password() -> Result<()> {
    let server = TestServer::spawn().await?;
    server.create_user(USERNAME, PASSWORD).await?;

    let res = client()
        .post(server.url("/api/v1/auth/login"))
        .json(&json!({ "username": USERNAME, "password": "wrong" }))
        .send()
        .await?;

    let (status, body) = json_of(res).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());
    Ok(())
}

#[tokio::test]
async fn login_requires_both_fields() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = client()
        .post(server.url("/api/v1/auth/login"))
        .json(&json!({ "username": USERNAME }))
        .send()
        .await?;

    let (status, body) = json_of(res).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["field_errors"]["password"], "This field is required");
    Ok(())
}

#[tokio::test]
async fn login_rejects_non_json_body() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = client()
        .post(server.url("/api/v1/auth/login"))
        .body("username=ana")
        .send()
        .await?;

    let (status, body) = json_of(res).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_JSON");
    Ok(())
}

#[tokio::test]
async fn logout_expires_cookie() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = client().post(server.url("/api/v1/auth/logout")).send().await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let cookie = res.headers().get(header::SET_COOKIE).and_then(|v| v.to_str().ok()).unwrap_or_default();
    assert!(cookie.contains("Max-Age=0"), "cookie: {}", cookie);
    Ok(())
}

#[tokio::test]
async fn whoami_needs_credentials() -> Result<()> {
    let server = TestServer::spawn().await?;

    let (status, body) = json_of(client().get(server.url("/api/v1/auth/whoami")).send().await?).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let (status, _) = json_of(authed_client("a.b.c").get(server.url("/api/v1/auth/whoami")).send().await?).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn whoami_accepts_bearer_and_cookie() -> Result<()> {
    let server = TestServer::spawn().await?;
    let token = server.token()?;

    let (status, body) = json_of(authed_client(&token).get(server.url("/api/v1/auth/whoami")).send().await?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], USERNAME);

    let res = client()
        .get(server.url("/api/v1/auth/whoami"))
        .header(header::COOKIE, format!("session={}", token))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn unknown_route_is_json_404() -> Result<()> {
    let server = TestServer::spawn().await?;

    let (status, body) = json_of(client().get(server.url("/nope")).send().await?).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    Ok(())
}
