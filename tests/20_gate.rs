mod common;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, HeaderMap, Request, StatusCode},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tower::ServiceExt;

use common::{client, json_of, spawn_mock, test_config, upstream_config, TestServer};
use finance_api::auth::{AuthError, Credentials, Identity, IdentityProvider};
use finance_api::database::Database;
use finance_api::upstream::UpstreamError;
use finance_api::{app, AppState};

fn location(res: &reqwest::Response) -> String {
    res.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

#[tokio::test]
async fn protected_page_redirects_to_login() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = client().get(server.url("/dashboard")).send().await?;
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&res), "/login?redirect=%2Fdashboard");
    Ok(())
}

#[tokio::test]
async fn redirect_keeps_path_and_query() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = client()
        .get(server.url("/transactions?year=2025&month=3"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        location(&res),
        "/login?redirect=%2Ftransactions%3Fyear%3D2025%26month%3D3"
    );
    Ok(())
}

#[tokio::test]
async fn nested_protected_page_is_gated() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = client().get(server.url("/settings/profile")).send().await?;
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);

    // Prefix match is per path segment
    let (status, _) = json_of(client().get(server.url("/dashboards")).send().await?).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn valid_session_cookie_passes_the_gate() -> Result<()> {
    let server = TestServer::spawn().await?;
    let token = server.token()?;

    let res = client()
        .get(server.url("/dashboard"))
        .header(header::COOKIE, format!("session={}", token))
        .send()
        .await?;
    // No frontend configured, so the fallback answers
    let (status, _) = json_of(res).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn bearer_header_does_not_open_pages() -> Result<()> {
    let server = TestServer::spawn().await?;
    let token = server.token()?;

    let res = client()
        .get(server.url("/dashboard"))
        .bearer_auth(token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    Ok(())
}

#[tokio::test]
async fn invalid_cookie_redirects() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = client()
        .get(server.url("/budget"))
        .header(header::COOKIE, "session=not.a.token")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&res), "/login?redirect=%2Fbudget");
    Ok(())
}

#[tokio::test]
async fn signed_in_user_skips_login_page() -> Result<()> {
    let server = TestServer::spawn().await?;
    let token = server.token()?;

    let res = client()
        .get(server.url("/login"))
        .header(header::COOKIE, format!("session={}", token))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&res), "/dashboard");

    // Signed out: the login page itself is served (here, the fallback)
    let (status, _) = json_of(client().get(server.url("/login")).send().await?).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn api_routes_answer_json_instead_of_redirecting() -> Result<()> {
    let server = TestServer::spawn().await?;

    let (status, body) = json_of(client().get(server.url("/api/v1/marcacoes")).send().await?).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    Ok(())
}

fn whoami_mock() -> Router {
    Router::new().route(
        "/api/v1/auth/whoami",
        get(|headers: HeaderMap| async move {
            let cookie = headers
                .get(header::COOKIE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default();
            if cookie.contains("session=good") {
                (StatusCode::OK, Json(json!({ "data": { "username": "bia" } })))
            } else {
                (StatusCode::UNAUTHORIZED, Json(json!({ "error": "not signed in" })))
            }
        }),
    )
}

#[tokio::test]
async fn upstream_identity_decides_page_access() -> Result<()> {
    let upstream = spawn_mock(whoami_mock()).await?;
    let server = TestServer::spawn_with(upstream_config(&upstream)).await?;

    let res = client()
        .get(server.url("/dashboard"))
        .header(header::COOKIE, "session=good")
        .send()
        .await?;
    assert_ne!(res.status(), StatusCode::TEMPORARY_REDIRECT);

    let res = client()
        .get(server.url("/dashboard"))
        .header(header::COOKIE, "session=stale")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&res), "/login?redirect=%2Fdashboard");
    Ok(())
}

#[tokio::test]
async fn upstream_whoami_exposes_upstream_user() -> Result<()> {
    let upstream = spawn_mock(whoami_mock()).await?;
    let server = TestServer::spawn_with(upstream_config(&upstream)).await?;

    let res = client()
        .get(server.url("/api/v1/auth/whoami"))
        .header(header::COOKIE, "session=good")
        .send()
        .await?;
    let (status, body) = json_of(res).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "bia");
    Ok(())
}

#[tokio::test]
async fn unreachable_upstream_fails_closed() -> Result<()> {
    let port = portpicker::pick_unused_port().expect("free port");
    let server = TestServer::spawn_with(upstream_config(&format!("http://127.0.0.1:{}", port))).await?;

    let res = client()
        .get(server.url("/dashboard"))
        .header(header::COOKIE, "session=good")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    Ok(())
}

/// Provider that can never reach a verdict
struct BrokenProvider;

#[async_trait]
impl IdentityProvider for BrokenProvider {
    async fn identify(&self, _credentials: &Credentials) -> Result<Option<Identity>, AuthError> {
        Err(AuthError::Upstream(UpstreamError::NotConfigured))
    }
}

/// Provider that accepts any credentials as the given user
struct FixedProvider(&'static str);

#[async_trait]
impl IdentityProvider for FixedProvider {
    async fn identify(&self, credentials: &Credentials) -> Result<Option<Identity>, AuthError> {
        Ok(credentials.token.as_ref().map(|_| Identity {
            username: self.0.to_string(),
            user_id: None,
            expires_at: None,
        }))
    }
}

async fn router_with(provider: Arc<dyn IdentityProvider>) -> Result<Router> {
    let db = Database::in_memory().await?;
    db.migrate().await?;
    let state = AppState::new(test_config(), db)?.with_identity(provider);
    Ok(app(state))
}

#[tokio::test]
async fn provider_errors_redirect_to_login() -> Result<()> {
    let router = router_with(Arc::new(BrokenProvider)).await?;

    let res = router
        .oneshot(
            Request::builder()
                .uri("/upload?bank=itau")
                .header(header::COOKIE, "session=anything")
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        res.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
        Some("/login?redirect=%2Fupload%3Fbank%3Ditau")
    );
    Ok(())
}

#[tokio::test]
async fn provider_errors_are_not_401_on_login_page() -> Result<()> {
    let router = router_with(Arc::new(BrokenProvider)).await?;

    let res = router
        .oneshot(
            Request::builder()
                .uri("/login")
                .header(header::COOKIE, "session=anything")
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn custom_provider_identity_reaches_handlers() -> Result<()> {
    let router = router_with(Arc::new(FixedProvider("carla"))).await?;

    let res = router
        .oneshot(
            Request::builder()
                .uri("/api/v1/auth/whoami")
                .header(header::AUTHORIZATION, "Bearer whatever")
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await?;
    let body: serde_json::Value = serde_json::from_slice(&bytes)?;
    assert_eq!(body["data"]["username"], "carla");
    Ok(())
}

#[tokio::test]
async fn gated_pages_are_served_from_static_dir() -> Result<()> {
    let dir = tempfile::tempdir()?;
    std::fs::write(dir.path().join("index.html"), "<html>finance</html>")?;
    std::fs::create_dir(dir.path().join("assets"))?;
    std::fs::write(dir.path().join("assets").join("app.js"), "console.log(1)")?;

    let mut config = test_config();
    config.api.static_dir = Some(dir.path().to_string_lossy().into_owned());
    let server = TestServer::spawn_with(config).await?;
    let cookie = format!("session={}", server.token()?);

    // SPA route falls back to index.html once the gate lets it through
    let res = client()
        .get(server.url("/dashboard"))
        .header(header::COOKIE, &cookie)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await?, "<html>finance</html>");

    let res = client().get(server.url("/assets/app.js")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await?, "console.log(1)");

    let res = client().get(server.url("/dashboard")).send().await?;
    assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
    Ok(())
}

#[tokio::test]
async fn unknown_api_paths_stay_json_with_static_dir() -> Result<()> {
    let dir = tempfile::tempdir()?;
    std::fs::write(dir.path().join("index.html"), "<html>finance</html>")?;

    let mut config = test_config();
    config.api.static_dir = Some(dir.path().to_string_lossy().into_owned());
    let server = TestServer::spawn_with(config).await?;

    let res = client()
        .get(server.url("/api/v1/nope"))
        .header(header::COOKIE, format!("session={}", server.token()?))
        .send()
        .await?;
    let (status, body) = json_of(res).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    // Non-API paths outside the gate still get the SPA shell
    let res = client().get(server.url("/about")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await?, "<html>finance</html>");
    Ok(())
}
