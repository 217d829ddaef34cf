use async_trait::async_trait;
use axum::http::{header, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::auth::cookies::{bearer_token, read_cookie};
use crate::auth::{validate_jwt, AuthError};
use crate::upstream::Upstream;

/// Who is making the request, as confirmed by an identity provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

/// Credentials lifted off an incoming request
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    /// Session cookie value, or the bearer token when bearer is accepted
    pub token: Option<String>,
    /// Raw Cookie/Authorization headers for forwarding upstream
    pub forward: HeaderMap,
}

impl Credentials {
    /// Page requests only count the session cookie
    pub fn from_cookie(headers: &HeaderMap, cookie_name: &str) -> Self {
        Self::collect(headers, read_cookie(headers, cookie_name))
    }

    /// API requests accept the session cookie or `Authorization: Bearer`
    pub fn from_headers(headers: &HeaderMap, cookie_name: &str) -> Self {
        let token = read_cookie(headers, cookie_name).or_else(|| bearer_token(headers));
        Self::collect(headers, token)
    }

    pub fn bearer(token: &str) -> Self {
        let mut forward = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", token)) {
            forward.insert(header::AUTHORIZATION, value);
        }
        Self {
            token: Some(token.to_string()),
            forward,
        }
    }

    fn collect(headers: &HeaderMap, token: Option<String>) -> Self {
        let mut forward = HeaderMap::new();
        for name in [header::COOKIE, header::AUTHORIZATION] {
            for value in headers.get_all(&name) {
                forward.append(name.clone(), value.clone());
            }
        }
        Self { token, forward }
    }

    pub fn is_empty(&self) -> bool {
        self.token.is_none()
    }
}

/// Decides whether credentials belong to a signed-in user.
///
/// `Ok(None)` is a definite "no". `Err` means the answer could not be
/// obtained; callers treat that as unauthenticated too.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn identify(&self, credentials: &Credentials) -> Result<Option<Identity>, AuthError>;
}

/// Verifies locally issued session tokens
pub struct JwtIdentity {
    secret: String,
}

impl JwtIdentity {
    pub fn new(secret: impl Into<String>) -> Self {
        Self { secret: secret.into() }
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentity {
    async fn identify(&self, credentials: &Credentials) -> Result<Option<Identity>, AuthError> {
        let Some(token) = credentials.token.as_deref() else {
            return Ok(None);
        };

        match validate_jwt(token, &self.secret) {
            Ok(claims) => Ok(Some(Identity {
                username: claims.sub,
                user_id: Some(claims.uid),
                expires_at: Some(claims.exp),
            })),
            Err(AuthError::InvalidToken(reason)) => {
                debug!("Rejected session token: {}", reason);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

/// Delegates the decision to the upstream whoami endpoint
pub struct UpstreamIdentity {
    upstream: Upstream,
}

impl UpstreamIdentity {
    pub fn new(upstream: Upstream) -> Self {
        Self { upstream }
    }
}

#[async_trait]
impl IdentityProvider for UpstreamIdentity {
    async fn identify(&self, credentials: &Credentials) -> Result<Option<Identity>, AuthError> {
        if credentials.is_empty() {
            return Ok(None);
        }

        match self.upstream.whoami(&credentials.forward).await {
            Ok(Some(body)) => Ok(Some(identity_from_whoami(&body))),
            Ok(None) => Ok(None),
            Err(e) => {
                warn!("Identity check against upstream failed: {}", e);
                Err(AuthError::Upstream(e))
            }
        }
    }
}

/// Accepts `{"data": {...}}`, `{"user": {...}}` or a bare user object
fn identity_from_whoami(body: &Value) -> Identity {
    let user = body
        .get("data")
        .or_else(|| body.get("user"))
        .unwrap_or(body);
    let user = user.get("user").unwrap_or(user);

    let username = ["username", "user", "sub", "email", "name"]
        .iter()
        .find_map(|key| user.get(*key).and_then(Value::as_str))
        .unwrap_or("unknown")
        .to_string();

    Identity {
        username,
        user_id: user.get("id").and_then(Value::as_i64),
        expires_at: user.get("exp").and_then(Value::as_i64),
    }
}
