use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::client::token::is_token_valid;
use crate::client::token_store::{StoredSession, TokenStore};
use crate::client::ClientError;
use crate::middleware::gate::login_location;

const DEFAULT_LOGIN_PATH: &str = "/login";
const LOGIN_API_PATH: &str = "/api/v1/auth/login";
const LOGOUT_API_PATH: &str = "/api/v1/auth/logout";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginData {
    pub token: String,
    #[serde(default)]
    pub user: Option<Value>,
    #[serde(default)]
    pub expires_at: Option<i64>,
}

/// JSON client for the finance API.
///
/// Sends JSON headers and the stored bearer token on every call, unwraps the
/// `{"success": true, "data": ...}` envelope, and turns a 401 into
/// [`ClientError::LoginRequired`] after discarding the stored token.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    store: TokenStore,
    login_path: String,
}

impl ApiClient {
    pub fn new(base_url: &str, store: TokenStore) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("finance-cli/", env!("CARGO_PKG_VERSION"))),
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ClientError::InvalidResponse(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            store,
            login_path: DEFAULT_LOGIN_PATH.to_string(),
        })
    }

    pub fn with_login_path(mut self, login_path: impl Into<String>) -> Self {
        self.login_path = login_path.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn store(&self) -> &TokenStore {
        &self.store
    }

    /// Stored token for this server, when it still looks usable
    pub fn current_token(&self) -> Result<Option<String>, ClientError> {
        Ok(self
            .store
            .token_for(&self.base_url)?
            .filter(|token| is_token_valid(token)))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.call(Method::GET, path, None::<&()>, None::<&()>).await
    }

    pub async fn get_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.call(Method::GET, path, Some(query), None::<&()>).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.call(Method::POST, path, None::<&()>, Some(body)).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.call(Method::PUT, path, None::<&()>, Some(body)).await
    }

    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.call(Method::PATCH, path, None::<&()>, Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ClientError> {
        let request = self.authorized(self.request(Method::DELETE, path), path)?;
        self.send(request, path).await.map(|_| ())
    }

    /// Exchange credentials for a session and remember the token
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginData, ClientError> {
        let path = LOGIN_API_PATH;
        let request = self
            .request(Method::POST, path)
            .json(&json!({ "username": username, "password": password }));

        let data = self.send(request, path).await?.unwrap_or(Value::Null);
        let login: LoginData = serde_json::from_value(data)
            .map_err(|_| ClientError::InvalidResponse("login response carried no token".to_string()))?;

        self.store.save(&StoredSession {
            server: self.base_url.clone(),
            token: login.token.clone(),
            username: Some(username.to_string()),
            saved_at: chrono::Utc::now(),
        })?;
        Ok(login)
    }

    /// Tell the server, then forget the token whatever it answered
    pub async fn logout(&self) -> Result<(), ClientError> {
        let path = LOGOUT_API_PATH;
        if let Some(token) = self.store.token_for(&self.base_url)? {
            let request = self.request(Method::POST, path).bearer_auth(token);
            if let Err(e) = self.send(request, path).await {
                warn!("Server-side logout failed: {}", e);
            }
        }
        self.store.clear()
    }

    async fn call<T, Q, B>(
        &self,
        method: Method,
        path: &str,
        query: Option<&Q>,
        body: Option<&B>,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
        B: Serialize + ?Sized,
    {
        let mut request = self.authorized(self.request(method, path), path)?;
        if let Some(query) = query {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let data = self.send(request, path).await?.unwrap_or(Value::Null);
        serde_json::from_value(data).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{}", self.base_url, path))
    }

    /// Attach the bearer token, or stop early when there is none worth sending
    fn authorized(&self, request: RequestBuilder, path: &str) -> Result<RequestBuilder, ClientError> {
        match self.current_token()? {
            Some(token) => Ok(request.bearer_auth(token)),
            None => {
                self.store.clear()?;
                Err(self.login_required(path))
            }
        }
    }

    /// Returns the unwrapped `data` member; `None` for empty bodies
    async fn send(&self, request: RequestBuilder, path: &str) -> Result<Option<Value>, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        let response = request
            .send()
            .await
            .map_err(|source| ClientError::Request { url: url.clone(), source })?;

        let status = response.status();
        debug!("{} answered {}", url, status);

        // A refused login is a plain error, not a reason to go log in
        if status == StatusCode::UNAUTHORIZED && path != LOGIN_API_PATH {
            self.store.clear()?;
            return Err(self.login_required(path));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| ClientError::Request { url: url.clone(), source })?;
        let body: Option<Value> = if bytes.is_empty() {
            None
        } else {
            Some(serde_json::from_slice(&bytes).map_err(|e| ClientError::InvalidResponse(e.to_string()))?)
        };

        if !status.is_success() {
            let message = body
                .as_ref()
                .and_then(|b| b.get("error"))
                .and_then(Value::as_str)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed"))
                .to_string();
            let code = body
                .as_ref()
                .and_then(|b| b.get("code"))
                .and_then(Value::as_str)
                .map(str::to_string);
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
                code,
            });
        }

        Ok(body.map(|mut b| b.get_mut("data").map(Value::take).unwrap_or(b)))
    }

    fn login_required(&self, path: &str) -> ClientError {
        ClientError::LoginRequired {
            redirect: login_location(&self.login_path, path),
        }
    }
}
