use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, HeaderName, Method, StatusCode};
use axum::response::Response;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::UpstreamConfig;

/// Request headers passed through to the upstream service
const FORWARDED_REQUEST_HEADERS: &[HeaderName] = &[
    header::CONTENT_TYPE,
    header::ACCEPT,
    header::ACCEPT_LANGUAGE,
    header::COOKIE,
    header::AUTHORIZATION,
];

/// Response headers passed back to the caller
const FORWARDED_RESPONSE_HEADERS: &[HeaderName] = &[
    header::CONTENT_TYPE,
    header::CONTENT_DISPOSITION,
    header::CACHE_CONTROL,
    header::LOCATION,
    header::SET_COOKIE,
];

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream service is not configured")]
    NotConfigured,

    #[error("upstream unreachable at {url}: {source}")]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid upstream response: {0}")]
    InvalidResponse(String),

    #[error("upstream answered {0}")]
    Status(StatusCode),
}

/// Thin client for the separate backend service. One request per call,
/// no retries.
#[derive(Clone, Debug)]
pub struct Upstream {
    client: reqwest::Client,
    base_url: Option<String>,
    whoami_path: String,
}

impl Upstream {
    pub fn from_config(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| UpstreamError::InvalidResponse(format!("failed to build HTTP client: {}", e)))?;

        let base_url = config
            .base_url
            .as_deref()
            .map(|u| u.trim_end_matches('/').to_string());

        if let Some(url) = &base_url {
            info!("Upstream service configured at {}", url);
        }

        Ok(Self {
            client,
            base_url,
            whoami_path: config.whoami_path.clone(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.base_url.is_some()
    }

    fn url(&self, path_and_query: &str) -> Result<String, UpstreamError> {
        let base = self.base_url.as_deref().ok_or(UpstreamError::NotConfigured)?;
        Ok(format!("{}{}", base, path_and_query))
    }

    /// Ask the upstream who owns the forwarded credentials.
    /// `Ok(None)` means the upstream explicitly refused them (401/403).
    pub async fn whoami(&self, credentials: &HeaderMap) -> Result<Option<Value>, UpstreamError> {
        let url = self.url(&self.whoami_path)?;
        let mut request = self.client.get(&url).header(header::ACCEPT, "application/json");
        for name in [header::COOKIE, header::AUTHORIZATION] {
            if let Some(value) = credentials.get(&name) {
                request = request.header(name, value.clone());
            }
        }

        let response = request
            .send()
            .await
            .map_err(|source| UpstreamError::Unreachable { url: url.clone(), source })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            debug!("Upstream whoami refused credentials ({})", status);
            return Ok(None);
        }
        if !status.is_success() {
            return Err(UpstreamError::Status(status));
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(|e| UpstreamError::InvalidResponse(e.to_string()))?;
        Ok(Some(body))
    }

    /// Replay a request against the upstream and hand back its answer
    /// verbatim: status, whitelisted headers and body.
    pub async fn forward(
        &self,
        method: Method,
        path_and_query: &str,
        headers: &HeaderMap,
        body: Bytes,
    ) -> Result<Response, UpstreamError> {
        let url = self.url(path_and_query)?;
        debug!("Forwarding {} {} to upstream", method, path_and_query);

        let mut request = self.client.request(method, &url);
        for name in FORWARDED_REQUEST_HEADERS {
            for value in headers.get_all(name) {
                request = request.header(name.clone(), value.clone());
            }
        }
        if !body.is_empty() {
            request = request.body(body);
        }

        let upstream_response = request
            .send()
            .await
            .map_err(|source| UpstreamError::Unreachable { url: url.clone(), source })?;

        let status = upstream_response.status();
        let mut builder = Response::builder().status(status);
        for name in FORWARDED_RESPONSE_HEADERS {
            for value in upstream_response.headers().get_all(name) {
                builder = builder.header(name.clone(), value.clone());
            }
        }

        let bytes = upstream_response
            .bytes()
            .await
            .map_err(|e| UpstreamError::InvalidResponse(e.to_string()))?;

        builder
            .body(Body::from(bytes))
            .map_err(|e| UpstreamError::InvalidResponse(e.to_string()))
    }
}
