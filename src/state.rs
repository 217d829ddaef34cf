use std::sync::Arc;

use crate::auth::{IdentityProvider, JwtIdentity, UpstreamIdentity};
use crate::config::{AppConfig, AuthMode};
use crate::database::Database;
use crate::upstream::{Upstream, UpstreamError};

/// Shared handles cloned into every request
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: Database,
    pub upstream: Upstream,
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    pub fn new(config: AppConfig, db: Database) -> Result<Self, UpstreamError> {
        let upstream = Upstream::from_config(&config.upstream)?;
        let identity: Arc<dyn IdentityProvider> = match config.security.auth_mode {
            AuthMode::Local => Arc::new(JwtIdentity::new(config.security.jwt_secret.clone())),
            AuthMode::Upstream => Arc::new(UpstreamIdentity::new(upstream.clone())),
        };

        Ok(Self {
            config: Arc::new(config),
            db,
            upstream,
            identity,
        })
    }

    /// Swap the identity provider, e.g. for a stub in tests
    pub fn with_identity(mut self, identity: Arc<dyn IdentityProvider>) -> Self {
        self.identity = identity;
        self
    }
}
