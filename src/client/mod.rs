//! Client side of the API: advisory token checks, the saved session, and
//! the HTTP wrapper used by the `finance` binary.

pub mod http;
pub mod token;
pub mod token_store;

use thiserror::Error;

pub use http::{ApiClient, LoginData};
pub use token::{decode_claims, is_token_valid, is_token_valid_at, token_expiry};
pub use token_store::{StoredSession, TokenStore};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Login required, run `finance auth login` ({redirect})")]
    LoginRequired { redirect: String },

    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Server answered {status}: {message}")]
    Api {
        status: u16,
        message: String,
        code: Option<String>,
    },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Token store error: {0}")]
    Store(#[from] std::io::Error),

    #[error("Token store is unreadable: {0}")]
    Corrupt(#[from] serde_json::Error),
}
