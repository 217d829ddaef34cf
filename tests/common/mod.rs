#![allow(dead_code)]

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::Value;

use finance_api::auth::{generate_jwt, hash_password, Claims};
use finance_api::config::{AppConfig, AuthMode};
use finance_api::database::Database;
use finance_api::{app, AppState};

pub const USERNAME: &str = "ana";
pub const PASSWORD: &str = "s3nha-forte";

/// A server on its own port with its own in-memory database
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub db: Database,
    pub config: AppConfig,
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.api.enable_request_logging = false;
    config
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with(test_config()).await
    }

    pub async fn spawn_with(config: AppConfig) -> Result<Self> {
        let db = Database::in_memory().await?;
        db.migrate().await?;
        let state = AppState::new(config.clone(), db.clone())?;
        Self::serve(state, config, db).await
    }

    /// Serve a prepared state, e.g. one with a stub identity provider
    pub async fn serve(state: AppState, config: AppConfig, db: Database) -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test port")?;

        let router = app(state);
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Ok(Self {
            port,
            base_url: format!("http://127.0.0.1:{}", port),
            db,
            config,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Session token signed with this server's secret
    pub fn token(&self) -> Result<String> {
        Ok(generate_jwt(&Claims::new(USERNAME, 1, 1), &self.config.security)?)
    }

    pub async fn create_user(&self, username: &str, password: &str) -> Result<i64> {
        let user = self
            .db
            .users()
            .create(username, &hash_password(password)?)
            .await?;
        Ok(user.id)
    }

    pub async fn seed_entry(&self, entry: SeedEntry<'_>) -> Result<i64> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO journal_entries \
             (Data, Estabelecimento, Valor, ValorPositivo, TipoTransacao, GRUPO, SUBGRUPO, TipoGasto, MesFatura, banco, IgnorarDashboard) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(entry.data)
        .bind(entry.estabelecimento)
        .bind(entry.valor)
        .bind(entry.valor.abs())
        .bind(entry.tipo)
        .bind(entry.grupo)
        .bind(entry.subgrupo)
        .bind(entry.tipo_gasto)
        .bind(entry.mes_fatura)
        .bind("Itaú")
        .bind(entry.ignorar)
        .fetch_one(self.db.pool())
        .await?;
        Ok(id)
    }

    pub async fn count(&self, table: &str) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", table);
        let count: i64 = sqlx::query_scalar(&sql).fetch_one(self.db.pool()).await?;
        Ok(count)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SeedEntry<'a> {
    pub data: &'a str,
    pub estabelecimento: &'a str,
    pub valor: f64,
    pub tipo: &'a str,
    pub grupo: Option<&'a str>,
    pub subgrupo: Option<&'a str>,
    pub tipo_gasto: Option<&'a str>,
    pub mes_fatura: &'a str,
    pub ignorar: bool,
}

impl<'a> SeedEntry<'a> {
    pub fn expense(estabelecimento: &'a str, valor: f64, mes_fatura: &'a str) -> Self {
        Self {
            data: "2025-03-10",
            estabelecimento,
            valor: -valor,
            tipo: "Despesas",
            grupo: None,
            subgrupo: None,
            tipo_gasto: None,
            mes_fatura,
            ignorar: false,
        }
    }

    pub fn income(estabelecimento: &'a str, valor: f64, mes_fatura: &'a str) -> Self {
        Self {
            valor,
            tipo: "Receitas",
            ..Self::expense(estabelecimento, valor, mes_fatura)
        }
    }

    pub fn grupo(self, grupo: &'a str, subgrupo: &'a str) -> Self {
        Self {
            grupo: Some(grupo),
            subgrupo: Some(subgrupo),
            ..self
        }
    }

    pub fn ignored(self) -> Self {
        Self { ignorar: true, ..self }
    }
}

/// Serve a stand-in upstream on a free port, returning its base URL
pub async fn spawn_mock(router: axum::Router) -> Result<String> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind mock port")?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    Ok(format!("http://127.0.0.1:{}", port))
}

/// Config that delegates identity to `upstream_url`
pub fn upstream_config(upstream_url: &str) -> AppConfig {
    let mut config = test_config();
    config.security.auth_mode = AuthMode::Upstream;
    config.upstream.base_url = Some(upstream_url.to_string());
    config.upstream.timeout_secs = 2;
    config
}

/// Client that never follows redirects so tests can inspect them
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("client")
}

/// Client sending a bearer token on every request
pub fn authed_client(token: &str) -> reqwest::Client {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::AUTHORIZATION,
        format!("Bearer {}", token).parse().expect("header value"),
    );
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .default_headers(headers)
        .build()
        .expect("client")
}

/// Status plus parsed JSON body (Null when empty)
pub async fn json_of(res: reqwest::Response) -> Result<(StatusCode, Value)> {
    let status = res.status();
    let bytes = res.bytes().await?;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).with_context(|| format!("non-JSON body: {:?}", bytes))?
    };
    Ok((status, body))
}
