//! Test helpers for integration tests
//!
//! Provides utilities for spawning test servers and making HTTP requests.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use blood_api::{create_app, create_app_state};
use blood_common::AppConfig;
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::fixtures::{AuthResponse, LoginRequest, RegisterRequest};

/// Prefix every API route lives under
pub const API_PREFIX: &str = "/api/v1";

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server on an ephemeral port
    pub async fn start() -> Result<Self> {
        let config = test_config()?;
        Self::start_with_config(config).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let state = create_app_state(config).await?;
        let app = create_app(state)?;

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            _handle: handle,
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with("/health") {
            format!("{}{}", self.base_url(), path)
        } else {
            format!("{}{}{}", self.base_url(), API_PREFIX, path)
        }
    }

    pub async fn get(&self, path: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).send().await?)
    }

    pub async fn get_auth(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self
            .client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await?)
    }

    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        Ok(self.client.post(self.url(path)).json(body).send().await?)
    }

    pub async fn post_auth<T: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<Response> {
        Ok(self
            .client
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?)
    }

    pub async fn put_auth<T: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<Response> {
        Ok(self
            .client
            .put(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?)
    }

    pub async fn delete_auth(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self
            .client
            .delete(self.url(path))
            .bearer_auth(token)
            .send()
            .await?)
    }

    /// Register a fresh account and sign it in
    pub async fn register_and_login(&self) -> Result<(RegisterRequest, AuthResponse)> {
        let register = RegisterRequest::unique();
        assert_status(
            self.post("/auth/register", &register).await?,
            StatusCode::CREATED,
        )
        .await?;

        let response = self
            .post("/auth/login", &LoginRequest::from_register(&register))
            .await?;
        let auth = assert_json(response, StatusCode::OK).await?;
        Ok((register, auth))
    }

    /// Register, sign in, and pick a role; returns the re-issued tokens
    pub async fn signed_in_as(&self, role: &str) -> Result<(RegisterRequest, AuthResponse)> {
        let (register, auth) = self.register_and_login().await?;
        let response = self
            .post_auth(
                "/auth/select-role",
                &auth.access_token,
                &serde_json::json!({ "role": role }),
            )
            .await?;
        let changed = assert_json(response, StatusCode::OK).await?;
        Ok((register, changed))
    }
}

/// Load configuration from the environment, with rate limits raised so
/// parallel tests never trip them
pub fn test_config() -> Result<AppConfig> {
    let mut config = AppConfig::from_env().map_err(|e| anyhow::anyhow!("Config error: {e}"))?;
    config.rate_limit.requests_per_second = 1000;
    config.rate_limit.burst = 1000;
    config.database.run_migrations = true;
    Ok(config)
}

/// Helper to check if test environment is available
pub async fn check_test_env() -> bool {
    for var in ["DATABASE_URL", "REDIS_URL", "JWT_SECRET"] {
        if std::env::var(var).is_err() {
            eprintln!("Skipping test: {var} not set");
            return false;
        }
    }
    true
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(())
}

/// Assert an error response and return its `error.code`
pub async fn assert_error(response: Response, expected_status: StatusCode) -> Result<String> {
    let body: serde_json::Value = assert_json(response, expected_status).await?;
    Ok(body["error"]["code"].as_str().unwrap_or_default().to_string())
}
