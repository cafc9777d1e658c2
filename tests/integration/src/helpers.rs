//! Test helpers for integration tests
//!
//! Spawns the real application on an ephemeral port and wraps a `reqwest`
//! client around it.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use forum_api::server::{connect_database, create_app, create_app_state, serve};
use forum_common::AppConfig;
use reqwest::{multipart, Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::fixtures::unique_suffix;

/// Test server instance that manages lifecycle
///
/// The server task is aborted when this value drops.
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    pub upload_dir: PathBuf,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server with email verification switched off
    pub async fn start() -> Result<Self> {
        Self::start_with(&[]).await
    }

    /// Start a server with extra configuration variables
    pub async fn start_with(overrides: &[(&str, &str)]) -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let upload_dir = std::env::temp_dir().join(format!(
            "forum-it-{}-{}",
            std::process::id(),
            unique_suffix()
        ));

        let mut vars = test_vars(addr, &upload_dir);
        for (key, value) in overrides {
            vars.insert((*key).to_string(), (*value).to_string());
        }
        let config = test_config(&vars)?;

        let pool = connect_database(&config).await?;
        let state = create_app_state(&config, pool)?;
        let app = create_app(state, &config)?;

        let handle = tokio::spawn(async move {
            serve(listener, app, std::future::pending()).await.ok();
        });

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            addr,
            client,
            upload_dir,
            handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{}", self.base_url(), path)
    }

    /// Make a GET request against an API path
    pub async fn get(&self, path: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).send().await?)
    }

    /// Make a GET request with auth token
    pub async fn get_auth(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self
            .client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await?)
    }

    /// Make a POST request with JSON body
    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        Ok(self.client.post(self.url(path)).json(body).send().await?)
    }

    /// Make a POST request with auth token
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

    /// Make a PATCH request with auth token
    pub async fn patch_auth<T: Serialize>(
        &self,
        path: &str,
        token: &str,
        body: &T,
    ) -> Result<Response> {
        Ok(self
            .client
            .patch(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await?)
    }

    /// Make a DELETE request with auth token
    pub async fn delete_auth(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self
            .client
            .delete(self.url(path))
            .bearer_auth(token)
            .send()
            .await?)
    }

    /// Upload a file as the `file` part of a multipart PATCH
    pub async fn upload_avatar(
        &self,
        token: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<Response> {
        let part = multipart::Part::bytes(bytes)
            .file_name("avatar")
            .mime_str(content_type)?;
        let form = multipart::Form::new().part("file", part);

        Ok(self
            .client
            .patch(self.url("/users/profile/avatar"))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
        let _ = std::fs::remove_dir_all(&self.upload_dir);
    }
}

/// Variables every test server starts from
///
/// The database comes from the environment; everything else is pinned so a
/// developer's `.env` cannot send real email or throttle the suite.
fn test_vars(addr: SocketAddr, upload_dir: &std::path::Path) -> HashMap<String, String> {
    dotenvy::dotenv().ok();

    let mut vars = HashMap::new();
    if let Ok(url) = std::env::var("DATABASE_URL") {
        vars.insert("DATABASE_URL".to_string(), url);
    }
    let fixed = [
        ("APP_ENV", "development".to_string()),
        ("API_HOST", addr.ip().to_string()),
        ("API_PORT", addr.port().to_string()),
        ("AUTH_SECRET", "integration-test-secret".to_string()),
        ("REQUIRE_EMAIL_VERIFICATION", "false".to_string()),
        ("RATE_LIMIT_REQUESTS_PER_SECOND", "1000".to_string()),
        ("RATE_LIMIT_BURST", "1000".to_string()),
        ("UPLOAD_DIR", upload_dir.to_string_lossy().into_owned()),
        ("PUBLIC_BASE_URL", format!("http://{addr}")),
    ];
    for (key, value) in fixed {
        vars.insert(key.to_string(), value);
    }
    vars
}

/// Build a configuration from an explicit variable map only
pub fn test_config(vars: &HashMap<String, String>) -> Result<AppConfig> {
    AppConfig::from_lookup(|key| vars.get(key).cloned())
        .map_err(|e| anyhow::anyhow!("Config error: {e}"))
}

/// Helper to check if test environment is available
pub fn check_test_env() -> bool {
    dotenvy::dotenv().ok();
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("Skipping test: DATABASE_URL not set");
        return false;
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
    body["error"]["code"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("No error code in body: {body}"))
}
