//! Test helpers for integration tests
//!
//! Provides a test server on in-memory storage, an inbox that captures
//! outgoing mail, and small request helpers.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use auth_api::{create_app, AppState};
use auth_common::{AppConfig, OtpHasher, TokenCodec};
use auth_db::{MemoryOtpRepository, MemoryRefreshTokenRepository, MemoryUserRepository};
use auth_service::{
    MailError, MailMessage, Mailer, ServiceContextBuilder, ServiceSettings, TokenPolicy,
};
use parking_lot::Mutex;
use reqwest::{header, Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub const REFRESH_TOKEN_HEADER: &str = "refresh-token";

/// Mailer that keeps every message for later inspection
#[derive(Debug, Default)]
pub struct Inbox {
    messages: Mutex<Vec<MailMessage>>,
}

impl Inbox {
    /// Most recent code mailed to `to`
    pub fn last_code_for(&self, to: &str) -> Option<String> {
        self.messages
            .lock()
            .iter()
            .rev()
            .find(|m| m.to == to)
            .and_then(|m| extract_code(&m.html))
    }

    pub fn count(&self) -> usize {
        self.messages.lock().len()
    }
}

#[async_trait]
impl Mailer for Inbox {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        self.messages.lock().push(message.clone());
        Ok(())
    }
}

fn extract_code(html: &str) -> Option<String> {
    html.split(['>', '<'])
        .find(|part| part.len() == 6 && part.bytes().all(|b| b.is_ascii_digit()))
        .map(str::to_string)
}

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    pub inbox: Arc<Inbox>,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server with default settings
    pub async fn start() -> Result<Self> {
        Self::start_with(&[]).await
    }

    /// Start a test server with extra configuration variables
    pub async fn start_with(overrides: &[(&str, &str)]) -> Result<Self> {
        let config = test_config(overrides)?;
        let inbox = Arc::new(Inbox::default());

        let service_context = ServiceContextBuilder::new()
            .user_repo(Arc::new(MemoryUserRepository::new()))
            .otp_repo(Arc::new(MemoryOtpRepository::new()))
            .refresh_token_repo(Arc::new(MemoryRefreshTokenRepository::new()))
            .codec(TokenCodec::from_config(&config.jwt))
            .token_policy(TokenPolicy::from(&config.tokens))
            .otp_hasher(OtpHasher::new(&config.otp.secret)?)
            .mailer(inbox.clone())
            .settings(ServiceSettings::from_config(&config))
            .build()
            .map_err(|e| anyhow::anyhow!("Service context error: {e}"))?;

        let app = create_app(AppState::new(service_context, config))?;

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            inbox,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url(), path))
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        Ok(self.request(reqwest::Method::GET, path).send().await?)
    }

    /// Make a POST request with JSON body
    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        Ok(self
            .request(reqwest::Method::POST, path)
            .json(body)
            .send()
            .await?)
    }

    /// Make a request carrying an access token as a bearer header
    pub async fn send_bearer<T: Serialize>(
        &self,
        method: reqwest::Method,
        path: &str,
        access_token: &str,
        body: Option<&T>,
    ) -> Result<Response> {
        let mut request = self.request(method, path).bearer_auth(access_token);
        if let Some(body) = body {
            request = request.json(body);
        }
        Ok(request.send().await?)
    }

    /// POST with only a refresh token, so the server must rotate
    pub async fn post_refresh(&self, path: &str, refresh_token: &str) -> Result<Response> {
        Ok(self
            .request(reqwest::Method::POST, path)
            .header(REFRESH_TOKEN_HEADER, refresh_token)
            .send()
            .await?)
    }
}

/// Test configuration on in-memory storage
pub fn test_config(overrides: &[(&str, &str)]) -> Result<AppConfig> {
    let mut vars: HashMap<String, String> = [
        ("STORAGE_BACKEND", "memory"),
        ("JWT_SECRET", "integration-test-secret"),
        ("OTP_SECRET", "integration-otp-secret"),
        ("RATE_LIMIT_REQUESTS_PER_SECOND", "1000"),
        ("RATE_LIMIT_BURST", "1000"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    for (key, value) in overrides {
        vars.insert((*key).to_string(), (*value).to_string());
    }

    AppConfig::from_vars(&vars).map_err(|e| anyhow::anyhow!("Config error: {e}"))
}

/// Sorted names of the cookies a response sets
pub fn set_cookie_names(response: &Response) -> Vec<String> {
    let mut names: Vec<String> = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split('=').next())
        .map(str::to_string)
        .collect();
    names.sort();
    names
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_code_from_template() {
        let html = auth_service::otp_email_template("482913");
        assert_eq!(extract_code(&html).as_deref(), Some("482913"));
    }
}
