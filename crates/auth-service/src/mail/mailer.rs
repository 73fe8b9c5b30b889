//! Mail delivery backends

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use auth_common::{MailBackend, MailConfig};
use serde::Serialize;
use tracing::{debug, info, instrument};

const RELAY_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("mail transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("mail relay rejected the message with status {0}")]
    Rejected(u16),

    #[error("mail backend misconfigured: {0}")]
    Config(String),
}

/// Delivers a formatted message
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError>;
}

/// Development mailer that writes messages to the log
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        info!(to = %message.to, subject = %message.subject, "Mail written to log");
        debug!(body = %message.html, "Mail body");
        Ok(())
    }
}

/// Posts messages as JSON to an HTTP mail relay
#[derive(Clone)]
pub struct HttpMailer {
    client: reqwest::Client,
    relay_url: String,
    api_key: Option<String>,
}

impl HttpMailer {
    pub fn new(relay_url: String, api_key: Option<String>) -> Result<Self, MailError> {
        let client = reqwest::Client::builder().timeout(RELAY_TIMEOUT).build()?;
        Ok(Self {
            client,
            relay_url,
            api_key,
        })
    }
}

impl std::fmt::Debug for HttpMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpMailer")
            .field("relay_url", &self.relay_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    #[instrument(skip(self, message), fields(to = %message.to))]
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        let mut request = self.client.post(&self.relay_url).json(message);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(MailError::Rejected(response.status().as_u16()));
        }

        info!(subject = %message.subject, "Mail handed to relay");
        Ok(())
    }
}

/// Build the configured mail backend
pub fn build_mailer(config: &MailConfig) -> Result<Arc<dyn Mailer>, MailError> {
    match config.backend {
        MailBackend::Log => Ok(Arc::new(LogMailer)),
        MailBackend::Http => {
            let url = config
                .relay_url
                .clone()
                .ok_or_else(|| MailError::Config("MAIL_RELAY_URL is not set".to_string()))?;
            Ok(Arc::new(HttpMailer::new(url, config.api_key.clone())?))
        }
    }
}
