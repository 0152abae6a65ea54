use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::info;

use dinebot_core::config::{ConfigError, MailConfig};
use dinebot_core::errors::ClientError;

const SERVICE: &str = "mail api";
const CHARSET: &str = "UTF-8";

/// Plain-text message to a single recipient.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &Email) -> Result<(), ClientError>;
}

#[derive(Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    text: &'a str,
    charset: &'static str,
}

/// Transactional mail API taking one JSON message per request.
#[derive(Clone)]
pub struct HttpMailer {
    client: Client,
    api_url: String,
    api_key: Option<SecretString>,
    sender: String,
}

impl HttpMailer {
    pub fn new(client: Client, api_url: impl Into<String>, sender: impl Into<String>) -> Self {
        Self { client, api_url: api_url.into(), api_key: None, sender: sender.into() }
    }

    pub fn with_api_key(mut self, api_key: SecretString) -> Self {
        self.api_key = Some(api_key);
        self
    }

    pub fn from_config(client: Client, config: &MailConfig) -> Result<Self, ConfigError> {
        let mailer = Self::new(client, config.require_api_url()?, &config.sender);
        Ok(match &config.api_key {
            Some(api_key) => mailer.with_api_key(api_key.clone()),
            None => mailer,
        })
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, email: &Email) -> Result<(), ClientError> {
        let payload = SendRequest {
            from: &self.sender,
            to: [email.to.as_str()],
            subject: &email.subject,
            text: &email.body,
            charset: CHARSET,
        };
        let mut request = self.client.post(&self.api_url).json(&payload);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key.expose_secret());
        }

        let response = request.send().await.map_err(|error| ClientError::Transport {
            service: SERVICE,
            detail: error.to_string(),
        })?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status { service: SERVICE, status: status.as_u16(), body });
        }
        Ok(())
    }
}

/// Writes messages to the log instead of delivering them.
#[derive(Debug, Default)]
pub struct LogMailer {
    sent: Mutex<Vec<Email>>,
}

impl LogMailer {
    pub fn sent(&self) -> Vec<Email> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: &Email) -> Result<(), ClientError> {
        info!(
            event_name = "worker.mail.logged",
            to = %email.to,
            subject = %email.subject,
            "mail delivery disabled; suggestion logged"
        );
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(email.clone());
        }
        Ok(())
    }
}
