//! Transactional mail API client
//!
//! Posts `{from, to, subject, text}` JSON with a bearer API key, the request
//! shape used by Resend-style providers.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::application::ports::{ActivationMessage, Notifier, NotifyError};

#[derive(Debug, Serialize)]
struct SendEmail<'a> {
    from: &'a str,
    to: Vec<&'a str>,
    subject: &'a str,
    text: String,
}

pub struct HttpMailer {
    client: Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl HttpMailer {
    pub fn new(
        api_url: &str,
        api_key: &str,
        from: &str,
        timeout: Duration,
    ) -> Result<Self, NotifyError> {
        if api_url.is_empty() {
            return Err(NotifyError::Transport("mail api_url is not configured".into()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
            from: from.to_string(),
        })
    }
}

#[async_trait]
impl Notifier for HttpMailer {
    async fn send_activation(&self, message: &ActivationMessage) -> Result<(), NotifyError> {
        let payload = SendEmail {
            from: &self.from,
            to: vec![message.email.as_str()],
            subject: message.subject(),
            text: message.body(),
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotifyError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Rejected(status.as_u16()));
        }

        debug!(status = status.as_u16(), "Mail API accepted activation message");
        Ok(())
    }
}
