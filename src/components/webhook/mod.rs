pub mod models;

pub use models::{Delivery, WebhookPayload};

use crate::config::WebhookConfig;
use crate::error::{DigestResult, Error};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{error, info};
use url::Url;

/// Bound on a single webhook request
pub const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(15);

/// Posts digests to a chat webhook
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: Client,
    url: Url,
    username: Option<String>,
}

impl WebhookNotifier {
    /// Create a notifier with the standard request timeout
    pub fn new(config: &WebhookConfig) -> DigestResult<Self> {
        Self::with_timeout(config, WEBHOOK_TIMEOUT)
    }

    /// Create a notifier with a custom request timeout
    pub fn with_timeout(config: &WebhookConfig, timeout: Duration) -> DigestResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            url: config.url.clone(),
            username: config.username.clone(),
        })
    }

    /// Whether the webhook accepted the post
    pub fn is_accepted(status: StatusCode) -> bool {
        status == StatusCode::OK || status == StatusCode::NO_CONTENT
    }

    /// Send the digest as one POST; no retries
    pub async fn post(&self, content: &str) -> DigestResult<Delivery> {
        let payload = WebhookPayload {
            content,
            username: self.username.as_deref(),
        };

        let response = self
            .client
            .post(self.url.clone())
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                error!("Webhook request failed: {}", e);
                Error::WebhookRequest(e)
            })?;

        let status = response.status();
        if !Self::is_accepted(status) {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            error!("Webhook rejected digest: HTTP {}", status.as_u16());
            return Err(Error::WebhookStatus { status, body });
        }

        info!("Webhook accepted digest: HTTP {}", status.as_u16());
        Ok(Delivery { status })
    }
}
