//! Webhook transport: posts `{"content": "<text>"}` to a configured URL.
//!
//! Compatible with Discord-style webhooks, but any endpoint accepting that
//! payload shape works.

use async_trait::async_trait;
use serde_json::json;
use weekcast_core::{PublishError, Publisher};

pub struct WebhookPublisher {
    client: reqwest::Client,
    url: String,
}

impl WebhookPublisher {
    pub fn new(url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }
}

#[async_trait]
impl Publisher for WebhookPublisher {
    async fn publish(&self, text: &str) -> Result<(), PublishError> {
        let response = self
            .client
            .post(&self.url)
            .json(&json!({ "content": text }))
            .send()
            .await
            .map_err(|e| PublishError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PublishError::Rejected {
                status: response.status().as_u16(),
            });
        }
        Ok(())
    }
}
