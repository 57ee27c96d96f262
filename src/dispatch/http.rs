use super::{ActionDispatcher, Endpoint};
use crate::error::DispatchError;
use crate::settings::Settings;
use async_trait::async_trait;
use serde_json::Value;

/// [`ActionDispatcher`] over HTTP, with URLs taken from [`Settings`].
#[derive(Debug, Clone)]
pub struct HttpDispatcher {
    client: reqwest::Client,
    settings: Settings,
}

impl HttpDispatcher {
    pub fn new(settings: Settings) -> Self {
        Self::with_client(reqwest::Client::new(), settings)
    }

    pub fn with_client(client: reqwest::Client, settings: Settings) -> Self {
        Self { client, settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

#[async_trait]
impl ActionDispatcher for HttpDispatcher {
    fn is_configured(&self, endpoint: Endpoint) -> bool {
        self.settings.url(endpoint).is_some()
    }

    async fn post(&self, endpoint: Endpoint, body: Value) -> Result<Value, DispatchError> {
        let url = self
            .settings
            .url(endpoint)
            .ok_or(DispatchError::NotConfigured(endpoint))?;
        log::debug!("POST {} ({})", url, endpoint.action());

        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| DispatchError::Network(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| DispatchError::Network(e.to_string()))?;
        // A reply that is not JSON fails the action even on success.
        let reply: Value = serde_json::from_str(&text)
            .map_err(|e| DispatchError::Network(format!("invalid JSON reply: {}", e)))?;

        if !status.is_success() {
            let message = reply
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("Unknown error")
                .to_string();
            log::warn!("{} failed with {}: {}", endpoint.action(), status, message);
            return Err(DispatchError::Rejected {
                action: endpoint.action().to_string(),
                status: status.as_u16(),
                message,
            });
        }
        Ok(reply)
    }
}
