//! HTTP client for a settlement-broker sidecar
//!
//! Endpoints are relative to the configured base URL:
//!
//! | Operation | Request |
//! |---|---|
//! | deposit | `POST /deposit {amount}` |
//! | balance | `GET /balance` |
//! | refund | `POST /refund {amount}` |
//! | create ledger | `POST /ledger {amount}` |
//! | retrieve | `POST /retrieve-funds {serviceType}` |
//! | delete ledger | `DELETE /ledger` |
//!
//! Mutating calls answer `{"message": "..."}`. Non-2xx answers carry the
//! failure text in `error` (or `message`).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::{Value, json};

use super::{Broker, BrokerError, BrokerValue, OgAmount, ServiceType};
use crate::config::BrokerConfig;

pub struct HttpBroker {
    client: Client,
    base_url: String,
}

impl HttpBroker {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, BrokerError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BrokerError::Transport(e.to_string()))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &BrokerConfig) -> Result<Self, BrokerError> {
        let base_url = config.base_url.as_deref().ok_or_else(|| {
            BrokerError::Unavailable("broker.base_url is required for the http broker".to_string())
        })?;
        Self::new(base_url, Duration::from_millis(config.timeout_ms))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value, BrokerError> {
        let response = request
            .send()
            .await
            .map_err(|e| BrokerError::Transport(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BrokerError::Transport(e.to_string()))?;

        if !status.is_success() {
            tracing::debug!(status = %status, body = %body, "broker rejected request");
            return Err(BrokerError::Rejected(failure_text(&body, status)));
        }

        serde_json::from_str(&body).map_err(|e| BrokerError::InvalidResponse(e.to_string()))
    }

    async fn send_for_message(&self, request: RequestBuilder) -> Result<String, BrokerError> {
        let reply = self.send(request).await?;
        reply
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| BrokerError::InvalidResponse("missing `message` field".to_string()))
    }
}

/// Text to surface for a non-2xx broker answer
fn failure_text(body: &str, status: reqwest::StatusCode) -> String {
    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|v| {
        ["error", "message"]
            .iter()
            .find_map(|key| v.get(key).and_then(Value::as_str).map(str::to_string))
    });
    match from_json {
        Some(text) => text,
        None if !body.trim().is_empty() => body.trim().to_string(),
        None => format!("Broker returned HTTP {}", status),
    }
}

#[async_trait]
impl Broker for HttpBroker {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn deposit_funds(&self, amount: OgAmount) -> Result<String, BrokerError> {
        let req = self
            .client
            .post(self.url("/deposit"))
            .json(&json!({ "amount": amount.value() }));
        self.send_for_message(req).await
    }

    async fn get_balance(&self) -> Result<BrokerValue, BrokerError> {
        let reply = self.send(self.client.get(self.url("/balance"))).await?;
        Ok(BrokerValue::from_json(reply))
    }

    async fn request_refund(&self, amount: OgAmount) -> Result<String, BrokerError> {
        let req = self
            .client
            .post(self.url("/refund"))
            .json(&json!({ "amount": amount.value() }));
        self.send_for_message(req).await
    }

    async fn add_funds_to_ledger(&self, amount: OgAmount) -> Result<String, BrokerError> {
        let req = self
            .client
            .post(self.url("/ledger"))
            .json(&json!({ "amount": amount.value() }));
        self.send_for_message(req).await
    }

    async fn retrieve_funds(&self, service: ServiceType) -> Result<String, BrokerError> {
        let req = self
            .client
            .post(self.url("/retrieve-funds"))
            .json(&json!({ "serviceType": service.as_str() }));
        self.send_for_message(req).await
    }

    async fn delete_ledger(&self) -> Result<String, BrokerError> {
        let req = self.client.delete(self.url("/ledger"));
        self.send_for_message(req).await
    }
}
