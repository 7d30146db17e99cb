use anyhow::Result;
use moonrelay_common::config;
use moonrelay_common::payload::Payload;
use reqwest::Client;
use serde_json::Value;

pub struct RelayClient {
    client: Client,
    base_url: String,
}

impl RelayClient {
    /// Client for the relay named by the `RELAY_URL` setting.
    pub fn new() -> Result<Self> {
        Ok(Self::new_with_url(config::get("RELAY_URL")?))
    }

    pub fn new_with_url(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Posts the payload to `/moondream/{operation}` and returns whatever JSON
    /// comes back, error bodies included.
    pub async fn run(&self, payload: Payload) -> Result<Value> {
        let operation = payload.operation();
        let url = format!(
            "{}/moondream/{}",
            self.base_url.trim_end_matches('/'),
            operation
        );
        tracing::debug!(%url, "posting to relay");

        let response = self
            .client
            .post(&url)
            .json(&payload.into_map())
            .send()
            .await?;
        let status = response.status();
        let value: Value = response.json().await?;
        tracing::info!(%operation, status = status.as_u16(), "relay replied");
        Ok(value)
    }
}
