use crate::logging::*;
use moonrelay_common::{ErrorBody, Operation, config};
use serde_json::{Map, Value};
use std::result::Result;
use thiserror::Error;


const AUTH_HEADER: &str = "X-Moondream-Auth";
const NO_API_KEY: &str = "none";

#[derive(Debug, Error)]
pub enum RelayError {
    #[error(transparent)]
    InvalidOperation(#[from] moonrelay_common::Error),
    #[error(transparent)]
    Upstream(#[from] reqwest::Error),
}

pub fn get_base_url() -> String {
    config::get("INFERENCE_URL").unwrap_or_else(|_| "https://api.moondream.ai/v1".to_string())
}

/// Only the hosted API checks the key; self-hosted servers ignore it.
pub fn get_api_key() -> String {
    config::get("MOONDREAM_API_KEY").unwrap_or_else(|_| NO_API_KEY.to_string())
}

/// Returns the payload with streaming forced off, whatever the caller sent.
pub fn with_stream_disabled(mut payload: Map<String, Value>) -> Map<String, Value> {
    payload.insert("stream".to_string(), Value::Bool(false));
    payload
}

/// Forwards requests to the upstream inference API.
///
/// The base URL and key are fixed when the client is built.
pub struct Client {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl Client {
    pub fn new(base_url: String, api_key: String) -> Self {
        let client = reqwest::Client::new();
        Self {
            base_url,
            api_key,
            client,
        }
    }

    pub fn new_default() -> Self {
        Self::new(get_base_url(), get_api_key())
    }

    /// Relays one request. Never fails: every error comes back as
    /// `{"error": "<message>"}`.
    pub async fn relay(&self, operation: &str, payload: Map<String, Value>) -> Value {
        let log = DEFAULT.new(o!(
            "function" => "relay",
            "operation" => operation.to_string(),
        ));

        let res = match operation.parse::<Operation>() {
            Ok(operation) => self.run(operation, payload).await,
            Err(err) => Err(err.into()),
        };
        match res {
            Ok(value) => value,
            Err(err) => {
                warn!(log, "failed to relay"; "error" => %err);
                ErrorBody::from_error(&err).to_value()
            }
        }
    }

    pub async fn run(
        &self,
        operation: Operation,
        payload: Map<String, Value>,
    ) -> Result<Value, RelayError> {
        let log = DEFAULT.new(o!(
            "function" => "run",
            "operation" => operation.to_string(),
        ));
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), operation);
        debug!(log, "forwarding"; "url" => &url);

        let body = with_stream_disabled(payload);
        let response = self
            .client
            .post(&url)
            .header(AUTH_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        let value: Value = response.json().await?;
        info!(log, "upstream replied"; "status" => status.as_u16());
        Ok(value)
    }
}
