//! HTTP/JSON transport to a conductor endpoint
//!
//! Wire format:
//! - `GET  {url}/api/app_info?installed_app_id=..` → [`AppInfo`] (handshake)
//! - `POST {url}/api/zome_call` with a [`ZomeCallRequest`] body → result value
//!
//! Non-2xx responses carry a `{"type": ..., "data": ...}` error payload.

use super::{AppClient, AppInfo, CallError, ConnectionConfig, WireError, ZomeCallRequest};
use futures::future::BoxFuture;
use futures::FutureExt;

/// Conductor client over HTTP
pub struct HttpAppClient {
    client: reqwest::Client,
    base_url: String,
    connect_timeout: std::time::Duration,
}

impl HttpAppClient {
    /// Build a client for the configured endpoint
    ///
    /// Only connection establishment is bounded by a timeout. A zome call
    /// that hangs leaves its view pending.
    pub fn new(config: &ConnectionConfig) -> Result<Self, CallError> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| CallError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            connect_timeout: config.connect_timeout,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    /// Handshake: ask the conductor about the installed app
    pub async fn app_info(&self, installed_app_id: &str) -> Result<AppInfo, CallError> {
        let url = reqwest::Url::parse_with_params(
            &self.endpoint("app_info"),
            &[("installed_app_id", installed_app_id)],
        )
        .map_err(|e| CallError::Transport(format!("Invalid conductor url: {}", e)))?;

        let response = self
            .client
            .get(url)
            .timeout(self.connect_timeout)
            .send()
            .await
            .map_err(|e| CallError::Transport(format!("Handshake failed: {}", e)))?;

        let value = parse_response(response).await?;
        serde_json::from_value(value)
            .map_err(|e| CallError::Decode(format!("Malformed app info: {}", e)))
    }
}

/// Turn an HTTP response into the call's result
async fn parse_response(response: reqwest::Response) -> Result<serde_json::Value, CallError> {
    let status = response.status();

    if status.is_success() {
        return response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| CallError::Decode(format!("Failed to parse response: {}", e)));
    }

    let text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());

    // Prefer the structured payload; fall back to the raw body
    match serde_json::from_str::<WireError>(&text) {
        Ok(wire) => Err(wire.into()),
        Err(_) => Err(CallError::Transport(format!(
            "HTTP {}: {}",
            status.as_u16(),
            text
        ))),
    }
}

impl AppClient for HttpAppClient {
    fn name(&self) -> &'static str {
        "http"
    }

    fn call_zome(
        &self,
        request: ZomeCallRequest,
    ) -> BoxFuture<'static, Result<serde_json::Value, CallError>> {
        let client = self.client.clone();
        let url = self.endpoint("zome_call");

        async move {
            let response = client
                .post(&url)
                .json(&request)
                .send()
                .await
                .map_err(|e| CallError::Transport(format!("Request failed: {}", e)))?;

            parse_response(response).await
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config(url: &str) -> ConnectionConfig {
        ConnectionConfig {
            url: url.to_string(),
            installed_app_id: "forum".to_string(),
            connect_timeout: Duration::from_millis(200),
        }
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let client = HttpAppClient::new(&config("http://127.0.0.1:8888/")).unwrap();
        assert_eq!(
            client.endpoint("zome_call"),
            "http://127.0.0.1:8888/api/zome_call"
        );
    }

    #[tokio::test]
    async fn test_unreachable_conductor_is_transport_error() {
        // Port 9 (discard) on localhost is effectively never listening
        let client = HttpAppClient::new(&config("http://127.0.0.1:9")).unwrap();
        let err = client
            .call_zome(ZomeCallRequest {
                cap_secret: None,
                role_name: "forum".to_string(),
                zome_name: "posts".to_string(),
                fn_name: "get_all_posts".to_string(),
                payload: serde_json::Value::Null,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CallError::Transport(_)));
    }
}
