//! Remote call primitive
//!
//! Everything the forum reads or writes goes through one operation:
//! "invoke function X of zome Z in role R with payload P, await a value or an
//! error". This module defines that operation as the [`AppClient`] trait and
//! provides two implementations:
//!
//! ```text
//! AppClient trait
//! ├── HttpAppClient   (conductor reached over HTTP/JSON)
//! └── MemoryConductor (in-process backend for demo mode and tests)
//! ```
//!
//! Errors coming back from the boundary are opaque payloads. The UI never
//! interprets them beyond extracting a human-readable message.

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

mod http;
pub mod memory;

pub use http::HttpAppClient;
pub use memory::MemoryConductor;

/// Errors surfaced by a zome call
#[derive(Debug, Clone, PartialEq)]
pub enum CallError {
    /// The conductor answered with an error payload
    Remote { kind: String, data: String },
    /// Request never completed (connection refused, reset, bad status without payload)
    Transport(String),
    /// A response arrived but did not have the expected shape
    Decode(String),
    /// No connection has been established yet
    NotConnected,
}

impl CallError {
    pub fn remote(kind: impl Into<String>, data: impl Into<String>) -> Self {
        Self::Remote {
            kind: kind.into(),
            data: data.into(),
        }
    }

    /// Human-readable message for inline display
    ///
    /// For backend errors this is the payload's `data` field, which is what a
    /// user can act on. Other variants carry their own message.
    pub fn message(&self) -> &str {
        match self {
            Self::Remote { data, .. } => data,
            Self::Transport(msg) | Self::Decode(msg) => msg,
            Self::NotConnected => "not connected to the conductor",
        }
    }
}

impl fmt::Display for CallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote { kind, data } => write!(f, "Remote error ({}): {}", kind, data),
            Self::Transport(msg) => write!(f, "Transport error: {}", msg),
            Self::Decode(msg) => write!(f, "Decode error: {}", msg),
            Self::NotConnected => write!(f, "Not connected"),
        }
    }
}

impl std::error::Error for CallError {}

/// Error payload as the conductor serializes it: `{"type": ..., "data": ...}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireError {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: serde_json::Value,
}

impl From<WireError> for CallError {
    fn from(wire: WireError) -> Self {
        // data is usually a plain string; nested payloads are shown verbatim
        let data = match wire.data {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };
        CallError::Remote {
            kind: wire.kind,
            data,
        }
    }
}

/// One zome call, exactly as sent over the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZomeCallRequest {
    pub cap_secret: Option<String>,
    pub role_name: String,
    pub zome_name: String,
    pub fn_name: String,
    pub payload: serde_json::Value,
}

/// The call primitive every view talks to
///
/// Returned futures are `'static` so callers can spawn them on the runtime
/// and keep rendering while they are outstanding.
pub trait AppClient: Send + Sync {
    /// Short transport name for status displays
    fn name(&self) -> &'static str;

    /// Invoke a zome function
    fn call_zome(
        &self,
        request: ZomeCallRequest,
    ) -> BoxFuture<'static, Result<serde_json::Value, CallError>>;
}

impl fmt::Debug for dyn AppClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AppClient({})", self.name())
    }
}

/// Where and as whom to connect
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Conductor endpoint, e.g. http://127.0.0.1:8888
    pub url: String,
    /// Installed app id checked during the handshake
    pub installed_app_id: String,
    /// Handshake timeout (zome calls themselves have none)
    pub connect_timeout: std::time::Duration,
}

/// Information returned by the handshake
#[derive(Debug, Clone, Deserialize)]
pub struct AppInfo {
    pub installed_app_id: String,
    #[serde(default)]
    pub agent_pub_key: Option<String>,
}

/// Establish a connection and hand out the call primitive
///
/// Performs the app-info handshake first; the UI shows nothing but a spinner
/// until this resolves.
pub async fn connect(config: &ConnectionConfig) -> Result<Arc<dyn AppClient>, CallError> {
    let client = HttpAppClient::new(config)?;
    let info = client.app_info(&config.installed_app_id).await?;

    if info.installed_app_id != config.installed_app_id {
        return Err(CallError::remote(
            "app_not_installed",
            format!(
                "conductor answered for app '{}', expected '{}'",
                info.installed_app_id, config.installed_app_id
            ),
        ));
    }

    tracing::info!(
        "Connected to {} (app: {}, agent: {})",
        config.url,
        info.installed_app_id,
        info.agent_pub_key.as_deref().unwrap_or("unknown")
    );

    Ok(Arc::new(client))
}

/// Backend the shell connects to at startup
#[derive(Clone)]
pub enum Endpoint {
    /// A real conductor over HTTP
    Conductor(ConnectionConfig),
    /// The in-process conductor (demo mode, tests)
    InMemory(MemoryConductor),
}

impl Endpoint {
    /// Label for the status bar
    pub fn describe(&self) -> String {
        match self {
            Endpoint::Conductor(config) => config.url.clone(),
            Endpoint::InMemory(_) => "in-memory (demo)".to_string(),
        }
    }

    /// Run the handshake and return the call primitive
    pub async fn connect(&self) -> Result<Arc<dyn AppClient>, CallError> {
        match self {
            Endpoint::Conductor(config) => connect(config).await,
            Endpoint::InMemory(conductor) => Ok(Arc::new(conductor.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_extracts_payload_data() {
        let err = CallError::remote("ribosome_error", "Post not found");
        assert_eq!(err.message(), "Post not found");
        assert_eq!(err.to_string(), "Remote error (ribosome_error): Post not found");
    }

    #[test]
    fn test_wire_error_with_string_data() {
        let wire: WireError =
            serde_json::from_value(json!({"type": "ribosome_error", "data": "boom"})).unwrap();
        let err = CallError::from(wire);
        assert_eq!(err, CallError::remote("ribosome_error", "boom"));
    }

    #[test]
    fn test_wire_error_with_structured_data() {
        let wire: WireError = serde_json::from_value(
            json!({"type": "internal_error", "data": {"reason": "disk full"}}),
        )
        .unwrap();
        let err = CallError::from(wire);
        assert_eq!(err.message(), r#"{"reason":"disk full"}"#);
    }

    #[test]
    fn test_request_serializes_null_cap_secret() {
        let req = ZomeCallRequest {
            cap_secret: None,
            role_name: "forum".to_string(),
            zome_name: "posts".to_string(),
            fn_name: "get_all_posts".to_string(),
            payload: serde_json::Value::Null,
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["cap_secret"], serde_json::Value::Null);
        assert_eq!(value["fn_name"], "get_all_posts");
    }
}
