// Posts zome API
//
// Typed wrapper over the raw call primitive. Every view talks to the backend
// through this struct; it owns the role/zome naming and the payload codecs so
// views only deal with Post, ActionHash and Record.

mod models;

pub use models::{
    Action, ActionHash, ActionHashed, ActionType, Entry, Post, Record, RecordEntry,
    SignedActionHashed, UpdatePostInput,
};

use crate::client::{AppClient, CallError, ZomeCallRequest};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// Handle to the posts zome of one role
#[derive(Clone)]
pub struct PostsZome {
    client: Arc<dyn AppClient>,
    role_name: String,
    zome_name: String,
}

impl PostsZome {
    pub fn new(
        client: Arc<dyn AppClient>,
        role_name: impl Into<String>,
        zome_name: impl Into<String>,
    ) -> Self {
        Self {
            client,
            role_name: role_name.into(),
            zome_name: zome_name.into(),
        }
    }

    /// Issue one call and decode its result
    async fn call<P, R>(&self, fn_name: &str, payload: &P) -> Result<R, CallError>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let payload = serde_json::to_value(payload)
            .map_err(|e| CallError::Decode(format!("Failed to encode payload: {}", e)))?;

        let request = ZomeCallRequest {
            cap_secret: None,
            role_name: self.role_name.clone(),
            zome_name: self.zome_name.clone(),
            fn_name: fn_name.to_string(),
            payload,
        };

        tracing::debug!(
            "zome call {}/{}/{}",
            self.role_name,
            self.zome_name,
            fn_name
        );

        let value = self.client.call_zome(request).await.map_err(|e| {
            tracing::warn!("zome call {} failed: {}", fn_name, e);
            e
        })?;

        serde_json::from_value(value).map_err(|e| {
            CallError::Decode(format!("Unexpected result from {}: {}", fn_name, e))
        })
    }

    /// Identifiers of every post, in the order the backend returns them
    pub async fn get_all_posts(&self) -> Result<Vec<ActionHash>, CallError> {
        self.call("get_all_posts", &()).await
    }

    /// Latest record of a post, `None` if it does not exist (or was deleted)
    pub async fn get_post(&self, post_hash: &ActionHash) -> Result<Option<Record>, CallError> {
        self.call("get_post", post_hash).await
    }

    pub async fn create_post(&self, post: &Post) -> Result<Record, CallError> {
        self.call("create_post", post).await
    }

    pub async fn update_post(&self, input: &UpdatePostInput) -> Result<Record, CallError> {
        self.call("update_post", input).await
    }

    /// Delete a post; the backend's delete action hash is not needed by the UI
    pub async fn delete_post(&self, post_hash: &ActionHash) -> Result<(), CallError> {
        let _delete_hash: ActionHash = self.call("delete_post", post_hash).await?;
        Ok(())
    }
}
