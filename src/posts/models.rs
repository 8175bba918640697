// Data model for posts and the records the conductor wraps them in
//
// The conductor never hands back a bare Post. Every read or write returns a
// Record: the signed action that produced this version plus the entry it
// points at. The action hash doubles as the post identifier.

use crate::client::CallError;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A forum post as stored in the app entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub title: String,
    pub content: String,
}

impl Post {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

/// Opaque, content-derived identifier issued by the conductor
///
/// Identifies either one version of a post (the hash of a create or update
/// action) or, when it is the create action's hash, the post's whole lineage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionHash(String);

impl ActionHash {
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short form for compact displays (first 12 chars)
    pub fn short(&self) -> &str {
        let end = self
            .0
            .char_indices()
            .nth(12)
            .map(|(i, _)| i)
            .unwrap_or(self.0.len());
        &self.0[..end]
    }
}

impl fmt::Display for ActionHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kind of action that produced a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionType {
    Create,
    Update,
    Delete,
}

/// The action header the conductor signs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub action_type: ActionType,
    pub author: String,
    pub timestamp: DateTime<Utc>,
    /// Set on updates and deletes: the create action this version descends from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_action_hash: Option<ActionHash>,
    /// Hash of the entry this action writes (absent on deletes)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_hash: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionHashed {
    pub hash: ActionHash,
    pub content: Action,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedActionHashed {
    pub hashed: ActionHashed,
    pub signature: String,
}

/// App entry payload as carried over the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub entry_type: String,
    pub entry: serde_json::Value,
}

/// Whether the record carries its entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RecordEntry {
    Present(Entry),
    Hidden,
    NotApplicable,
    NotStored,
}

/// Backend envelope around one version of a post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub signed_action: SignedActionHashed,
    pub entry: RecordEntry,
}

impl Record {
    /// Hash of the action that produced this version
    ///
    /// This is what an update must name as `previous_post_hash`.
    pub fn action_hash(&self) -> &ActionHash {
        &self.signed_action.hashed.hash
    }

    pub fn action(&self) -> &Action {
        &self.signed_action.hashed.content
    }

    /// Decode the app entry into a concrete type
    pub fn decode_entry<T: DeserializeOwned>(&self) -> Result<T, CallError> {
        match &self.entry {
            RecordEntry::Present(entry) => serde_json::from_value(entry.entry.clone())
                .map_err(|e| CallError::Decode(format!("malformed entry: {}", e))),
            other => Err(CallError::Decode(format!(
                "record has no entry ({:?})",
                other
            ))),
        }
    }
}

/// Payload of `update_post`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdatePostInput {
    /// Create action hash; stable across every update
    pub original_post_hash: ActionHash,
    /// The version being superseded (last one the UI fetched)
    pub previous_post_hash: ActionHash,
    pub updated_post: Post,
}
