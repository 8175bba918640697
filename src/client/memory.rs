//! In-process conductor for demo mode and tests
//!
//! Implements the posts zome with the semantics the UI relies on:
//! - identifiers are content-derived (SHA-256 over the serialized action)
//! - `get_all_posts` returns live originals in creation order
//! - `get_post` follows the update chain to the latest version
//! - `update_post` must name the current latest version (optimistic concurrency)
//! - `delete_post` removes the post from the index
//!
//! Failure injection (`fail_next`) and call counting (`calls`) let tests
//! exercise the error paths of every view.

use super::{AppClient, CallError, ZomeCallRequest};
use crate::posts::{
    Action, ActionHash, ActionHashed, ActionType, Entry, Post, Record, RecordEntry,
    SignedActionHashed, UpdatePostInput,
};
use chrono::Utc;
use futures::future::BoxFuture;
use futures::FutureExt;
use serde::de::DeserializeOwned;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Zome served by the in-memory conductor
const POSTS_ZOME: &str = "posts";

/// Agent that authors every action
const AGENT_PUB_KEY: &str = "uhCAkmemoryagent";

/// Error kind used for zome-level failures
const RIBOSOME_ERROR: &str = "ribosome_error";

/// Lineage of one post: create action first, then updates in order
#[derive(Debug)]
struct PostLineage {
    versions: Vec<Record>,
    deleted: bool,
}

impl PostLineage {
    fn latest(&self) -> &Record {
        // versions always holds at least the create record
        &self.versions[self.versions.len() - 1]
    }
}

#[derive(Debug, Default)]
struct ConductorState {
    /// "all posts" index: original hashes of live posts, creation order
    index: Vec<ActionHash>,
    /// Lineages keyed by original (create) hash
    posts: HashMap<ActionHash, PostLineage>,
    /// Monotonic sequence mixed into hashes so identical posts get distinct ids
    seq: u64,
    /// Pending injected failures per fn_name
    failures: HashMap<String, VecDeque<String>>,
    /// Number of calls received per fn_name
    calls: HashMap<String, usize>,
}

/// In-memory conductor implementing [`AppClient`]
#[derive(Clone, Default)]
pub struct MemoryConductor {
    state: Arc<Mutex<ConductorState>>,
    latency: Duration,
}

impl MemoryConductor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every call (demo mode uses this so pending states are visible)
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Create posts directly, bypassing the call path
    pub fn seed(&self, posts: &[Post]) -> Vec<ActionHash> {
        let mut state = self.lock();
        posts
            .iter()
            .map(|post| create(&mut state, post.clone()).action_hash().clone())
            .collect()
    }

    /// Make the next call to `fn_name` fail with `message`
    pub fn fail_next(&self, fn_name: &str, message: impl Into<String>) {
        self.lock()
            .failures
            .entry(fn_name.to_string())
            .or_default()
            .push_back(message.into());
    }

    /// How many times `fn_name` has been called
    pub fn calls(&self, fn_name: &str) -> usize {
        self.lock().calls.get(fn_name).copied().unwrap_or(0)
    }

    /// Current contents of the "all posts" index
    pub fn post_hashes(&self) -> Vec<ActionHash> {
        self.lock().index.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ConductorState> {
        // A poisoned lock only means a test panicked mid-call; the data is still usable
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn handle(&self, request: &ZomeCallRequest) -> Result<Value, CallError> {
        let mut state = self.lock();
        *state.calls.entry(request.fn_name.clone()).or_insert(0) += 1;

        if let Some(message) = state
            .failures
            .get_mut(&request.fn_name)
            .and_then(VecDeque::pop_front)
        {
            return Err(CallError::remote(RIBOSOME_ERROR, message));
        }

        if request.zome_name != POSTS_ZOME {
            return Err(CallError::remote(
                "zome_not_found",
                format!("Zome '{}' not found", request.zome_name),
            ));
        }

        match request.fn_name.as_str() {
            "get_all_posts" => to_value(&state.index),
            "get_post" => {
                let hash: ActionHash = from_payload(&request.payload)?;
                let latest = state
                    .posts
                    .get(&hash)
                    .filter(|lineage| !lineage.deleted)
                    .map(|lineage| lineage.latest().clone());
                to_value(&latest)
            }
            "create_post" => {
                let post: Post = from_payload(&request.payload)?;
                let record = create(&mut state, post);
                to_value(&record)
            }
            "update_post" => {
                let input: UpdatePostInput = from_payload(&request.payload)?;
                let record = update(&mut state, input)?;
                to_value(&record)
            }
            "delete_post" => {
                let hash: ActionHash = from_payload(&request.payload)?;
                let delete_hash = delete(&mut state, &hash)?;
                to_value(&delete_hash)
            }
            other => Err(CallError::remote(
                RIBOSOME_ERROR,
                format!("Function '{}' not found in zome '{}'", other, POSTS_ZOME),
            )),
        }
    }
}

impl AppClient for MemoryConductor {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn call_zome(&self, request: ZomeCallRequest) -> BoxFuture<'static, Result<Value, CallError>> {
        let conductor = self.clone();
        async move {
            if !conductor.latency.is_zero() {
                tokio::time::sleep(conductor.latency).await;
            }
            conductor.handle(&request)
        }
        .boxed()
    }
}

fn from_payload<T: DeserializeOwned>(payload: &Value) -> Result<T, CallError> {
    serde_json::from_value(payload.clone()).map_err(|e| {
        CallError::remote("deserialize", format!("Failed to deserialize payload: {}", e))
    })
}

fn to_value<T: serde::Serialize>(value: &T) -> Result<Value, CallError> {
    serde_json::to_value(value).map_err(|e| CallError::Decode(e.to_string()))
}

fn digest(prefix: &str, bytes: &[u8]) -> String {
    let hash = Sha256::digest(bytes);
    let hex: String = hash.iter().map(|b| format!("{:02x}", b)).collect();
    format!("{}{}", prefix, hex)
}

/// Sign and hash an action, producing a record
fn commit(
    state: &mut ConductorState,
    action_type: ActionType,
    original: Option<ActionHash>,
    post: Option<&Post>,
) -> Record {
    state.seq += 1;

    let entry_value = post.map(|p| serde_json::json!({"title": p.title, "content": p.content}));
    let entry_hash = entry_value
        .as_ref()
        .map(|v| digest("uhCEk", v.to_string().as_bytes()));

    let action = Action {
        action_type,
        author: AGENT_PUB_KEY.to_string(),
        timestamp: Utc::now(),
        original_action_hash: original,
        entry_hash,
    };

    let mut preimage = serde_json::to_vec(&action).unwrap_or_default();
    preimage.extend_from_slice(&state.seq.to_be_bytes());
    let hash = ActionHash::new(digest("uhCkk", &preimage));

    let entry = match entry_value {
        Some(entry) => RecordEntry::Present(Entry {
            entry_type: "post".to_string(),
            entry,
        }),
        None => RecordEntry::NotApplicable,
    };

    Record {
        signed_action: SignedActionHashed {
            signature: digest("sig", hash.as_str().as_bytes()),
            hashed: ActionHashed {
                hash,
                content: action,
            },
        },
        entry,
    }
}

fn create(state: &mut ConductorState, post: Post) -> Record {
    let record = commit(state, ActionType::Create, None, Some(&post));
    let hash = record.action_hash().clone();

    state.index.push(hash.clone());
    state.posts.insert(
        hash,
        PostLineage {
            versions: vec![record.clone()],
            deleted: false,
        },
    );
    record
}

fn update(state: &mut ConductorState, input: UpdatePostInput) -> Result<Record, CallError> {
    let latest = match state.posts.get(&input.original_post_hash) {
        Some(lineage) if !lineage.deleted => lineage.latest().action_hash().clone(),
        _ => return Err(CallError::remote(RIBOSOME_ERROR, "Post not found")),
    };

    if latest != input.previous_post_hash {
        return Err(CallError::remote(
            RIBOSOME_ERROR,
            format!(
                "Post was updated elsewhere: previous hash {} is not the latest version",
                input.previous_post_hash.short()
            ),
        ));
    }

    let record = commit(
        state,
        ActionType::Update,
        Some(input.original_post_hash.clone()),
        Some(&input.updated_post),
    );

    if let Some(lineage) = state.posts.get_mut(&input.original_post_hash) {
        lineage.versions.push(record.clone());
    }
    Ok(record)
}

fn delete(state: &mut ConductorState, hash: &ActionHash) -> Result<ActionHash, CallError> {
    match state.posts.get(hash) {
        Some(lineage) if !lineage.deleted => {}
        Some(_) => return Err(CallError::remote(RIBOSOME_ERROR, "Post already deleted")),
        None => return Err(CallError::remote(RIBOSOME_ERROR, "Post not found")),
    }

    let record = commit(state, ActionType::Delete, Some(hash.clone()), None);

    if let Some(lineage) = state.posts.get_mut(hash) {
        lineage.deleted = true;
    }
    state.index.retain(|h| h != hash);

    Ok(record.action_hash().clone())
}
