//! Shared snippet storage.
//!
//! Snippets live for as long as the process does. They are created once,
//! addressed by a short random identifier, and never modified or removed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Length of generated snippet identifiers.
pub const SNIPPET_ID_LEN: usize = 10;

/// URL-safe alphabet; 64 symbols so a masked random byte maps onto it uniformly.
const ID_ALPHABET: &[u8; 64] = b"useandom-26T198340PX75pxJACKVERYMINDBUSHWOLF_GQZbfghjklqvwyzrict";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedSnippet {
    pub id: String,
    pub language: String,
    pub code: String,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait SnippetStore: Send + Sync {
    /// Store a new snippet under a fresh identifier and return the full record.
    async fn create(&self, language: String, code: String) -> SharedSnippet;

    /// Look up a snippet. `None` is a normal outcome, not an error.
    async fn get(&self, id: &str) -> Option<SharedSnippet>;

    /// Number of stored snippets.
    async fn len(&self) -> usize;

    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Generate a random identifier from the operating system's CSPRNG.
pub fn generate_id() -> String {
    let mut bytes = [0u8; SNIPPET_ID_LEN];
    OsRng.fill_bytes(&mut bytes);
    bytes
        .iter()
        .map(|b| ID_ALPHABET[(b & 63) as usize] as char)
        .collect()
}

/// Process-local snippet store.
///
/// Cloning is cheap and clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct InMemorySnippetStore {
    snippets: Arc<RwLock<HashMap<String, SharedSnippet>>>,
}

impl InMemorySnippetStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnippetStore for InMemorySnippetStore {
    async fn create(&self, language: String, code: String) -> SharedSnippet {
        let mut snippets = self.snippets.write().await;

        // The id space is large enough that this loop runs once in practice;
        // holding the write lock keeps concurrent creates from racing on an id.
        loop {
            let id = generate_id();
            if let Entry::Vacant(slot) = snippets.entry(id.clone()) {
                let snippet = SharedSnippet {
                    id,
                    language,
                    code,
                    created_at: Utc::now(),
                };
                slot.insert(snippet.clone());
                log::debug!(
                    "Stored snippet {} ({}, {} bytes)",
                    snippet.id,
                    snippet.language,
                    snippet.code.len()
                );
                return snippet;
            }
            log::warn!("Snippet id collision on {}, drawing another", id);
        }
    }

    async fn get(&self, id: &str) -> Option<SharedSnippet> {
        self.snippets.read().await.get(id).cloned()
    }

    async fn len(&self) -> usize {
        self.snippets.read().await.len()
    }
}
