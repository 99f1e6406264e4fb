use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use super::traits::{IndexRequest, IndexResponse, IndexingClient, WriteResult};
use crate::document::Document;
use crate::error::{ClientError, Result};

type Key = (String, String, String);

struct Stored {
    source: Document,
    version: u64,
}

/// In-process backend with Elasticsearch upsert semantics.
///
/// Documents are keyed by (index, type, id). Each write to an existing key
/// replaces the source and bumps its version.
#[derive(Default)]
pub struct MemoryClient {
    docs: RwLock<HashMap<Key, Stored>>,
    closed: AtomicBool,
}

impl MemoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every write after this fails with [`ClientError::Closed`].
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn get(&self, index: &str, doc_type: &str, id: &str) -> Option<Document> {
        self.docs
            .read()
            .get(&key(index, doc_type, id))
            .map(|s| s.source.clone())
    }

    pub fn version(&self, index: &str, doc_type: &str, id: &str) -> Option<u64> {
        self.docs
            .read()
            .get(&key(index, doc_type, id))
            .map(|s| s.version)
    }

    /// Number of documents stored in `index`, across all types
    pub fn count(&self, index: &str) -> usize {
        self.docs.read().keys().filter(|(i, _, _)| i == index).count()
    }
}

fn key(index: &str, doc_type: &str, id: &str) -> Key {
    (index.to_string(), doc_type.to_string(), id.to_string())
}

fn invalid_index(index: &str) -> Option<ClientError> {
    let reason = if index.is_empty() {
        format!("Invalid index name [{}], must not be empty", index)
    } else if index.chars().any(char::is_uppercase) {
        format!("Invalid index name [{}], must be lowercase", index)
    } else {
        return None;
    };
    Some(ClientError::Rejected {
        status: 400,
        error_type: "invalid_index_name_exception".to_string(),
        reason,
    })
}

#[async_trait]
impl IndexingClient for MemoryClient {
    async fn index(&self, request: IndexRequest) -> Result<IndexResponse> {
        if self.is_closed() {
            return Err(ClientError::Closed);
        }
        if let Some(err) = invalid_index(&request.index) {
            return Err(err);
        }

        let IndexRequest {
            index,
            doc_type,
            id,
            source,
        } = request;

        let mut docs = self.docs.write();
        let (version, result) = match docs.entry((index.clone(), doc_type.clone(), id.clone())) {
            Entry::Occupied(mut entry) => {
                let stored = entry.get_mut();
                stored.version += 1;
                stored.source = source;
                (stored.version, WriteResult::Updated)
            }
            Entry::Vacant(entry) => {
                entry.insert(Stored { source, version: 1 });
                (1, WriteResult::Created)
            }
        };
        drop(docs);

        tracing::debug!(%index, %doc_type, %id, version, "Stored document in memory");

        Ok(IndexResponse {
            index,
            doc_type,
            id,
            version,
            result,
        })
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}
