use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::Result;

/// A single-document write addressed by (index, type, id)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexRequest {
    pub index: String,
    pub doc_type: String,
    pub id: String,
    pub source: Document,
}

impl IndexRequest {
    pub fn new(
        index: impl Into<String>,
        doc_type: impl Into<String>,
        id: impl Into<String>,
    ) -> Self {
        Self {
            index: index.into(),
            doc_type: doc_type.into(),
            id: id.into(),
            source: Document::new(),
        }
    }

    pub fn source(mut self, source: Document) -> Self {
        self.source = source;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteResult {
    Created,
    Updated,
}

/// Acknowledgement returned by the backend for an accepted write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexResponse {
    pub index: String,
    pub doc_type: String,
    pub id: String,
    pub version: u64,
    pub result: WriteResult,
}

/// Trait for backends that accept document writes (Elasticsearch, in-memory)
#[async_trait]
pub trait IndexingClient: Send + Sync {
    /// Write `request.source` under (index, type, id), replacing any
    /// existing document with the same id. Returns once the backend
    /// acknowledged the write.
    async fn index(&self, request: IndexRequest) -> Result<IndexResponse>;

    /// Human-readable backend name
    fn backend_name(&self) -> &str;
}
