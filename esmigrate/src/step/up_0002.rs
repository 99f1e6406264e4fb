use async_trait::async_trait;

use super::MigrationStep;
use crate::client::{IndexRequest, IndexingClient};
use crate::document::Document;
use crate::Result;

const MARKER: &str = "0002-java";
const DOC_TYPE: &str = "kv";

/// Seeds the `kv` type with a single marker document whose id and both
/// fields are `"0002-java"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Up0002;

impl Up0002 {
    pub fn request(&self, target_index: &str) -> IndexRequest {
        IndexRequest::new(target_index, DOC_TYPE, MARKER)
            .source([("k", MARKER), ("v", MARKER)].into_iter().collect::<Document>())
    }
}

#[async_trait]
impl MigrationStep for Up0002 {
    fn id(&self) -> &str {
        MARKER
    }

    fn version(&self) -> &str {
        "0002"
    }

    async fn execute(&self, client: &dyn IndexingClient, target_index: &str) -> Result<()> {
        let response = client
            .index(self.request(target_index))
            .await
            .inspect_err(|e| {
                tracing::warn!(step = MARKER, index = target_index, "Step failed: {}", e)
            })?;

        tracing::info!(
            step = MARKER,
            index = %response.index,
            backend = client.backend_name(),
            version = response.version,
            "Applied migration step"
        );
        Ok(())
    }
}
