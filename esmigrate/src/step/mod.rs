//! Migration steps
//!
//! A step is applied by an external runner, which owns ordering and
//! decides what to do when a step fails. Steps never retry or recover.

mod up_0002;

pub use up_0002::Up0002;

use async_trait::async_trait;

use crate::client::IndexingClient;
use crate::Result;

#[async_trait]
pub trait MigrationStep: Send + Sync {
    /// Stable identifier, unique across all steps
    fn id(&self) -> &str;

    /// Version label used by runners to order steps
    fn version(&self) -> &str;

    /// Apply the step to `target_index`. Backend errors are returned as-is.
    async fn execute(&self, client: &dyn IndexingClient, target_index: &str) -> Result<()>;
}

/// Steps shipped with this crate, in version order
pub fn steps() -> Vec<Box<dyn MigrationStep>> {
    vec![Box::new(Up0002)]
}
