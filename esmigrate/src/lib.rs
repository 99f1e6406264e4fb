//! esmigrate: migration steps applied to Elasticsearch indexes
//!
//! Steps write through the [`IndexingClient`] trait, so they run the same
//! against a live cluster ([`HttpClient`]) and in-process ([`MemoryClient`]).

pub mod client;
pub mod config;
pub mod document;
pub mod error;
pub mod step;

pub use client::{AuthMethod, HttpClient, IndexingClient, MemoryClient};
pub use client::{IndexRequest, IndexResponse, WriteResult};
pub use config::{Config, ElasticsearchConfig, LoggingConfig};
pub use document::Document;
pub use error::{ClientError, ConfigError, Result};
pub use step::{steps, MigrationStep, Up0002};
