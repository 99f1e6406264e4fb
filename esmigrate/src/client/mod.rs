pub mod http;
pub mod memory;
pub mod traits;

pub use http::{AuthMethod, HttpClient};
pub use memory::MemoryClient;
pub use traits::{IndexRequest, IndexResponse, IndexingClient, WriteResult};
