// src/api/mod.rs
//! Block API interaction: the ability to load record snapshots and turn
//! them into a navigable block tree.
//!
//! I/O lives behind [`RecordTransport`]; retrying lives in [`fetcher`];
//! field extraction in [`parser`] is pure; [`resolver`] ties them together.

pub mod client;
pub mod fetcher;
pub mod parser;
pub mod resolver;
#[cfg(test)]
pub(crate) mod testing;
pub mod types;

use crate::error::AppError;
use types::{LoadPageChunkRequest, TransportResponse};

/// The ability to send one `loadPageChunk` request.
///
/// Business logic depends on this trait, never on HTTP details.
#[async_trait::async_trait]
pub trait RecordTransport: Send + Sync {
    async fn load_page_chunk(
        &self,
        request: &LoadPageChunkRequest,
    ) -> Result<TransportResponse, AppError>;
}

// Re-export the public interface
pub use client::NotionHttpClient;
pub use fetcher::{LookupPath, RecordFetcher};
pub use resolver::NotionClient;
pub use types::{Pagination, RecordSnapshot};
