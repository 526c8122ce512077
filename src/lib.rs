// src/lib.rs
//! notion-blocks library: resolves pages and block trees from a Notion
//! workspace through its private `loadPageChunk` API.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling** - `AppError`, `ValidationError`, `NotionErrorCode`
//! - **Configuration** - `CommandLineInput`, `Command`, `ClientConfig`
//! - **Domain model** - `Block`, `PageBlock`, `BlockNode`, `CollectionInfo`
//! - **Domain types** - `BlockId`, `Session`, `SessionToken`, `ApiBaseUrl`
//! - **API client** - `NotionClient`, `RecordFetcher`, `NotionHttpClient`, extractors

mod api;
mod config;
mod constants;
mod error;
mod error_recovery;
mod model;
mod types;

// --- Error Handling ---
pub use crate::error::{AppError, NotionErrorCode, Result};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{ClientConfig, Command, CommandLineInput};

// --- Domain Model ---
pub use crate::model::{
    Block, BlockNode, BlockPropsAndFormat, BlockType, CollectionInfo, PageBlock,
};

// --- Domain Types ---
pub use crate::types::{
    check_id_length, normalize, ActiveUser, ApiBaseUrl, BlockId, Session, SessionToken,
};

// --- API Client ---
pub use crate::api::{
    parser::{
        extract_children_ids, extract_collection_id, extract_collection_info,
        extract_collection_title, extract_parent_id, extract_props_and_format, extract_title,
        extract_type, extract_view_ids, filter_nil_blocks, join_title_fragments, parse_block,
        BlockRecord, TitleStorage,
    },
    types::{EmptinessRule, LoadPageChunkRequest, TransportResponse},
    LookupPath, NotionClient, NotionHttpClient, Pagination, RecordFetcher, RecordSnapshot,
    RecordTransport,
};

// --- Retry ---
pub use crate::error_recovery::{retry_until_ready, Attempt, RetryOutcome, RetryPolicy};
