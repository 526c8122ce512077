// src/constants.rs
//! Domain constants that define the operational boundaries of the client.

// ---------------------------------------------------------------------------
// Private API
// ---------------------------------------------------------------------------

/// Base URL of the private block API.
pub const NOTION_API_BASE_URL: &str = "https://www.notion.so/api/v3";

/// Endpoint that returns a block's record snapshot.
pub const LOAD_PAGE_CHUNK_ENDPOINT: &str = "loadPageChunk";

/// Header carrying the active user id on requests.
pub const ACTIVE_USER_HEADER: &str = "x-notion-active-user-header";

/// Response header carrying the id of the authenticated user.
pub const USER_ID_RESPONSE_HEADER: &str = "x-notion-user-id";

/// Chunk requested when loading a block.
pub const DEFAULT_CHUNK_NUMBER: u32 = 0;

/// How many records the service may return per chunk.
pub const DEFAULT_CHUNK_LIMIT: u32 = 100;

// ---------------------------------------------------------------------------
// Retry ceilings
// ---------------------------------------------------------------------------

/// Retries after the first attempt on the page and tree paths.
pub const PAGE_LOOKUP_MAX_RETRIES: u32 = 10;

/// Retries after the first attempt on the single-block path.
///
/// The service historically used a different ceiling here than on the page
/// path; both values are kept as observed.
pub const BLOCK_LOOKUP_MAX_RETRIES: u32 = 20;

/// Upper bound on the delay between two attempts when backoff is enabled.
pub const RETRY_MAX_DELAY_MS: u64 = 2_000;

// ---------------------------------------------------------------------------
// Extraction policy
// ---------------------------------------------------------------------------

/// Block types whose title is always reported as absent.
pub const TITLE_SUPPRESSED_TYPES: &[&str] = &["divider"];

/// The type tag a root returned by `get_page` must carry.
pub const PAGE_BLOCK_TYPE: &str = "page";

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

/// Ceiling on concurrent child fetches in `children()`.
pub const MAX_CHILD_FETCH_CONCURRENCY: usize = 32;

/// Deepest level `tree()` expands below its root.
pub const NOTION_MAX_TREE_DEPTH: u8 = 16;

/// Lower bound of the default child fetch concurrency.
pub const MIN_DEFAULT_CONCURRENCY: usize = 4;
