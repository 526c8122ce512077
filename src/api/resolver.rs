// src/api/resolver.rs
//! Resolution of blocks, pages and block trees from URLs or ids.
//!
//! Every operation normalizes its input first, fetches a fresh snapshot and
//! extracts what it needs. Nothing is cached between calls.

use super::fetcher::{LookupPath, RecordFetcher};
use super::parser;
use super::types::Pagination;
use super::{NotionHttpClient, RecordTransport};
use crate::config::ClientConfig;
use crate::constants::{
    MAX_CHILD_FETCH_CONCURRENCY, MIN_DEFAULT_CONCURRENCY, NOTION_MAX_TREE_DEPTH,
    USER_ID_RESPONSE_HEADER,
};
use crate::error::AppError;
use crate::model::{Block, BlockNode, BlockPropsAndFormat, CollectionInfo, PageBlock};
use crate::types::{normalize, BlockId};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Client over the private block API.
///
/// Holds the fetcher (and through it the session), the pagination used for
/// every request, and the cancellation token that aborts stuck retries.
#[derive(Clone)]
pub struct NotionClient {
    fetcher: RecordFetcher,
    pagination: Pagination,
    concurrency: usize,
    cancel: CancellationToken,
}

impl NotionClient {
    /// Creates a client over any transport, with default settings.
    ///
    /// Default concurrency for child fan-out is `max(num_cpus, 4)` capped at
    /// [`MAX_CHILD_FETCH_CONCURRENCY`].
    pub fn new(transport: Arc<dyn RecordTransport>) -> Self {
        Self {
            fetcher: RecordFetcher::new(transport),
            pagination: Pagination::default(),
            concurrency: num_cpus::get()
                .clamp(MIN_DEFAULT_CONCURRENCY, MAX_CHILD_FETCH_CONCURRENCY),
            cancel: CancellationToken::new(),
        }
    }

    /// Creates an HTTP-backed client from resolved configuration.
    pub fn from_config(config: &ClientConfig) -> Result<Self, AppError> {
        let http_client =
            NotionHttpClient::new(config.require_session()?, config.base_url.clone())?;
        let mut client = Self::new(Arc::new(http_client)).with_pagination(config.pagination);
        client.fetcher = client
            .fetcher
            .with_backoff(config.backoff)
            .with_deadline(config.timeout);
        if let Some(concurrency) = config.concurrency {
            client = client.with_concurrency(concurrency);
        }
        Ok(client)
    }

    /// Sets how many child fetches `children` may run at once (1 = sequential).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.clamp(1, MAX_CHILD_FETCH_CONCURRENCY);
        self
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = pagination;
        self
    }

    pub fn with_fetcher(mut self, fetcher: RecordFetcher) -> Self {
        self.fetcher = fetcher;
        self
    }

    /// Ties every retry sequence of this client to `cancel`.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Normalizes a page URL or id into a canonical [`BlockId`].
    pub fn normalize(&self, url_or_id: &str) -> Result<BlockId, AppError> {
        Ok(normalize(url_or_id)?)
    }

    /// Resolves a page block.
    ///
    /// Returns `Ok(None)` when the block stays unavailable after the retry
    /// ceiling, and [`AppError::NotAPage`] when it resolves to any other type.
    pub async fn get_page(&self, url_or_id: &str) -> Result<Option<PageBlock>, AppError> {
        let id = self.normalize(url_or_id)?;
        let Some(block) = self.resolve_block(&id, LookupPath::Page).await? else {
            return Ok(None);
        };
        let page = PageBlock::try_from(block)?;
        log::info!(
            "Resolved page '{}' ({})",
            page.title().unwrap_or("Untitled"),
            page.id()
        );
        Ok(Some(page))
    }

    /// Like [`get_page`](Self::get_page), but unavailability is an
    /// [`AppError::Unavailable`], and a usable snapshot without the block is
    /// an [`AppError::MissingRecord`].
    pub async fn get_page_strict(&self, url_or_id: &str) -> Result<PageBlock, AppError> {
        let id = self.normalize(url_or_id)?;
        let snapshot = self
            .fetcher
            .fetch_strict(&id, self.pagination, LookupPath::Page, &self.cancel)
            .await?;
        let block = parser::parse_block(&id, &snapshot)
            .ok_or_else(|| AppError::MissingRecord { id: id.clone() })?;
        PageBlock::try_from(block)
    }

    /// Resolves any block, whatever its type, on the single-block path.
    pub async fn get_block(&self, url_or_id: &str) -> Result<Option<Block>, AppError> {
        let id = self.normalize(url_or_id)?;
        self.resolve_block(&id, LookupPath::Block).await
    }

    /// Ids of the block's children, in document order.
    ///
    /// An unavailable block has no children.
    pub async fn children_ids(&self, url_or_id: &str) -> Result<Vec<BlockId>, AppError> {
        let id = self.normalize(url_or_id)?;
        let snapshot = self
            .fetcher
            .fetch_for(&id, self.pagination, LookupPath::Children, &self.cancel)
            .await?;
        Ok(parser::extract_children_ids(&id, &snapshot))
    }

    /// Resolves every child of the block, in document order.
    ///
    /// Children are fetched concurrently (up to the configured concurrency);
    /// results are collected by position, not arrival. Children that stay
    /// unavailable are left out.
    pub async fn children(&self, url_or_id: &str) -> Result<Vec<Block>, AppError> {
        let ids = self.children_ids(url_or_id).await?;
        self.resolve_all(&ids).await
    }

    /// The last child id of the block, if it has children.
    pub async fn last_child_id(&self, url_or_id: &str) -> Result<Option<BlockId>, AppError> {
        Ok(self.children_ids(url_or_id).await?.pop())
    }

    /// Resolves the block and its descendants, breadth-first, down to
    /// `max_depth` levels below the root.
    ///
    /// Each block is fetched once even when several parents list it, and is
    /// placed under the parent it was fetched through.
    pub async fn tree(
        &self,
        url_or_id: &str,
        max_depth: u8,
    ) -> Result<Option<BlockNode>, AppError> {
        let id = self.normalize(url_or_id)?;
        let Some(root) = self.resolve_block(&id, LookupPath::Page).await? else {
            return Ok(None);
        };

        let depth = max_depth.min(NOTION_MAX_TREE_DEPTH);
        if max_depth > depth {
            log::warn!(
                "Requested tree depth {} exceeds maximum {}. Clamping.",
                max_depth,
                depth
            );
        }

        let mut visited: HashSet<BlockId> = HashSet::from([root.id.clone()]);
        let mut discovered: HashMap<BlockId, Vec<BlockId>> = HashMap::new();
        let mut resolved: HashMap<BlockId, Block> = HashMap::new();
        let mut frontier = vec![root.clone()];

        for level in 1..=depth {
            let mut next_ids = Vec::new();
            for block in &frontier {
                // A block belongs to the first parent that reaches it, which
                // is also the shallowest one.
                let fresh: Vec<BlockId> = block
                    .children
                    .iter()
                    .filter(|child| visited.insert((*child).clone()))
                    .cloned()
                    .collect();
                if !fresh.is_empty() {
                    next_ids.extend(fresh.iter().cloned());
                    discovered.insert(block.id.clone(), fresh);
                }
            }
            if next_ids.is_empty() {
                break;
            }

            log::debug!("Resolving {} blocks at depth {}", next_ids.len(), level);
            frontier = self.resolve_all(&next_ids).await?;
            resolved.extend(
                frontier
                    .iter()
                    .map(|block| (block.id.clone(), block.clone())),
            );
        }

        Ok(Some(BlockNode::assemble(root, &discovered, &mut resolved)))
    }

    /// Reads the id of the authenticated user from the response headers of
    /// a request for `url_or_id`.
    pub async fn current_user_id(&self, url_or_id: &str) -> Result<Option<String>, AppError> {
        let id = self.normalize(url_or_id)?;
        let response = self.fetcher.fetch_once(&id, self.pagination).await?;
        Ok(response.header(USER_ID_RESPONSE_HEADER).map(str::to_string))
    }

    /// Raw `properties` and `format` of a block.
    ///
    /// When the block stays unavailable, returns properties holding only
    /// `fallback_title` and an empty format.
    pub async fn block_props_and_format(
        &self,
        url_or_id: &str,
        fallback_title: &str,
    ) -> Result<BlockPropsAndFormat, AppError> {
        let id = self.normalize(url_or_id)?;
        let snapshot = self
            .fetcher
            .fetch_for(&id, self.pagination, LookupPath::Children, &self.cancel)
            .await?;
        Ok(parser::extract_props_and_format(&id, &snapshot)
            .unwrap_or_else(|| BlockPropsAndFormat::with_fallback_title(fallback_title)))
    }

    /// Collection id, view ids and collection name of a collection view block.
    pub async fn collection_info(
        &self,
        url_or_id: &str,
    ) -> Result<Option<CollectionInfo>, AppError> {
        let id = self.normalize(url_or_id)?;
        let snapshot = self
            .fetcher
            .fetch_for(&id, self.pagination, LookupPath::Page, &self.cancel)
            .await?;
        Ok(parser::extract_collection_info(&id, &snapshot))
    }

    async fn resolve_block(
        &self,
        id: &BlockId,
        path: LookupPath,
    ) -> Result<Option<Block>, AppError> {
        let snapshot = self
            .fetcher
            .fetch_for(id, self.pagination, path, &self.cancel)
            .await?;
        let block = parser::parse_block(id, &snapshot);
        if block.is_none() {
            log::warn!("Block {} is unavailable", id);
        }
        Ok(block)
    }

    async fn resolve_all(&self, ids: &[BlockId]) -> Result<Vec<Block>, AppError> {
        let resolved: Vec<Option<Block>> = stream::iter(ids)
            .map(|id| self.resolve_block(id, LookupPath::Page))
            .buffered(self.concurrency)
            .try_collect()
            .await?;
        Ok(resolved.into_iter().flatten().collect())
    }
}
