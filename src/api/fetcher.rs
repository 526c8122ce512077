// src/api/fetcher.rs
//! Record snapshot fetching with bounded retry.
//!
//! The service sometimes answers with a syntactically valid but empty
//! `recordMap`. The fetcher re-sends the unchanged request until the
//! snapshot is usable or the ceiling of its [`LookupPath`] is reached, and
//! then reports an empty snapshot rather than failing.

use super::types::{
    EmptinessRule, LoadPageChunkRequest, Pagination, RecordSnapshot, TransportResponse,
};
use super::RecordTransport;
use crate::constants::{BLOCK_LOOKUP_MAX_RETRIES, PAGE_LOOKUP_MAX_RETRIES};
use crate::error::AppError;
use crate::error_recovery::{retry_until_ready, Attempt, RetryOutcome, RetryPolicy};
use crate::types::BlockId;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Which operation a fetch serves; decides the emptiness rule and ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupPath {
    /// `get_page` and the per-child resolution inside `children`.
    Page,
    /// `children_ids`.
    Children,
    /// `get_block`, the single-block lookup.
    Block,
}

impl LookupPath {
    pub fn emptiness_rule(&self) -> EmptinessRule {
        match self {
            LookupPath::Page | LookupPath::Block => EmptinessRule::BlockMapRequired,
            LookupPath::Children => EmptinessRule::RecordMapOnly,
        }
    }

    pub fn max_retries(&self) -> u32 {
        match self {
            LookupPath::Page | LookupPath::Children => PAGE_LOOKUP_MAX_RETRIES,
            LookupPath::Block => BLOCK_LOOKUP_MAX_RETRIES,
        }
    }
}

/// Issues `loadPageChunk` requests through a [`RecordTransport`].
///
/// Holds no state besides the transport (and through it the session), so it
/// is cheap to clone and share between concurrent child fetches.
#[derive(Clone)]
pub struct RecordFetcher {
    transport: Arc<dyn RecordTransport>,
    backoff: Duration,
    deadline: Option<Duration>,
}

impl RecordFetcher {
    pub fn new(transport: Arc<dyn RecordTransport>) -> Self {
        Self {
            transport,
            backoff: Duration::ZERO,
            deadline: None,
        }
    }

    /// Waits `initial_delay` (doubling, capped) between attempts.
    pub fn with_backoff(mut self, initial_delay: Duration) -> Self {
        self.backoff = initial_delay;
        self
    }

    /// Gives every retry sequence an overall time budget.
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn policy_for(&self, path: LookupPath) -> RetryPolicy {
        RetryPolicy::immediate(path.max_retries())
            .with_backoff(self.backoff)
            .with_deadline(self.deadline)
    }

    /// Fetches the snapshot of `id` on the page path.
    ///
    /// Returns an empty snapshot when every attempt came back empty.
    pub async fn fetch_snapshot(
        &self,
        id: &BlockId,
        pagination: Pagination,
    ) -> Result<RecordSnapshot, AppError> {
        self.fetch_for(id, pagination, LookupPath::Page, &CancellationToken::new())
            .await
    }

    /// Fetches the snapshot of `id` with the rule and ceiling of `path`.
    ///
    /// Exhausting the ceiling yields an empty snapshot. Cancellation (token or
    /// deadline) yields [`AppError::Cancelled`]; non-transient service errors
    /// are returned as they are.
    pub async fn fetch_for(
        &self,
        id: &BlockId,
        pagination: Pagination,
        path: LookupPath,
        cancel: &CancellationToken,
    ) -> Result<RecordSnapshot, AppError> {
        match self.retry(id, pagination, path, cancel).await {
            RetryOutcome::Ready(snapshot) => Ok(snapshot),
            RetryOutcome::Exhausted { attempts } => {
                log::warn!(
                    "Block {} still empty after {} attempts, treating it as unavailable",
                    id,
                    attempts
                );
                Ok(RecordSnapshot::empty())
            }
            RetryOutcome::Cancelled { attempts } => {
                log::info!("Fetch of {} cancelled after {} attempts", id, attempts);
                Err(AppError::Cancelled { id: id.clone() })
            }
            RetryOutcome::Failed(e) => Err(e),
        }
    }

    /// Like [`fetch_for`](Self::fetch_for), but an exhausted ceiling is
    /// reported as [`AppError::Unavailable`].
    pub async fn fetch_strict(
        &self,
        id: &BlockId,
        pagination: Pagination,
        path: LookupPath,
        cancel: &CancellationToken,
    ) -> Result<RecordSnapshot, AppError> {
        match self.retry(id, pagination, path, cancel).await {
            RetryOutcome::Ready(snapshot) => Ok(snapshot),
            RetryOutcome::Exhausted { attempts } => Err(AppError::Unavailable {
                id: id.clone(),
                attempts,
            }),
            RetryOutcome::Cancelled { .. } => Err(AppError::Cancelled { id: id.clone() }),
            RetryOutcome::Failed(e) => Err(e),
        }
    }

    /// Sends a single request and returns the raw response, headers included.
    pub async fn fetch_once(
        &self,
        id: &BlockId,
        pagination: Pagination,
    ) -> Result<TransportResponse, AppError> {
        let request = LoadPageChunkRequest::new(id, pagination);
        self.transport.load_page_chunk(&request).await
    }

    async fn retry(
        &self,
        id: &BlockId,
        pagination: Pagination,
        path: LookupPath,
        cancel: &CancellationToken,
    ) -> RetryOutcome<RecordSnapshot> {
        let request = LoadPageChunkRequest::new(id, pagination);
        let rule = path.emptiness_rule();
        let transport = &self.transport;
        let request = &request;

        retry_until_ready(
            |attempt| async move {
                log::debug!("Loading {} (attempt {})", request.page_id, attempt);
                let response = transport.load_page_chunk(request).await?;
                let snapshot = RecordSnapshot::from_body(&response.body);
                if rule.is_transient_empty(&snapshot) {
                    Ok(Attempt::TransientEmpty)
                } else {
                    Ok(Attempt::Ready(snapshot))
                }
            },
            &self.policy_for(path),
            cancel,
        )
        .await
    }
}
