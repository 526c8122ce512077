// src/api/types.rs
//! Request and response types for the `loadPageChunk` endpoint.

use crate::constants::{DEFAULT_CHUNK_LIMIT, DEFAULT_CHUNK_NUMBER};
use crate::types::BlockId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

// --- Request Types ---

/// Which chunk of a block's records to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub chunk: u32,
    pub limit: u32,
    pub vertical_columns: bool,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            chunk: DEFAULT_CHUNK_NUMBER,
            limit: DEFAULT_CHUNK_LIMIT,
            vertical_columns: false,
        }
    }
}

/// JSON body POSTed to `loadPageChunk`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadPageChunkRequest {
    pub page_id: BlockId,
    pub chunk_number: u32,
    pub limit: u32,
    pub vertical_columns: bool,
}

impl LoadPageChunkRequest {
    pub fn new(page_id: &BlockId, pagination: Pagination) -> Self {
        Self {
            page_id: page_id.clone(),
            chunk_number: pagination.chunk,
            limit: pagination.limit,
            vertical_columns: pagination.vertical_columns,
        }
    }
}

// --- Response Types ---

/// Decoded body and headers of one transport round trip.
#[derive(Debug, Clone, Default)]
pub struct TransportResponse {
    pub body: Value,
    /// Header names are stored lowercase.
    pub headers: HashMap<String, String>,
}

impl TransportResponse {
    pub fn new(body: Value) -> Self {
        Self {
            body,
            headers: HashMap::new(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers
            .insert(name.to_ascii_lowercase(), value.to_string());
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

/// The `recordMap` of a response: records keyed by category
/// (`block`, `collection`, ...) and then by id.
///
/// Snapshots are fetched per call and never cached.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSnapshot {
    categories: Map<String, Value>,
}

impl RecordSnapshot {
    /// Extracts the `recordMap` from a decoded response body.
    ///
    /// A body without a `recordMap` object yields an empty snapshot.
    pub fn from_body(body: &Value) -> Self {
        let categories = body
            .get("recordMap")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        Self { categories }
    }

    /// Builds a snapshot directly from a `recordMap` value.
    pub fn from_record_map(record_map: Value) -> Self {
        match record_map {
            Value::Object(categories) => Self { categories },
            _ => Self::default(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// True when the `recordMap` carried no categories at all.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Records of one category, if present.
    pub fn category(&self, name: &str) -> Option<&Map<String, Value>> {
        self.categories.get(name).and_then(Value::as_object)
    }

    /// The `block` category when it exists and holds at least one record.
    pub fn blocks(&self) -> Option<&Map<String, Value>> {
        self.category("block").filter(|blocks| !blocks.is_empty())
    }

    /// The `value` object of one record.
    pub fn record_value(&self, category: &str, id: &str) -> Option<&Map<String, Value>> {
        self.category(category)?
            .get(id)?
            .get("value")?
            .as_object()
    }

    /// Number of records across all categories.
    pub fn record_count(&self) -> usize {
        self.categories
            .values()
            .filter_map(Value::as_object)
            .map(Map::len)
            .sum()
    }
}

/// When a snapshot counts as transient-empty and should be re-requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptinessRule {
    /// Only a missing or empty `recordMap` is transient.
    RecordMapOnly,
    /// A `recordMap` whose `block` category is missing or empty is transient too.
    BlockMapRequired,
}

impl EmptinessRule {
    pub fn is_transient_empty(&self, snapshot: &RecordSnapshot) -> bool {
        match self {
            EmptinessRule::RecordMapOnly => snapshot.is_empty(),
            EmptinessRule::BlockMapRequired => snapshot.is_empty() || snapshot.blocks().is_none(),
        }
    }
}
