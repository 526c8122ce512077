// tests/integration/fixtures.rs
//! Recorded record maps and an in-memory transport that replays them.

use notion_blocks::{AppError, LoadPageChunkRequest, RecordTransport, TransportResponse};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

pub const PAGE_ID: &str = "1429989f-e8ac-4eff-bc3e-7404be81a66e";
pub const TEXT_ID: &str = "550e8400-e29b-41d4-a716-446655440001";
pub const DIVIDER_ID: &str = "550e8400-e29b-41d4-a716-446655440002";
pub const SUB_PAGE_ID: &str = "550e8400-e29b-41d4-a716-446655440003";
pub const COLLECTION_VIEW_ID: &str = "3f0c2a1b-4d5e-4f60-8a7b-9c0d1e2f3a4b";

pub fn page_with_children() -> Value {
    serde_json::from_str(include_str!("../fixtures/record_maps/page_with_children.json"))
        .expect("page fixture should be valid JSON")
}

pub fn collection_view() -> Value {
    serde_json::from_str(include_str!("../fixtures/record_maps/collection_view.json"))
        .expect("collection fixture should be valid JSON")
}

pub fn empty_record_map() -> Value {
    serde_json::from_str(include_str!("../fixtures/record_maps/empty_record_map.json"))
        .expect("empty fixture should be valid JSON")
}

pub fn service_error() -> &'static str {
    include_str!("../fixtures/record_maps/service_error.json")
}

/// Answers every request from one recorded record map, optionally preceded
/// by a number of empty answers per page id.
pub struct FixtureTransport {
    record_map: Value,
    empties: Mutex<HashMap<String, VecDeque<()>>>,
    requests: Mutex<Vec<String>>,
}

impl FixtureTransport {
    pub fn new(record_map: Value) -> Self {
        Self {
            record_map,
            empties: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// The next `count` requests for `id` get an empty record map.
    pub fn empty_first(self, id: &str, count: usize) -> Self {
        self.empties
            .lock()
            .unwrap()
            .insert(id.to_string(), std::iter::repeat(()).take(count).collect());
        self
    }

    pub fn requests_for(&self, id: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|requested| requested.as_str() == id)
            .count()
    }
}

#[async_trait::async_trait]
impl RecordTransport for FixtureTransport {
    async fn load_page_chunk(
        &self,
        request: &LoadPageChunkRequest,
    ) -> Result<TransportResponse, AppError> {
        let id = request.page_id.to_string();
        self.requests.lock().unwrap().push(id.clone());

        let empty = self
            .empties
            .lock()
            .unwrap()
            .get_mut(&id)
            .and_then(|queue| queue.pop_front())
            .is_some();

        if empty {
            Ok(TransportResponse::new(empty_record_map()))
        } else {
            Ok(TransportResponse::new(self.record_map.clone()))
        }
    }
}
