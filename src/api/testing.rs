// src/api/testing.rs
//! In-memory transport for unit tests.

use super::types::{LoadPageChunkRequest, TransportResponse};
use super::RecordTransport;
use crate::error::AppError;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// One scripted reply.
#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Body(Value),
    Failure,
}

#[derive(Debug, Clone, Default)]
struct Route {
    script: VecDeque<Reply>,
    fallback: Option<Value>,
}

impl Route {
    fn next(&mut self) -> Reply {
        self.script.pop_front().unwrap_or_else(|| {
            Reply::Body(self.fallback.clone().unwrap_or_else(|| json!({})))
        })
    }
}

/// Replays scripted bodies per requested page id and records every request.
#[derive(Debug, Default)]
pub(crate) struct ScriptedTransport {
    routes: Mutex<HashMap<String, Route>>,
    any: Mutex<Route>,
    headers: Vec<(String, String)>,
    requests: Mutex<Vec<LoadPageChunkRequest>>,
}

const ANY_ID: &str = "*";

impl ScriptedTransport {
    pub fn builder() -> ScriptedTransportBuilder {
        ScriptedTransportBuilder::default()
    }

    /// Every request gets `body`.
    pub fn always(body: Value) -> Arc<Self> {
        Self::builder().script(ANY_ID, vec![], body).build()
    }

    /// `empties` empty record maps, then `body` forever.
    pub fn empty_then(empties: usize, body: Value) -> Arc<Self> {
        let script = vec![Reply::Body(json!({"recordMap": {}})); empties];
        Self::builder().script(ANY_ID, script, body).build()
    }

    /// `failures` transport errors, then `body` forever.
    pub fn failing_then(failures: usize, body: Value) -> Arc<Self> {
        let script = vec![Reply::Failure; failures];
        Self::builder().script(ANY_ID, script, body).build()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn calls_for(&self, id: &str) -> usize {
        self.requests
            .lock()
            .map(|r| r.iter().filter(|req| req.page_id.as_str() == id).count())
            .unwrap_or(0)
    }

    pub fn requests(&self) -> Vec<LoadPageChunkRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[derive(Debug, Default)]
pub(crate) struct ScriptedTransportBuilder {
    routes: HashMap<String, Route>,
    any: Route,
    headers: Vec<(String, String)>,
}

impl ScriptedTransportBuilder {
    /// Replies `script` in order for `id` (or `"*"` for any id), then `fallback`.
    pub fn script(mut self, id: &str, script: Vec<Reply>, fallback: Value) -> Self {
        let route = Route {
            script: script.into(),
            fallback: Some(fallback),
        };
        if id == ANY_ID {
            self.any = route;
        } else {
            self.routes.insert(id.to_string(), route);
        }
        self
    }

    /// Always replies `body` for `id`.
    pub fn record(self, id: &str, body: Value) -> Self {
        self.script(id, vec![], body)
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn build(self) -> Arc<ScriptedTransport> {
        Arc::new(ScriptedTransport {
            routes: Mutex::new(self.routes),
            any: Mutex::new(self.any),
            headers: self.headers,
            requests: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait::async_trait]
impl RecordTransport for ScriptedTransport {
    async fn load_page_chunk(
        &self,
        request: &LoadPageChunkRequest,
    ) -> Result<TransportResponse, AppError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        let reply = {
            let mut routes = self
                .routes
                .lock()
                .map_err(|_| AppError::MalformedResponse("poisoned".to_string()))?;
            match routes.get_mut(request.page_id.as_str()) {
                Some(route) => route.next(),
                None => self
                    .any
                    .lock()
                    .map_err(|_| AppError::MalformedResponse("poisoned".to_string()))?
                    .next(),
            }
        };

        match reply {
            Reply::Body(body) => {
                let mut response = TransportResponse::new(body);
                for (name, value) in &self.headers {
                    response = response.with_header(name, value);
                }
                Ok(response)
            }
            Reply::Failure => Err(AppError::MalformedResponse(
                "connection reset".to_string(),
            )),
        }
    }
}

/// Builds a `{recordMap: {block: {id: {value}}}}` body for one block.
pub(crate) fn block_body(id: &str, value: Value) -> Value {
    let mut blocks = serde_json::Map::new();
    blocks.insert(id.to_string(), json!({ "value": value }));
    json!({ "recordMap": { "block": blocks } })
}
