//! Common test utilities for building canvases and faking external services.
use ahash::AHashMap;
use async_trait::async_trait;
use glassbox::prelude::*;
use serde_json::{Value, json};
use std::result::Result;
use std::sync::Mutex;

/// Millisecond stamp every test canvas is created at.
#[allow(dead_code)]
pub const T0: u64 = 1_700_000_000_000;

/// A canvas whose clock never moves, so ids differ only by the collision bump.
#[allow(dead_code)]
pub fn fixed_canvas() -> CanvasModel {
    CanvasModel::with_clock(|| T0)
}

#[allow(dead_code)]
pub fn template(id: &str) -> BlockTemplate {
    Registry::builtin()
        .get(id)
        .cloned()
        .unwrap_or_else(|| panic!("no builtin template '{}'", id))
}

/// Places a block so that its top-left corner lands on `(x, y)`.
#[allow(dead_code)]
pub fn place_at(canvas: &mut CanvasModel, template_id: &str, x: f64, y: f64) -> BlockId {
    let drop_point = Position::new(x, y).block_center();
    canvas.place_block(&template(template_id), drop_point).id.clone()
}

#[allow(dead_code)]
pub fn position_of(canvas: &CanvasModel, id: &BlockId) -> Position {
    canvas.block(id).expect("block should exist").position
}

/// An `ActionDispatcher` that records every call and answers from a script.
///
/// Endpoints without a scripted reply answer `{"message": "ok"}`.
#[allow(dead_code)]
pub struct RecordingDispatcher {
    configured: Vec<Endpoint>,
    replies: AHashMap<Endpoint, Result<Value, DispatchError>>,
    calls: Mutex<Vec<(Endpoint, Value)>>,
}

#[allow(dead_code)]
impl RecordingDispatcher {
    pub fn all_configured() -> Self {
        Self::with_endpoints(&Endpoint::ALL)
    }

    pub fn with_endpoints(endpoints: &[Endpoint]) -> Self {
        Self {
            configured: endpoints.to_vec(),
            replies: AHashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn reply(mut self, endpoint: Endpoint, reply: Value) -> Self {
        self.replies.insert(endpoint, Ok(reply));
        self
    }

    pub fn fail(mut self, endpoint: Endpoint, error: DispatchError) -> Self {
        self.replies.insert(endpoint, Err(error));
        self
    }

    pub fn calls(&self) -> Vec<(Endpoint, Value)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn endpoints_called(&self) -> Vec<Endpoint> {
        self.calls().into_iter().map(|(endpoint, _)| endpoint).collect()
    }
}

#[async_trait]
impl ActionDispatcher for RecordingDispatcher {
    fn is_configured(&self, endpoint: Endpoint) -> bool {
        self.configured.contains(&endpoint)
    }

    async fn post(&self, endpoint: Endpoint, body: Value) -> Result<Value, DispatchError> {
        self.calls.lock().unwrap().push((endpoint, body));
        self.replies
            .get(&endpoint)
            .cloned()
            .unwrap_or_else(|| Ok(json!({ "message": "ok" })))
    }
}
