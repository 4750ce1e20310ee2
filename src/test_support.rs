//! Test support utilities shared across unit and integration tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;

use crate::error::VultrError;
use crate::transport::{RawResponse, Request, Transport, TransportFuture};

/// Scripted transport that returns pre-seeded responses in FIFO order.
///
/// Used to drive deterministic API outcomes without opening sockets. Clones
/// share the same script and request log.
#[derive(Clone, Debug, Default)]
pub struct ScriptedTransport {
    state: Arc<Mutex<Script>>,
}

#[derive(Debug, Default)]
struct Script {
    responses: VecDeque<Result<RawResponse, VultrError>>,
    requests: Vec<Request>,
}

impl ScriptedTransport {
    /// Creates a transport with no queued responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queues a response with a raw text body.
    pub fn push_response(&self, status: u16, body: &str) {
        self.script()
            .responses
            .push_back(Ok(RawResponse::new(status, body)));
    }

    /// Queues a response whose body is the serialised JSON value.
    pub fn push_json(&self, status: u16, body: &Value) {
        self.push_response(status, &body.to_string());
    }

    /// Queues a transport-level failure.
    pub fn push_transport_error(&self, message: &str) {
        self.script()
            .responses
            .push_back(Err(VultrError::Transport {
                message: message.to_owned(),
            }));
    }

    /// Returns a snapshot of every request sent so far.
    #[must_use]
    pub fn requests(&self) -> Vec<Request> {
        self.script().requests.clone()
    }

    /// Returns the paths of every request sent so far.
    #[must_use]
    pub fn paths(&self) -> Vec<String> {
        self.script()
            .requests
            .iter()
            .map(|request| request.path.clone())
            .collect()
    }

    /// Number of responses still queued.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script().responses.len()
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: Request) -> TransportFuture<'_> {
        Box::pin(async move {
            let mut script = self.script();
            let path = request.path.clone();
            script.requests.push(request);
            script.responses.pop_front().unwrap_or_else(|| {
                Err(VultrError::Transport {
                    message: format!("no scripted response for {path}"),
                })
            })
        })
    }
}

/// Builds an `{"instance": {...}}` body with the given status triple.
#[must_use]
pub fn instance_body(id: &str, status: &str, server_status: &str, power_status: &str) -> Value {
    serde_json::json!({
        "instance": {
            "id": id,
            "label": "test-instance",
            "status": status,
            "server_status": server_status,
            "power_status": power_status,
            "main_ip": "0.0.0.0",
            "region": "cdg",
            "plan": "vc2-1c-1gb"
        }
    })
}

/// Builds a `/regions` body from `(id, city)` pairs.
#[must_use]
pub fn regions_body(regions: &[(Value, &str)]) -> Value {
    let items: Vec<Value> = regions
        .iter()
        .map(|(id, city)| serde_json::json!({ "id": id, "city": city }))
        .collect();
    serde_json::json!({ "regions": items })
}

/// Builds an `/os` body from `(id, name)` pairs.
#[must_use]
pub fn os_body(systems: &[(Value, &str)]) -> Value {
    let items: Vec<Value> = systems
        .iter()
        .map(|(id, name)| serde_json::json!({ "id": id, "name": name }))
        .collect();
    serde_json::json!({ "os": items })
}

/// Builds an `/ssh-keys` body from `(id, name)` pairs.
#[must_use]
pub fn ssh_keys_body(keys: &[(Value, &str)]) -> Value {
    let items: Vec<Value> = keys
        .iter()
        .map(|(id, name)| serde_json::json!({ "id": id, "name": name }))
        .collect();
    serde_json::json!({ "ssh_keys": items })
}
