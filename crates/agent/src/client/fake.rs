//! Fake — test double for the Docker API gateway.
//!
//! Provides a deterministic [`FakeSwarm`] that implements [`SwarmApi`]
//! using in-memory, Docker-shaped JSON. Useful for unit-testing metric
//! handlers without a running Docker daemon.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};

use bytes::Bytes;
use serde_json::{json, Value};
use tokio::sync::Mutex;

use super::api::{Filters, SwarmApi};
use super::error::ApiError;

// ── Canned payload builders ─────────────────────────────────────

/// A replicated service as `GET /services` returns it.
pub fn replicated_service(id: &str, name: &str, stack: Option<&str>, replicas: u64) -> Value {
    service_with_mode(id, name, stack, json!({ "Replicated": { "Replicas": replicas } }))
}

/// A global service as `GET /services` returns it.
pub fn global_service(id: &str, name: &str, stack: Option<&str>) -> Value {
    service_with_mode(id, name, stack, json!({ "Global": {} }))
}

/// A service with an arbitrary raw `Spec.Mode` object.
pub fn service_with_mode(id: &str, name: &str, stack: Option<&str>, mode: Value) -> Value {
    let labels = match stack {
        Some(ns) => json!({ "com.docker.stack.namespace": ns }),
        None => Value::Null,
    };
    json!({
        "ID": id,
        "Version": { "Index": 1 },
        "Spec": {
            "Name": name,
            "Labels": labels,
            "Mode": mode,
        },
    })
}

/// A task as `GET /tasks` returns it.
pub fn task(id: &str, service_id: &str, desired: &str, state: &str, exit_code: Option<i64>) -> Value {
    let mut status = json!({
        "Timestamp": "2025-06-01T12:00:00.000000000Z",
        "State": state,
        "Message": state,
    });
    if let Some(code) = exit_code {
        status["ContainerStatus"] = json!({
            "ContainerID": format!("ctr-{}", id),
            "ExitCode": code,
        });
    }
    json!({
        "ID": id,
        "ServiceID": service_id,
        "DesiredState": desired,
        "Status": status,
    })
}

/// A node as `GET /nodes` returns it.
pub fn node(id: &str) -> Value {
    json!({ "ID": id, "Status": { "State": "ready" } })
}

// ── In-memory state ─────────────────────────────────────────────

#[derive(Default)]
struct Inner {
    services: Vec<Value>,
    tasks: Vec<Value>,
    nodes: Vec<Value>,
    /// path → (status, body) returned instead of the canned payload
    failures: HashMap<String, (u16, String)>,
}

/// A fake Docker daemon for deterministic testing.
///
/// Routes `services`, `tasks`, and `nodes`. The `tasks`
/// route honours the `service` and `desired-state` filters the way the
/// daemon does.
pub struct FakeSwarm {
    inner: Mutex<Inner>,
    requests: AtomicUsize,
}

impl FakeSwarm {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            requests: AtomicUsize::new(0),
        }
    }

    /// Seed a service.
    pub async fn add_service(&self, service: Value) {
        self.inner.lock().await.services.push(service);
    }

    /// Seed a task.
    pub async fn add_task(&self, task: Value) {
        self.inner.lock().await.tasks.push(task);
    }

    /// Seed a node.
    pub async fn add_node(&self, node: Value) {
        self.inner.lock().await.nodes.push(node);
    }

    /// Make every query for `path` fail with the given status and body.
    pub async fn fail_path(&self, path: &str, status: u16, body: &str) {
        self.inner
            .lock()
            .await
            .failures
            .insert(path.to_string(), (status, body.to_string()));
    }

    /// Number of queries served so far, failures included.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl Default for FakeSwarm {
    fn default() -> Self {
        Self::new()
    }
}

fn matches_filter(item: &Value, field: &str, filters: Option<&Filters>, name: &str) -> bool {
    let accepted = match filters.and_then(|f| f.get(name)) {
        Some(values) => values,
        None => return true,
    };
    item.get(field)
        .and_then(Value::as_str)
        .map(|v| accepted.iter().any(|a| a == v))
        .unwrap_or(false)
}

fn encode(value: &Value) -> Result<Bytes, ApiError> {
    serde_json::to_vec(value)
        .map(Bytes::from)
        .map_err(|e| ApiError::Transport(e.to_string()))
}

// ── SwarmApi implementation ─────────────────────────────────────

impl SwarmApi for FakeSwarm {
    fn query<'a>(
        &'a self,
        path: &'a str,
        filters: Option<&'a Filters>,
    ) -> Pin<Box<dyn Future<Output = Result<Bytes, ApiError>> + Send + 'a>> {
        Box::pin(async move {
            self.requests.fetch_add(1, Ordering::SeqCst);
            let state = self.inner.lock().await;

            if let Some((status, body)) = state.failures.get(path) {
                return Err(ApiError::from_response(*status, body.as_bytes()));
            }

            match path {
                "services" => encode(&Value::Array(state.services.clone())),
                "nodes" => encode(&Value::Array(state.nodes.clone())),
                "tasks" => {
                    let tasks: Vec<Value> = state
                        .tasks
                        .iter()
                        .filter(|t| matches_filter(t, "ServiceID", filters, "service"))
                        .filter(|t| matches_filter(t, "DesiredState", filters, "desired-state"))
                        .cloned()
                        .collect();
                    encode(&Value::Array(tasks))
                }
                _ => Err(ApiError::from_response(404, b"page not found")),
            }
        })
    }
}
