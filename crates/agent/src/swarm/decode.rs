//! Decode — Docker Engine JSON payloads → typed Swarm entities.
//!
//! Wire structs mirror the daemon's PascalCase field names and keep only
//! what the metrics read. Missing scalar fields decode to their zero value,
//! matching how the daemon omits empty fields. A malformed field on one
//! entity never fails the whole list.

use std::collections::HashMap;

use chrono::DateTime;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use super::model::{ContainerStatus, Node, Service, ServiceMode, Task, TaskStatus};

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("cannot unmarshal JSON: {0}")]
    Json(#[from] serde_json::Error),
}

// ── Wire shapes ─────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawService {
    #[serde(rename = "ID", default)]
    id: String,
    #[serde(default)]
    spec: RawServiceSpec,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
struct RawServiceSpec {
    #[serde(default)]
    name: String,
    #[serde(default)]
    labels: Option<HashMap<String, String>>,
    #[serde(default)]
    mode: Option<RawServiceMode>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawServiceMode {
    #[serde(default)]
    replicated: Option<RawReplicated>,
    #[serde(default)]
    global: Option<RawGlobal>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawReplicated {
    #[serde(default)]
    replicas: Option<u64>,
}

#[derive(Deserialize)]
struct RawGlobal {}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawTask {
    #[serde(rename = "ID", default)]
    id: String,
    #[serde(rename = "ServiceID", default)]
    service_id: String,
    #[serde(default)]
    desired_state: String,
    #[serde(default)]
    status: RawTaskStatus,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
struct RawTaskStatus {
    #[serde(default)]
    state: String,
    #[serde(default)]
    timestamp: String,
    #[serde(default)]
    container_status: Option<RawContainerStatus>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawContainerStatus {
    #[serde(rename = "ContainerID", default)]
    container_id: String,
    #[serde(default)]
    exit_code: i64,
}

#[derive(Deserialize)]
struct RawNode {
    #[serde(rename = "ID", default)]
    id: String,
}

// ── Conversions ─────────────────────────────────────────────────

/// Exactly one of `Replicated` / `Global` yields a mode; zero or both yield
/// `None`, which the replica metrics report as undetermined.
fn convert_mode(id: &str, raw: Option<RawServiceMode>) -> Option<ServiceMode> {
    let raw = raw?;
    match (raw.replicated, raw.global) {
        (Some(r), None) => Some(ServiceMode::Replicated { replicas: r.replicas }),
        (None, Some(_)) => Some(ServiceMode::Global),
        (Some(_), Some(_)) => {
            warn!("Service {} declares both replicated and global mode, ignoring its mode", id);
            None
        }
        (None, None) => None,
    }
}

fn convert_service(raw: RawService) -> Service {
    let mode = convert_mode(&raw.id, raw.spec.mode);
    Service {
        id: raw.id,
        name: raw.spec.name,
        labels: raw.spec.labels.unwrap_or_default(),
        mode,
    }
}

fn convert_task(raw: RawTask) -> Task {
    let timestamp = DateTime::parse_from_rfc3339(&raw.status.timestamp).ok();
    Task {
        id: raw.id,
        service_id: raw.service_id,
        desired_state: raw.desired_state,
        status: TaskStatus {
            state: raw.status.state,
            timestamp,
            container_status: raw.status.container_status.map(|c| ContainerStatus {
                container_id: c.container_id,
                exit_code: c.exit_code,
            }),
        },
    }
}

// ── Public decoders ─────────────────────────────────────────────

/// Decode the body of `GET /services`.
pub fn decode_services(body: &[u8]) -> Result<Vec<Service>, DecodeError> {
    let raw: Vec<RawService> = serde_json::from_slice(body)?;
    Ok(raw.into_iter().map(convert_service).collect())
}

/// Decode the body of `GET /tasks`.
pub fn decode_tasks(body: &[u8]) -> Result<Vec<Task>, DecodeError> {
    let raw: Vec<RawTask> = serde_json::from_slice(body)?;
    Ok(raw.into_iter().map(convert_task).collect())
}

/// Decode the body of `GET /nodes`.
pub fn decode_nodes(body: &[u8]) -> Result<Vec<Node>, DecodeError> {
    let raw: Vec<RawNode> = serde_json::from_slice(body)?;
    Ok(raw.into_iter().map(|n| Node { id: n.id }).collect())
}
