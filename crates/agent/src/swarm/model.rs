//! Model — typed Swarm entities the metrics operate on.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};

/// How a service schedules its tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceMode {
    /// A fixed number of tasks. `replicas` is absent when the daemon
    /// omits the field.
    Replicated { replicas: Option<u64> },
    /// One task per cluster node.
    Global,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Service {
    pub id: String,
    pub name: String,
    pub labels: HashMap<String, String>,
    /// `None` when the daemon reports a mode this agent does not size
    /// (e.g. replicated or global jobs).
    pub mode: Option<ServiceMode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContainerStatus {
    pub container_id: String,
    pub exit_code: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskStatus {
    pub state: String,
    /// Last state change; `None` when the daemon's RFC3339 value is absent
    /// or malformed.
    pub timestamp: Option<DateTime<FixedOffset>>,
    pub container_status: Option<ContainerStatus>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: String,
    pub service_id: String,
    pub desired_state: String,
    pub status: TaskStatus,
}

impl Task {
    pub fn is_running(&self) -> bool {
        self.status.state == "running"
    }

    pub fn exit_code(&self) -> Option<i64> {
        self.status.container_status.as_ref().map(|c| c.exit_code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: String,
}
