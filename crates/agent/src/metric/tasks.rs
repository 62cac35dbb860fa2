//! Tasks — running task count and restart estimate for a service.

use chrono::TimeDelta;
use tracing::debug;

use crate::client::SwarmApi;
use crate::swarm::Task;

use super::error::MetricError;
use super::fetch::{list_service_tasks, resolve_service};

/// Running tasks of the service `identifier` names.
pub async fn running_tasks(api: &dyn SwarmApi, identifier: &str) -> Result<i64, MetricError> {
    let service = resolve_service(api, identifier).await?;
    service_running_tasks(api, &service.id).await
}

/// Tasks the daemon wants running whose observed state is `running`.
/// Pending, preparing, and starting tasks are not counted.
pub async fn service_running_tasks(api: &dyn SwarmApi, service_id: &str) -> Result<i64, MetricError> {
    let tasks = list_service_tasks(api, service_id, Some("running")).await?;
    Ok(tasks.iter().filter(|t| t.is_running()).count() as i64)
}

/// Restart estimate for the service `identifier` names.
pub async fn restart_count(api: &dyn SwarmApi, identifier: &str) -> Result<i64, MetricError> {
    let service = resolve_service(api, identifier).await?;
    let tasks = list_service_tasks(api, &service.id, None).await?;

    if let Some(window) = history_window(&tasks) {
        debug!(
            "Service {} restart count covers {} tasks over {}s",
            service.id,
            tasks.len(),
            window.num_seconds()
        );
    }

    Ok(restart_count_lower_bound(&tasks))
}

/// Time between the oldest and newest task state change the daemon still
/// retains; the span the restart lower bound actually covers. `None` when
/// no task carries a timestamp.
pub fn history_window(tasks: &[Task]) -> Option<TimeDelta> {
    let oldest = tasks.iter().filter_map(|t| t.status.timestamp).min()?;
    let newest = tasks.iter().filter_map(|t| t.status.timestamp).max()?;
    Some(newest - oldest)
}

/// Count tasks that ended in `failed` or `shutdown` with a non-zero
/// container exit code, i.e. crashed containers the scheduler replaced.
///
/// This is a lower bound, not a history: the daemon keeps only a short
/// window of terminated tasks per service (`TaskHistoryRetentionLimit`,
/// 5 by default), so older crashes have already been pruned. Tasks that
/// never started a container carry no exit code and are not counted.
pub fn restart_count_lower_bound(tasks: &[Task]) -> i64 {
    tasks
        .iter()
        .filter(|t| matches!(t.status.state.as_str(), "failed" | "shutdown"))
        .filter(|t| t.exit_code().is_some_and(|code| code != 0))
        .count() as i64
}
