//! Health — replica health rolled up per stack.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::client::SwarmApi;
use crate::swarm::{group_stacks, Service};

use super::error::MetricError;
use super::fetch::list_services;
use super::replicas::service_desired_replicas;
use super::tasks::service_running_tasks;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackHealth {
    #[serde(rename = "{#STACK.NAME}")]
    pub stack_name: String,
    pub total_services: usize,
    pub healthy_services: usize,
    pub unhealthy_services: usize,
    pub health_percentage: f64,
}

impl StackHealth {
    /// `total` must be non-zero.
    pub fn from_counts(stack_name: &str, total: usize, healthy: usize) -> Self {
        Self {
            stack_name: stack_name.to_string(),
            total_services: total,
            healthy_services: healthy,
            unhealthy_services: total - healthy,
            health_percentage: healthy as f64 / total as f64 * 100.0,
        }
    }
}

/// A service is healthy once at least as many tasks run as it wants.
pub fn is_healthy(desired: i64, running: i64) -> bool {
    running >= desired
}

async fn evaluate(api: &dyn SwarmApi, service: &Service) -> Result<bool, MetricError> {
    let desired = service_desired_replicas(api, service).await?;
    let running = service_running_tasks(api, &service.id).await?;
    Ok(is_healthy(desired, running))
}

/// Health of the stack named exactly `stack_name`.
///
/// Services whose replica counts cannot be fetched still count toward the
/// total but never as healthy; one bad service does not fail the stack.
pub async fn stack_health(api: &dyn SwarmApi, stack_name: &str) -> Result<StackHealth, MetricError> {
    let services = list_services(api).await?;
    let stack = group_stacks(&services)
        .into_iter()
        .find(|s| s.name == stack_name)
        .ok_or_else(|| MetricError::StackNotFound(stack_name.to_string()))?;

    let total = stack.services.len();
    let mut healthy = 0;
    for service in &stack.services {
        match evaluate(api, service).await {
            Ok(true) => healthy += 1,
            Ok(false) => {}
            Err(e) => debug!("Skipping service {} in stack {}: {}", service.id, stack_name, e),
        }
    }

    let health = StackHealth::from_counts(stack_name, total, healthy);
    info!(
        "Stack {} health: {}/{} services ({:.1}%)",
        stack_name, healthy, total, health.health_percentage
    );
    Ok(health)
}

pub async fn stack_health_json(api: &dyn SwarmApi, stack_name: &str) -> Result<String, MetricError> {
    Ok(serde_json::to_string(&stack_health(api, stack_name).await?)?)
}
