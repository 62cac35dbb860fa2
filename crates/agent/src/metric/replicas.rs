//! Replicas — desired task count of a service.

use crate::client::SwarmApi;
use crate::swarm::{Service, ServiceMode};

use super::error::MetricError;
use super::fetch::{count_nodes, resolve_service};

/// Desired replicas of the service `identifier` names.
pub async fn desired_replicas(api: &dyn SwarmApi, identifier: &str) -> Result<i64, MetricError> {
    let service = resolve_service(api, identifier).await?;
    service_desired_replicas(api, &service).await
}

/// Replicated services report their configured count; global services
/// expect one task per node, so the node count is fetched.
pub async fn service_desired_replicas(api: &dyn SwarmApi, service: &Service) -> Result<i64, MetricError> {
    match service.mode {
        Some(ServiceMode::Replicated { replicas: Some(replicas) }) => {
            Ok(i64::try_from(replicas).unwrap_or(i64::MAX))
        }
        Some(ServiceMode::Global) => {
            let nodes = count_nodes(api).await?;
            Ok(i64::try_from(nodes).unwrap_or(i64::MAX))
        }
        Some(ServiceMode::Replicated { replicas: None }) | None => {
            Err(MetricError::UndeterminedMode(service.id.clone()))
        }
    }
}
