//! Discovery — low-level discovery documents for services and stacks.
//!
//! The `{#MACRO}` key names are consumed verbatim by the monitoring
//! server's discovery rules and must not change.

use serde::{Deserialize, Serialize};

use crate::client::SwarmApi;
use crate::swarm::{group_stacks, resolve_stack, service_key, Service};

use super::error::MetricError;
use super::fetch::list_services;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredService {
    #[serde(rename = "{#SERVICE.ID}")]
    pub id: String,
    #[serde(rename = "{#SERVICE.NAME}")]
    pub name: String,
    #[serde(rename = "{#STACK.NAME}")]
    pub stack_name: String,
    #[serde(rename = "{#SERVICE.KEY}")]
    pub service_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredStack {
    #[serde(rename = "{#STACK.NAME}")]
    pub stack_name: String,
}

/// One entry per service, in API order.
pub fn service_entries(services: &[Service]) -> Vec<DiscoveredService> {
    services
        .iter()
        .map(|s| DiscoveredService {
            id: s.id.clone(),
            name: s.name.clone(),
            stack_name: resolve_stack(s).to_string(),
            service_key: service_key(s),
        })
        .collect()
}

/// One entry per distinct stack, in first-seen order.
pub fn stack_entries(services: &[Service]) -> Vec<DiscoveredStack> {
    group_stacks(services)
        .into_iter()
        .map(|stack| DiscoveredStack {
            stack_name: stack.name.to_string(),
        })
        .collect()
}

pub async fn discover_services(api: &dyn SwarmApi) -> Result<String, MetricError> {
    let services = list_services(api).await?;
    Ok(serde_json::to_string(&service_entries(&services))?)
}

pub async fn discover_stacks(api: &dyn SwarmApi) -> Result<String, MetricError> {
    let services = list_services(api).await?;
    Ok(serde_json::to_string(&stack_entries(&services))?)
}
