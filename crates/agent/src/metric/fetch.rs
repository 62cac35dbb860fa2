//! Fetch — typed read-only queries shared by the metric handlers.

use tracing::debug;

use crate::client::{filters, SwarmApi};
use crate::swarm::decode::{decode_nodes, decode_services, decode_tasks};
use crate::swarm::{find_by_identifier, Service, Task};

use super::error::MetricError;

/// `GET /services`, in the order the daemon returns them.
pub async fn list_services(api: &dyn SwarmApi) -> Result<Vec<Service>, MetricError> {
    let body = api.query("services", None).await?;
    let services = decode_services(&body)?;
    debug!("Fetched {} services", services.len());
    Ok(services)
}

/// Fetch all services and pick the one `identifier` names (ID, name, or
/// service key).
pub async fn resolve_service(api: &dyn SwarmApi, identifier: &str) -> Result<Service, MetricError> {
    let services = list_services(api).await?;
    let service = find_by_identifier(&services, identifier)?;
    debug!("Resolved '{}' to service {} ({})", identifier, service.id, service.name);
    Ok(service.clone())
}

/// `GET /tasks` filtered server-side to one service and, optionally, one
/// desired state.
pub async fn list_service_tasks(
    api: &dyn SwarmApi,
    service_id: &str,
    desired_state: Option<&str>,
) -> Result<Vec<Task>, MetricError> {
    let mut pairs = vec![("service", service_id)];
    if let Some(state) = desired_state {
        pairs.push(("desired-state", state));
    }
    let task_filters = filters(pairs);
    let body = api.query("tasks", Some(&task_filters)).await?;
    Ok(decode_tasks(&body)?)
}

/// Number of nodes in the swarm.
pub async fn count_nodes(api: &dyn SwarmApi) -> Result<usize, MetricError> {
    let body = api.query("nodes", None).await?;
    Ok(decode_nodes(&body)?.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fake::{self, FakeSwarm};

    #[tokio::test]
    async fn test_resolve_service_by_key() {
        let api = FakeSwarm::new();
        api.add_service(fake::replicated_service("s1", "web", Some("shop"), 2)).await;

        let svc = resolve_service(&api, "shop_web").await.unwrap();
        assert_eq!(svc.id, "s1");
    }

    #[tokio::test]
    async fn test_resolve_service_not_found() {
        let api = FakeSwarm::new();
        api.add_service(fake::replicated_service("s1", "web", None, 2)).await;

        let err = resolve_service(&api, "api").await.unwrap_err();
        assert!(matches!(err, MetricError::ServiceNotFound(_)));
    }

    #[tokio::test]
    async fn test_list_service_tasks_applies_filters() {
        let api = FakeSwarm::new();
        api.add_task(fake::task("t1", "s1", "running", "running", None)).await;
        api.add_task(fake::task("t2", "s1", "shutdown", "shutdown", Some(0))).await;
        api.add_task(fake::task("t3", "s2", "running", "running", None)).await;

        assert_eq!(list_service_tasks(&api, "s1", None).await.unwrap().len(), 2);
        assert_eq!(list_service_tasks(&api, "s1", Some("running")).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_count_nodes() {
        let api = FakeSwarm::new();
        api.add_node(fake::node("n1")).await;
        api.add_node(fake::node("n2")).await;
        assert_eq!(count_nodes(&api).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_api_failure_propagates() {
        let api = FakeSwarm::new();
        api.fail_path("services", 500, "daemon exploded").await;
        let err = list_services(&api).await.unwrap_err();
        assert_eq!(err.to_string(), "daemon exploded");
    }
}
