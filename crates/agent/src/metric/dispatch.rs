//! Dispatch — route a metric request to its handler under a deadline.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::client::SwarmApi;

use super::error::MetricError;
use super::registry::MetricRegistry;
use super::value::MetricValue;

/// Entry point for metric requests from the monitoring host.
pub struct Dispatcher {
    api: Arc<dyn SwarmApi>,
    registry: MetricRegistry,
    deadline: Duration,
}

impl Dispatcher {
    pub fn new(api: Arc<dyn SwarmApi>, registry: MetricRegistry, deadline: Duration) -> Self {
        Self { api, registry, deadline }
    }

    pub fn registry(&self) -> &MetricRegistry {
        &self.registry
    }

    /// Compute metric `key` with `params`.
    ///
    /// Unknown keys and wrong parameter counts fail before any request is
    /// made. The whole computation, every API round trip included, must
    /// finish within the deadline; on expiry the in-flight request is
    /// dropped and no partial result is returned.
    pub async fn export(&self, key: &str, params: &[String]) -> Result<MetricValue, MetricError> {
        let def = self
            .registry
            .get(key)
            .ok_or_else(|| MetricError::UnknownMetric(key.to_string()))?;

        if params.len() != def.params.len() {
            return Err(MetricError::InvalidParameterCount {
                key: key.to_string(),
                expected: def.params.len(),
                got: params.len(),
            });
        }

        debug!("Exporting {} with params {:?}", key, params);
        let result = match tokio::time::timeout(self.deadline, (def.handler)(self.api.as_ref(), params)).await {
            Ok(result) => result,
            Err(_) => Err(MetricError::DeadlineExceeded {
                key: key.to_string(),
                timeout: self.deadline,
            }),
        };

        if let Err(ref e) = result {
            warn!("Metric {} failed: {}", key, e);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fake::{self, FakeSwarm};
    use crate::client::{ApiError, Filters};
    use crate::metric::registry::{
        SERVICES_DISCOVERY, SERVICE_REPLICAS_DESIRED, SERVICE_REPLICAS_RUNNING, SERVICE_RESTARTS,
        STACKS_DISCOVERY, STACK_HEALTH,
    };
    use bytes::Bytes;
    use std::future::Future;
    use std::pin::Pin;

    fn dispatcher(api: Arc<FakeSwarm>) -> Dispatcher {
        Dispatcher::new(api, MetricRegistry::standard(), Duration::from_secs(30))
    }

    fn params(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    async fn seeded() -> Arc<FakeSwarm> {
        let api = Arc::new(FakeSwarm::new());
        api.add_service(fake::replicated_service("s1", "web", Some("myapp"), 2)).await;
        api.add_task(fake::task("t1", "s1", "running", "running", Some(0))).await;
        api.add_task(fake::task("t2", "s1", "running", "running", Some(0))).await;
        api.add_task(fake::task("t3", "s1", "shutdown", "failed", Some(1))).await;
        api
    }

    #[tokio::test]
    async fn test_export_every_standard_metric() {
        let api = seeded().await;
        let d = dispatcher(api);

        assert!(matches!(
            d.export(SERVICES_DISCOVERY, &[]).await.unwrap(),
            MetricValue::Text(ref json) if json.contains(r#""{#SERVICE.KEY}":"myapp_web""#)
        ));
        assert_eq!(
            d.export(STACKS_DISCOVERY, &[]).await.unwrap(),
            MetricValue::Text(r#"[{"{#STACK.NAME}":"myapp"}]"#.to_string())
        );
        assert_eq!(
            d.export(SERVICE_REPLICAS_DESIRED, &params(&["web"])).await.unwrap(),
            MetricValue::Integer(2)
        );
        assert_eq!(
            d.export(SERVICE_REPLICAS_RUNNING, &params(&["myapp_web"])).await.unwrap(),
            MetricValue::Integer(2)
        );
        assert_eq!(
            d.export(SERVICE_RESTARTS, &params(&["s1"])).await.unwrap(),
            MetricValue::Integer(1)
        );
        let health = d.export(STACK_HEALTH, &params(&["myapp"])).await.unwrap();
        assert!(health.to_string().contains(r#""health_percentage":100.0"#));
    }

    #[tokio::test]
    async fn test_unknown_metric() {
        let api = seeded().await;
        let d = dispatcher(api.clone());
        let err = d.export("swarm.nodes.discovery", &[]).await.unwrap_err();
        assert_eq!(err.to_string(), "unknown metric swarm.nodes.discovery");
        assert_eq!(api.request_count(), 0);
    }

    #[tokio::test]
    async fn test_parameter_count_checked_before_any_request() {
        let api = seeded().await;
        let d = dispatcher(api.clone());

        let err = d.export(SERVICES_DISCOVERY, &params(&["extra"])).await.unwrap_err();
        assert!(matches!(err, MetricError::InvalidParameterCount { expected: 0, got: 1, .. }));

        let err = d.export(SERVICE_REPLICAS_DESIRED, &[]).await.unwrap_err();
        assert!(matches!(err, MetricError::InvalidParameterCount { expected: 1, got: 0, .. }));

        let err = d.export(STACK_HEALTH, &params(&["a", "b"])).await.unwrap_err();
        assert!(matches!(err, MetricError::InvalidParameterCount { expected: 1, got: 2, .. }));

        assert_eq!(api.request_count(), 0);
    }

    /// Gateway that never answers within any reasonable deadline.
    struct StalledApi;

    impl SwarmApi for StalledApi {
        fn query<'a>(
            &'a self,
            _path: &'a str,
            _filters: Option<&'a Filters>,
        ) -> Pin<Box<dyn Future<Output = Result<Bytes, ApiError>> + Send + 'a>> {
            Box::pin(async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(Bytes::from_static(b"[]"))
            })
        }
    }

    #[tokio::test]
    async fn test_deadline_exceeded() {
        let d = Dispatcher::new(
            Arc::new(StalledApi),
            MetricRegistry::standard(),
            Duration::from_millis(50),
        );
        let err = d.export(SERVICES_DISCOVERY, &[]).await.unwrap_err();
        assert!(matches!(err, MetricError::DeadlineExceeded { ref key, .. } if key == SERVICES_DISCOVERY));
    }

    #[tokio::test]
    async fn test_handler_error_is_returned() {
        let api = seeded().await;
        let d = dispatcher(api);
        let err = d.export(SERVICE_REPLICAS_RUNNING, &params(&["nope"])).await.unwrap_err();
        assert_eq!(err.to_string(), "service not found: nope");
    }
}
