//! Registry — the immutable table of exported metrics.
//!
//! Built once by [`MetricRegistry::standard`] and handed to the
//! [`Dispatcher`](super::dispatch::Dispatcher); nothing is registered at
//! runtime.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use crate::client::SwarmApi;

use super::error::MetricError;
use super::value::MetricValue;
use super::{discovery, health, replicas, tasks};

/// Plugin name reported to the monitoring host.
pub const PLUGIN_NAME: &str = "DockerSwarm";

pub const SERVICES_DISCOVERY: &str = "swarm.services.discovery";
pub const STACKS_DISCOVERY: &str = "swarm.stacks.discovery";
pub const SERVICE_REPLICAS_DESIRED: &str = "swarm.service.replicas_desired";
pub const SERVICE_REPLICAS_RUNNING: &str = "swarm.service.replicas_running";
pub const SERVICE_RESTARTS: &str = "swarm.service.restarts";
pub const STACK_HEALTH: &str = "swarm.stack.health";

pub type HandlerFuture<'a> = Pin<Box<dyn Future<Output = Result<MetricValue, MetricError>> + Send + 'a>>;

/// A metric computation. `params` has already been checked against the
/// metric's [`ParamSpec`] list.
pub type Handler = for<'a> fn(&'a dyn SwarmApi, &'a [String]) -> HandlerFuture<'a>;

#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub name: &'static str,
    pub description: &'static str,
}

#[derive(Clone, Copy)]
pub struct MetricDef {
    pub key: &'static str,
    pub description: &'static str,
    pub params: &'static [ParamSpec],
    pub handler: Handler,
}

impl std::fmt::Debug for MetricDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricDef")
            .field("key", &self.key)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

const SERVICE_PARAM: &[ParamSpec] = &[ParamSpec {
    name: "service",
    description: "Service ID, service name, or <stack>_<name> service key",
}];

const STACK_PARAM: &[ParamSpec] = &[ParamSpec {
    name: "stack",
    description: "Exact stack name as reported by stack discovery",
}];

// ── Handler adapters ────────────────────────────────────────────

/// The parameter of a one-parameter metric. The dispatcher has already
/// checked the count; a handler called directly with the wrong count gets
/// the same error.
fn single_param<'a>(key: &str, params: &'a [String]) -> Result<&'a str, MetricError> {
    match params {
        [value] => Ok(value.as_str()),
        _ => Err(MetricError::InvalidParameterCount {
            key: key.to_string(),
            expected: 1,
            got: params.len(),
        }),
    }
}

fn services_discovery<'a>(api: &'a dyn SwarmApi, _params: &'a [String]) -> HandlerFuture<'a> {
    Box::pin(async move { discovery::discover_services(api).await.map(MetricValue::from) })
}

fn stacks_discovery<'a>(api: &'a dyn SwarmApi, _params: &'a [String]) -> HandlerFuture<'a> {
    Box::pin(async move { discovery::discover_stacks(api).await.map(MetricValue::from) })
}

fn replicas_desired<'a>(api: &'a dyn SwarmApi, params: &'a [String]) -> HandlerFuture<'a> {
    Box::pin(async move {
        let identifier = single_param(SERVICE_REPLICAS_DESIRED, params)?;
        replicas::desired_replicas(api, identifier).await.map(MetricValue::from)
    })
}

fn replicas_running<'a>(api: &'a dyn SwarmApi, params: &'a [String]) -> HandlerFuture<'a> {
    Box::pin(async move {
        let identifier = single_param(SERVICE_REPLICAS_RUNNING, params)?;
        tasks::running_tasks(api, identifier).await.map(MetricValue::from)
    })
}

fn service_restarts<'a>(api: &'a dyn SwarmApi, params: &'a [String]) -> HandlerFuture<'a> {
    Box::pin(async move {
        let identifier = single_param(SERVICE_RESTARTS, params)?;
        tasks::restart_count(api, identifier).await.map(MetricValue::from)
    })
}

fn stack_health<'a>(api: &'a dyn SwarmApi, params: &'a [String]) -> HandlerFuture<'a> {
    Box::pin(async move {
        let stack_name = single_param(STACK_HEALTH, params)?;
        health::stack_health_json(api, stack_name).await.map(MetricValue::from)
    })
}

// ── Registry ────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct MetricRegistry {
    metrics: HashMap<&'static str, MetricDef>,
}

impl MetricRegistry {
    pub fn new(defs: impl IntoIterator<Item = MetricDef>) -> Self {
        Self {
            metrics: defs.into_iter().map(|d| (d.key, d)).collect(),
        }
    }

    /// The six Docker Swarm metrics.
    pub fn standard() -> Self {
        Self::new([
            MetricDef {
                key: SERVICES_DISCOVERY,
                description: "Discover Docker Swarm services with stack information.",
                params: &[],
                handler: services_discovery,
            },
            MetricDef {
                key: STACKS_DISCOVERY,
                description: "Discover Docker Compose stacks.",
                params: &[],
                handler: stacks_discovery,
            },
            MetricDef {
                key: SERVICE_REPLICAS_DESIRED,
                description: "Returns the desired number of replicas for a service.",
                params: SERVICE_PARAM,
                handler: replicas_desired,
            },
            MetricDef {
                key: SERVICE_REPLICAS_RUNNING,
                description: "Returns the number of running tasks for a service.",
                params: SERVICE_PARAM,
                handler: replicas_running,
            },
            MetricDef {
                key: SERVICE_RESTARTS,
                description: "Returns a lower bound on task restarts for a service, \
                              limited by the daemon's task history retention.",
                params: SERVICE_PARAM,
                handler: service_restarts,
            },
            MetricDef {
                key: STACK_HEALTH,
                description: "Returns health status for a Docker Compose stack.",
                params: STACK_PARAM,
                handler: stack_health,
            },
        ])
    }

    pub fn get(&self, key: &str) -> Option<&MetricDef> {
        self.metrics.get(key)
    }

    /// All metrics, sorted by key.
    pub fn list(&self) -> Vec<&MetricDef> {
        let mut defs: Vec<&MetricDef> = self.metrics.values().collect();
        defs.sort_by_key(|d| d.key);
        defs
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}
