//! Metric module — the six Swarm metrics, their registry, and dispatch.

pub mod discovery;
pub mod dispatch;
pub mod error;
pub mod fetch;
pub mod health;
pub mod registry;
pub mod replicas;
pub mod tasks;
pub mod value;

pub use dispatch::Dispatcher;
pub use error::MetricError;
pub use registry::{MetricDef, MetricRegistry, ParamSpec, PLUGIN_NAME};
pub use value::MetricValue;
