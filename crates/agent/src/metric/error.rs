//! Metric errors — everything a metric call can fail with.

use std::time::Duration;

use thiserror::Error;

use crate::client::ApiError;
use crate::swarm::{DecodeError, ServiceNotFound};

#[derive(Error, Debug)]
pub enum MetricError {
    #[error("unknown metric {0}")]
    UnknownMetric(String),
    #[error("expected {expected} parameter(s) for {key}, got {got}")]
    InvalidParameterCount {
        key: String,
        expected: usize,
        got: usize,
    },
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    ServiceNotFound(#[from] ServiceNotFound),
    #[error("stack not found: {0}")]
    StackNotFound(String),
    #[error("could not determine desired replicas for service {0}")]
    UndeterminedMode(String),
    #[error("cannot marshal JSON: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("metric {key} did not complete within {timeout:?}")]
    DeadlineExceeded { key: String, timeout: Duration },
}
