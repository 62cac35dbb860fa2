//! Swarm API trait — the single read-only query the metrics need.
//!
//! Every metric reaches Docker through this trait.
//! `live.rs` provides the real Unix-socket implementation.
//! `fake.rs` provides a test double.

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;

use super::error::ApiError;

/// Pinned Docker Engine API version segment.
pub const API_VERSION: &str = "v1.41";

/// Docker filter query: filter name → accepted values (OR'd within a key).
///
/// A `BTreeMap` keeps the encoded query string stable across calls.
pub type Filters = BTreeMap<String, Vec<String>>;

/// Build a [`Filters`] map from `(name, value)` pairs.
pub fn filters<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Filters {
    let mut map = Filters::new();
    for (name, value) in pairs {
        map.entry(name.to_string()).or_default().push(value.to_string());
    }
    map
}

/// Object-safe async interface over the Docker daemon.
///
/// Implementations must be `Send + Sync` so they can sit behind an `Arc`.
pub trait SwarmApi: Send + Sync {
    /// GET `/<API_VERSION>/<path>` with optional JSON-encoded `filters`.
    /// Returns the raw 200 body.
    fn query<'a>(
        &'a self,
        path: &'a str,
        filters: Option<&'a Filters>,
    ) -> Pin<Box<dyn Future<Output = Result<Bytes, ApiError>> + Send + 'a>>;
}
