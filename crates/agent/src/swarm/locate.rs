//! Locate — resolve a user-supplied identifier to one service.

use thiserror::Error;

use super::model::Service;
use super::stack::service_key;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("service not found: {identifier}")]
pub struct ServiceNotFound {
    pub identifier: String,
}

/// Return the first service, in API order, whose ID, name, or
/// [`service_key`] equals `identifier` exactly.
///
/// All three candidates are checked per service before moving on, so an
/// earlier service matching by name wins over a later one matching by ID.
/// The daemon does not guarantee list order; with colliding identifiers
/// the winner may differ between calls.
pub fn find_by_identifier<'a>(
    services: &'a [Service],
    identifier: &str,
) -> Result<&'a Service, ServiceNotFound> {
    services
        .iter()
        .find(|s| s.id == identifier || s.name == identifier || service_key(s) == identifier)
        .ok_or_else(|| ServiceNotFound {
            identifier: identifier.to_string(),
        })
}
