//! Swarm module — typed entities, decoding, stack resolution, service lookup.

pub mod decode;
pub mod locate;
pub mod model;
pub mod stack;

pub use decode::DecodeError;
pub use locate::{find_by_identifier, ServiceNotFound};
pub use model::{Node, Service, ServiceMode, Task};
pub use stack::{group_stacks, resolve_stack, service_key, Stack, STANDALONE};
