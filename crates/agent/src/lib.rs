// Domain-driven module structure for the Docker Swarm metrics agent.

// Core infrastructure
pub mod client;
pub mod conf;
pub mod swarm;

// Domain modules
pub mod metric;
pub mod runtime;
