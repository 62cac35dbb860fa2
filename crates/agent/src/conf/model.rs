//! Model — AgentConfig.

use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_PATH: &str = "/etc/swarm-agent/agent.toml";
pub const DEFAULT_DOCKER_SOCKET: &str = "/var/run/docker.sock";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Docker daemon socket; a leading `unix://` is accepted.
    pub docker_socket: String,
    /// Per-request timeout of the Docker API gateway.
    pub request_timeout_secs: u64,
    /// Overall deadline for one metric call, all requests included.
    pub call_timeout_secs: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            docker_socket: DEFAULT_DOCKER_SOCKET.to_string(),
            request_timeout_secs: 30,
            call_timeout_secs: 30,
        }
    }
}
