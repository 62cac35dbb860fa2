//! Boot — logging init, config load, Docker client and dispatcher creation.

use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::client::UnixSocketClient;
use crate::conf::AgentConfig;
use crate::metric::{Dispatcher, MetricRegistry, PLUGIN_NAME};

/// Initialise the tracing / logging subsystem.
///
/// Logs go to stderr; stdout is reserved for the metric value.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "swarm_agent=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Wire the live Docker client and the standard metric table together.
pub fn build_dispatcher(config: &AgentConfig) -> Dispatcher {
    let client = UnixSocketClient::new(&config.docker_socket, config.request_timeout());
    debug!(
        "Docker API at {} (request timeout {:?})",
        client.socket_path().display(),
        client.timeout()
    );
    Dispatcher::new(Arc::new(client), MetricRegistry::standard(), config.call_timeout())
}

/// Load config and build the dispatcher.
pub fn boot(config_path: Option<&str>) -> Result<Dispatcher, Box<dyn std::error::Error>> {
    info!("Starting {} plugin v{}", PLUGIN_NAME, env!("CARGO_PKG_VERSION"));

    let config = AgentConfig::load(config_path)?;
    info!(
        "Loaded configuration: docker_socket={}, call_timeout={}s",
        config.docker_socket, config.call_timeout_secs
    );

    Ok(build_dispatcher(&config))
}
