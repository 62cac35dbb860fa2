//! CLI — command-line entrypoint for one-shot metric calls.

use clap::{Parser, Subcommand};

use crate::metric::{Dispatcher, MetricRegistry, PLUGIN_NAME};

#[derive(Debug, Parser)]
#[command(name = "swarm-agent", version, about = "Docker Swarm metrics for the monitoring agent")]
pub struct Cli {
    /// Path to the TOML config file (default: $SWARM_AGENT_CONFIG_FILE or /etc/swarm-agent/agent.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compute one metric and print its value
    Get {
        /// Metric key, e.g. swarm.service.replicas_running
        key: String,
        /// Metric parameters
        params: Vec<String>,
    },
    /// List the metrics this plugin exports
    Metrics,
}

/// Render the metric catalogue, one metric per line.
pub fn describe_metrics(registry: &MetricRegistry) -> String {
    let mut out = format!("{} metrics:\n", PLUGIN_NAME);
    for def in registry.list() {
        let params: Vec<String> = def.params.iter().map(|p| format!("<{}>", p.name)).collect();
        let signature = if params.is_empty() {
            def.key.to_string()
        } else {
            format!("{}[{}]", def.key, params.join(","))
        };
        out.push_str(&format!("  {:<42} {}\n", signature, def.description));
    }
    out
}

/// Run one CLI command and return the text for stdout.
pub async fn run(dispatcher: &Dispatcher, command: Command) -> Result<String, Box<dyn std::error::Error>> {
    match command {
        Command::Get { key, params } => {
            let value = dispatcher.export(&key, &params).await?;
            Ok(value.to_string())
        }
        Command::Metrics => Ok(describe_metrics(dispatcher.registry())),
    }
}
