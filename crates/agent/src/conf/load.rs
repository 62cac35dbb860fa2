//! Load — config loading from file and environment variables.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

use super::model::{AgentConfig, DEFAULT_CONFIG_PATH};

impl AgentConfig {
    /// Load configuration from file or environment variables.
    /// Priority: Environment Variables > Config File > Defaults
    ///
    /// `path` wins over `SWARM_AGENT_CONFIG_FILE`; a missing file is not an
    /// error.
    pub fn load(path: Option<&str>) -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = match path {
            Some(p) => p.to_string(),
            None => std::env::var("SWARM_AGENT_CONFIG_FILE")
                .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string()),
        };

        let mut config = if Path::new(&config_path).exists() {
            tracing::debug!("Loading configuration from: {}", config_path);
            Self::from_file(&config_path)?
        } else {
            tracing::debug!("Config file not found at {}, using environment variables", config_path);
            Self::default()
        };

        config.apply_env(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: AgentConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Override fields from environment variables, read through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), String> {
        if let Some(socket) = lookup("DOCKER_SOCKET") {
            self.docker_socket = socket;
        }
        if let Some(secs) = lookup("SWARM_AGENT_REQUEST_TIMEOUT") {
            self.request_timeout_secs = parse_secs("SWARM_AGENT_REQUEST_TIMEOUT", &secs)?;
        }
        if let Some(secs) = lookup("SWARM_AGENT_CALL_TIMEOUT") {
            self.call_timeout_secs = parse_secs("SWARM_AGENT_CALL_TIMEOUT", &secs)?;
        }
        Ok(())
    }

    /// Validate that configuration values are sane
    pub fn validate(&self) -> Result<(), String> {
        if self.docker_socket.trim_start_matches("unix://").is_empty() {
            return Err("docker_socket must not be empty".to_string());
        }
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be > 0".to_string());
        }
        if self.call_timeout_secs == 0 {
            return Err("call_timeout_secs must be > 0".to_string());
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }
}

fn parse_secs(name: &str, value: &str) -> Result<u64, String> {
    value
        .trim()
        .parse()
        .map_err(|_| format!("{} must be a whole number of seconds, got '{}'", name, value))
}
