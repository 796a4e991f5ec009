// ABOUTME: Configuration parsing from TOML file with environment variable overrides
// ABOUTME: Holds the listen address and the runtime type handed to the backend registry
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use vmdocker_runtime::RUNTIME_TYPE_TEST;

/// Env var pointing at an explicit config file
pub const CONFIG_PATH_ENV: &str = "VMDOCKER_AGENT_CONFIG";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RuntimeConfig {
    /// Registry key of the backend built on spawn
    #[serde(rename = "type", default = "default_runtime_type")]
    pub runtime_type: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_runtime_type() -> String {
    RUNTIME_TYPE_TEST.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            runtime_type: default_runtime_type(),
        }
    }
}

impl Config {
    /// Find the config file, checking in order:
    /// 1. `explicit` (from the command line)
    /// 2. VMDOCKER_AGENT_CONFIG env var
    /// 3. ./config.toml
    fn find_config_file(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }

        if let Ok(env_path) = std::env::var(CONFIG_PATH_ENV) {
            let path = PathBuf::from(&env_path);
            if path.exists() {
                return Some(path);
            }
        }

        let local_config = PathBuf::from("config.toml");
        if local_config.exists() {
            return Some(local_config);
        }

        None
    }

    /// Load configuration with environment variable overrides.
    ///
    /// An explicit path must exist; the fallback locations are optional and
    /// defaults are used when none is found.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = if let Some(config_path) = Self::find_config_file(explicit) {
            tracing::info!(path = %config_path.display(), "Loading configuration from file");
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            Self::parse(&content)
                .with_context(|| format!("Failed to parse {}", config_path.display()))?
        } else {
            tracing::info!("No config file found, using environment variables and defaults");
            Config::default()
        };

        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config TOML")
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("RUNTIME_TYPE") {
            if !val.is_empty() {
                self.runtime.runtime_type = val;
            }
        }
        if let Ok(val) = std::env::var("AGENT_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("AGENT_PORT") {
            self.server.port = val
                .parse()
                .with_context(|| format!("AGENT_PORT must be a valid port number, got: {}", val))?;
        }
        Ok(())
    }

    /// Reject values that would only fail later at spawn or bind time
    pub fn validate(&self) -> Result<()> {
        if self.runtime.runtime_type.trim().is_empty() {
            anyhow::bail!("runtime.type must not be empty (set in config.toml or RUNTIME_TYPE)");
        }
        if self.server.host.trim().is_empty() {
            anyhow::bail!("server.host must not be empty (set in config.toml or AGENT_HOST)");
        }
        Ok(())
    }

    /// Address string for the HTTP listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
