use serde::{Deserialize, Serialize};

use super::dns::DnsConfig;
use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::outbound::OutboundConfig;
use super::server::ServerConfig;
use crate::Destination;

/// Main configuration structure for Ferrous Outbound
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Listener and forwarding target
    #[serde(default)]
    pub server: ServerConfig,

    /// Outbound dispatch behaviour (domain strategy, timeouts, retry)
    #[serde(default)]
    pub outbound: OutboundConfig,

    /// Name lookup sources for the `use_ip` domain strategy
    #[serde(default)]
    pub dns: DnsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. ferrous-outbound.toml in current directory
    /// 3. /etc/ferrous-outbound/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new("ferrous-outbound.toml").exists() {
            Self::from_file("ferrous-outbound.toml")?
        } else if std::path::Path::new("/etc/ferrous-outbound/config.toml").exists() {
            Self::from_file("/etc/ferrous-outbound/config.toml")?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    /// Load configuration from a specific file
    fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply command-line overrides to configuration
    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(listen) = overrides.listen_address {
            self.server.listen_address = listen;
        }
        if let Some(target) = overrides.forward_to {
            self.server.forward_to = Some(target);
        }
        if let Some(strategy) = overrides.domain_strategy {
            self.outbound.domain_strategy = strategy;
        }
        if let Some(timeout) = overrides.timeout {
            self.outbound.timeout = timeout;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    /// Parsed forwarding target, if one is configured.
    pub fn forward_destination(&self) -> Result<Option<Destination>, ConfigError> {
        self.server
            .forward_to
            .as_deref()
            .map(|s| {
                s.parse::<Destination>()
                    .map_err(|e| ConfigError::Validation(e.to_string()))
            })
            .transpose()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.listen_address.trim().is_empty() {
            return Err(ConfigError::Validation(
                "Listen address cannot be empty".to_string(),
            ));
        }

        self.forward_destination()?;

        let retry = &self.outbound.retry;
        if retry.attempts == 0 {
            return Err(ConfigError::Validation(
                "outbound.retry.attempts must be at least 1".to_string(),
            ));
        }
        if retry.multiplier == 0 {
            return Err(ConfigError::Validation(
                "outbound.retry.multiplier must be at least 1".to_string(),
            ));
        }

        if self.outbound.domain_strategy.requires_lookup() && !self.dns.has_lookup() {
            return Err(ConfigError::Validation(
                "domain_strategy 'use_ip' needs dns.use_system or dns.hosts".to_string(),
            ));
        }

        Ok(())
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub listen_address: Option<String>,
    pub forward_to: Option<String>,
    pub domain_strategy: Option<super::outbound::DomainStrategy>,
    pub timeout: Option<u32>,
    pub log_level: Option<String>,
}
