use anyhow::Context;
use ferrous_outbound_domain::{CliOverrides, Config};

pub fn load_config(path: Option<&str>, cli_overrides: CliOverrides) -> anyhow::Result<Config> {
    let config = Config::load(path, cli_overrides).with_context(|| match path {
        Some(path) => format!("Failed to load configuration from {}", path),
        None => "Failed to load configuration".to_string(),
    })?;

    config.validate().context("Invalid configuration")?;
    Ok(config)
}
