use ferrous_outbound_domain::Config;
use tracing_subscriber::EnvFilter;

/// `RUST_LOG` takes precedence over `logging.level`.
pub fn init_logging(config: &Config) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    if config.logging.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    }
    .map_err(|e| anyhow::anyhow!(e))
}
