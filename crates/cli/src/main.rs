use anyhow::Context;
use clap::{Parser, ValueEnum};
use ferrous_outbound_domain::{CliOverrides, DomainStrategy};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

mod bootstrap;
mod di;
mod server;

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    AsIs,
    UseIp,
}

impl From<StrategyArg> for DomainStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::AsIs => DomainStrategy::AsIs,
            StrategyArg::UseIp => DomainStrategy::UseIp,
        }
    }
}

#[derive(Parser)]
#[command(name = "ferrous-outbound")]
#[command(version)]
#[command(about = "Ferrous Outbound - direct outbound dispatcher and TCP forwarder")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Address to accept clients on
    #[arg(short = 'l', long)]
    listen: Option<String>,

    /// Destination every client is forwarded to ([tcp|udp]://HOST:PORT)
    #[arg(short = 'f', long)]
    forward_to: Option<String>,

    /// Resolve domain destinations before dialing
    #[arg(long, value_enum)]
    domain_strategy: Option<StrategyArg>,

    /// Idle timeout for TCP sessions in seconds (0 = none)
    #[arg(short = 't', long)]
    timeout: Option<u32>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        listen_address: cli.listen.clone(),
        forward_to: cli.forward_to.clone(),
        domain_strategy: cli.domain_strategy.map(DomainStrategy::from),
        timeout: cli.timeout,
        log_level: cli.log_level.clone(),
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config)?;

    info!("Starting Ferrous Outbound v{}", env!("CARGO_PKG_VERSION"));

    let destination = config
        .forward_destination()?
        .context("no forward destination: set server.forward_to or pass --forward-to")?;

    let shutdown = CancellationToken::new();
    let services = di::OutboundServices::new(&config, shutdown.clone())?;

    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received"),
            Err(e) => error!(error = %e, "Failed to listen for shutdown signal"),
        }
        signal_token.cancel();
    });

    server::run_forwarder(
        &config.server.listen_address,
        destination,
        services.dispatcher,
        shutdown,
    )
    .await?;

    info!("Forwarder shutdown complete");
    Ok(())
}
