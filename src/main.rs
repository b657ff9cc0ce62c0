use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};

use envdns::cli::{Cli, Commands};
use envdns::config::ServerConfig;
use envdns::loader::load_records;
use envdns::logging::init_tracing;
use envdns::relay::RelayClient;
use envdns::resolver::Resolver;
use envdns::server::serve;
use envdns::service::ServiceResolver;
use envdns::zone::Zone;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    init_tracing();
    let cli = Cli::parse();
    let config = ServerConfig::from_env();

    match cli.command() {
        Commands::ShowConfig => {
            match serde_json::to_string_pretty(&config) {
                Ok(json) => println!("{json}"),
                Err(_) => println!("{config}"),
            }
            std::process::ExitCode::SUCCESS
        }
        Commands::Serve => match run(config).await {
            Ok(()) => std::process::ExitCode::SUCCESS,
            Err(error) => {
                error!(%error, "fatal startup error");
                std::process::ExitCode::FAILURE
            }
        },
    }
}

async fn run(config: ServerConfig) -> Result<(), envdns::error::EngineError> {
    let records = load_records(std::env::vars());
    info!(count = records.len(), "loaded zone records");
    let zone = Arc::new(Zone::from_records(records));

    let relay = match config.relay {
        Some(relay_config) => {
            info!(upstreams = relay_config.upstreams.len(), "relay enabled");
            Some(Arc::new(RelayClient::new(relay_config)))
        }
        None => None,
    };

    let service = Some(Arc::new(ServiceResolver::from_system_conf().await?));
    let resolver = Arc::new(Resolver::new(zone, relay, service));

    serve(config.port, resolver).await
}
