//! contract-intel CLI entry point.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use contract_intel::cli::Cli;
use contract_intel::infrastructure::config::{log_filter, ConfigLoader};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Config first: the subscriber's fallback level comes from it
    let config = match &cli.config {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error: {err:#}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::registry()
        .with(log_filter(&config))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(err) = contract_intel::cli::run(cli, config).await {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
