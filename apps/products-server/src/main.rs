use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use products_server::{AppConfig, logging, shutdown};
use tokio_util::sync::CancellationToken;

/// Products Server - paged, filtered and ordered product listing
#[derive(Parser)]
#[command(name = "products-server")]
#[command(about = "Products Server - paged, filtered and ordered product listing")]
#[command(version)]
struct Cli {
    /// Path to configuration file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print effective configuration (YAML) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1) defaults -> 2) YAML (if provided) -> 3) env (PRODUCTS__*) -> 4) CLI overrides
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_cli_overrides(cli.verbose);

    if cli.print_config {
        println!("Effective configuration:\n{}", config.to_yaml()?);
        return Ok(());
    }

    logging::init(&config.logging)?;
    tracing::info!("Products Server starting");

    let root = CancellationToken::new();
    let signals = tokio::spawn({
        let root = root.clone();
        async move {
            if let Err(e) = shutdown::cancel_on_signal(&root).await {
                tracing::error!(error = %e, "Signal handling failed");
            }
        }
    });

    let result = products_server::serve(config, root).await;
    signals.abort();
    result
}
