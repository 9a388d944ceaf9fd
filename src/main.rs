//! block-glance - a terminal explorer for a natural-language blockchain
//! query API.

use block_glance::api::{ExplorerApi, HttpExplorerApi};
use block_glance::cli::Cli;
use block_glance::error::Result;
use block_glance::{logging, tui};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // A missing .env is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse_args();

    if cli.is_headless() {
        logging::init_stderr_logging();
    } else {
        logging::init_file_logging();
    }

    match run(&cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("{}: {}", e.category(), e);
            eprintln!("{}: {}", e.category(), e);
            std::process::exit(1);
        }
    }
}

async fn run(cli: &Cli) -> Result<i32> {
    let config = cli.resolve_config()?;
    info!(
        "Using API {} (timeout {}s)",
        config.api.base_url, config.api.timeout_secs
    );

    if cli.is_headless() {
        return tui::headless::run_headless(cli, &config).await;
    }

    let api = HttpExplorerApi::from_config(&config.api)?;
    let endpoint = api.base_url().to_string();
    let api: Arc<dyn ExplorerApi> = Arc::new(api);
    tui::run_async(&config, api, endpoint).await?;
    Ok(0)
}
