//! # Parrot Shop Console
//!
//! Runs one shop operation against the configured backend and prints the
//! result as JSON.

use clap::Parser;
use logfire::config::MetricsOptions;
use parrot_shop::{action, config, front, logger, repo};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = action::AppArgs::parse();

    // Initialize configuration
    let app_config = config::AppConfig::load()?;

    // Initialize logging and metrics, stdout only without a Logfire token
    let shutdown_handler = match &app_config.logfire_token {
        Some(token) => Some(
            logfire::configure()
                .install_panic_handler()
                .with_metrics(Some(MetricsOptions::default()))
                .send_to_logfire(logfire::config::SendToLogfire::Yes)
                .with_token(token)
                .finish()?,
        ),
        None => {
            logger::setup_simple_logger(args.verbose)?;
            None
        }
    };

    let app_repo: repo::ImplAppRepo = Box::new(repo::rest::RestAppRepo::new(
        &app_config,
        front::loading::LoadingIndicator::new(),
    )?);

    let result = args.run(&app_config, &app_repo).await;
    if let Err(e) = &result {
        eprintln!("{}", front::errors::toast_for(e));
    }

    if let Some(shutdown_handler) = shutdown_handler {
        shutdown_handler.shutdown()?;
    }

    result
}
