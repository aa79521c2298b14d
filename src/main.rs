//! # Paydrip — paced payment resubmission cron
//!
//! Periodically resubmits paid payment records to the processing endpoint,
//! outside a randomized nightly quiet window and honoring each record's
//! distancing backoff.
//!
//! Usage:
//!   paydrip              # Start the dispatcher
//!   paydrip --verbose    # Debug logging
//!
//! Configuration is environment-driven (PAYDRIP_STORE_URL,
//! PAYDRIP_STORE_EMAIL, PAYDRIP_STORE_PASSWORD, PAYDRIP_COLLECTION,
//! PAYDRIP_SUBMIT_URL).

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use paydrip_core::PaydripConfig;
use paydrip_scheduler::{DispatchEngine, HttpDispatcher, PocketBaseStore};

#[derive(Parser)]
#[command(name = "paydrip", version, about = "💸 Paydrip — paced payment resubmission")]
struct Cli {
    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "paydrip=debug,paydrip_core=debug,paydrip_scheduler=debug"
    } else {
        "paydrip=info,paydrip_core=info,paydrip_scheduler=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .init();

    let config = PaydripConfig::from_env()?;

    let mut store = PocketBaseStore::new(&config);
    // Not fatal: list queries surface a bad token on their own next tick.
    if let Err(e) = store.authenticate().await {
        tracing::error!("Store authentication failed: {e}");
    }

    let dispatcher = HttpDispatcher::new(&config.submit_url);
    DispatchEngine::new(Arc::new(store), Arc::new(dispatcher))
        .run()
        .await;

    Ok(())
}
