//! Articles Poster binary.
//!
//! Initializes the index, posts a batch of articles and lists them, then
//! prints the listing's log lines.

use std::sync::Arc;

use anyhow::Context;
use articles_poster::{load_keypair, PosterConfig, Session};
use articles_sdk::{Ledger, MemoryLedger, RpcLedger};
use solana_sdk::{signature::Keypair, signer::Signer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,articles_poster=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = PosterConfig::from_env().context("reading configuration")?;
    config.validate().context("invalid configuration")?;

    let program_id = config.parse_program_id()?;
    let batch = config.load_batch()?;

    let (ledger, payer): (Arc<dyn Ledger>, Keypair) = if config.dry_run {
        tracing::info!("Dry run: using an in-process ledger and a throwaway signer");
        (Arc::new(MemoryLedger::new(program_id)), Keypair::new())
    } else {
        let ledger = RpcLedger::new(config.client_config()).context("creating RPC client")?;
        let payer = load_keypair(&config.keypair_path)?;
        tracing::info!("RPC URL: {}", config.rpc_url);
        (Arc::new(ledger), payer)
    };

    tracing::info!("Starting Articles Poster");
    tracing::info!("Program: {}", program_id);
    tracing::info!("Payer: {}", payer.pubkey());
    tracing::info!("Commitment: {}", config.commitment);
    tracing::info!("Articles to post: {}", batch.len());

    let mut session = Session::new(ledger, payer, program_id, config.submitter_config());
    let report = session
        .run(&batch)
        .await
        .with_context(|| format!("session stopped in state {}", session.state()))?;

    tracing::info!("Initialize: {}", report.initialize);
    tracing::info!("Post: {}", report.post);
    tracing::info!("List: {}", report.list);

    for line in &report.logs {
        println!("{}", line);
    }

    Ok(())
}
