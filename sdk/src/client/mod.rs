//! JSON-RPC client for the ledger.
//!
//! This module provides the production [`Ledger`](crate::ledger::Ledger)
//! implementation, talking to a Solana node over JSON-RPC.
//!
//! # Example
//!
//! ```rust,ignore
//! use articles_sdk::client::{ClientConfig, RpcLedger};
//! use articles_sdk::ledger::Ledger;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let ledger = RpcLedger::new(ClientConfig::new("https://api.devnet.solana.com"))?;
//!
//!     let blockhash = ledger.latest_blockhash().await?;
//!     println!("Recent blockhash: {}", blockhash);
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod rpc;

pub use config::ClientConfig;
pub use error::ClientError;
pub use rpc::RpcLedger;
