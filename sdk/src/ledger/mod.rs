//! The ledger seam.
//!
//! The ledger is an external, append-only service. The client only needs to
//! submit signed transactions, observe their confirmation, read their logs,
//! and read account data back. [`RpcLedger`](crate::client::RpcLedger) talks
//! to a real node; [`MemoryLedger`] emulates one in process.

pub mod memory;

use async_trait::async_trait;
use solana_sdk::{
    hash::Hash, pubkey::Pubkey, signature::Signature, transaction::Transaction,
};

use crate::client::ClientError;
use crate::types::SignatureStatus;

pub use memory::MemoryLedger;

/// Operations the client consumes from the ledger.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Returns a recent blockhash to sign transactions against.
    async fn latest_blockhash(&self) -> Result<Hash, ClientError>;

    /// Submits a signed transaction.
    ///
    /// A refusal by the ledger is reported as [`ClientError::Rejected`]
    /// with the ledger's reason. When the error is
    /// [indeterminate](ClientError::is_indeterminate) the transaction may
    /// still land.
    async fn submit(&self, transaction: &Transaction) -> Result<Signature, ClientError>;

    /// Returns the current status of a submitted transaction, or `None` if
    /// the ledger has not seen it yet.
    async fn signature_status(
        &self,
        signature: &Signature,
    ) -> Result<Option<SignatureStatus>, ClientError>;

    /// Returns the execution log lines of a confirmed transaction.
    ///
    /// Reports [`ClientError::NotFound`] if the transaction is unknown.
    async fn transaction_logs(&self, signature: &Signature) -> Result<Vec<String>, ClientError>;

    /// Returns the data held by an account, or `None` if it does not exist.
    async fn account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, ClientError>;
}
