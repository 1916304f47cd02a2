//! Confirmation levels and signature status.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Confirmation level reported by the ledger for a transaction.
///
/// Ordered from weakest to strongest, so `status >= awaited` means the
/// awaited level has been reached.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    /// Processed by the node, may still be rolled back.
    Processed,
    /// Voted on by a supermajority of the cluster.
    #[default]
    Confirmed,
    /// Rooted; cannot be rolled back.
    Finalized,
}

impl Commitment {
    /// Returns the RPC name of this level.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Processed => "processed",
            Self::Confirmed => "confirmed",
            Self::Finalized => "finalized",
        }
    }

    /// Parses an RPC level name, ignoring ASCII case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "processed" => Some(Self::Processed),
            "confirmed" => Some(Self::Confirmed),
            "finalized" => Some(Self::Finalized),
            _ => None,
        }
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a submitted transaction as seen by the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureStatus {
    /// Slot the transaction was processed in.
    pub slot: u64,
    /// Highest confirmation level reached, if known.
    pub confirmation: Option<Commitment>,
    /// Execution error, if the transaction landed but failed.
    pub err: Option<String>,
}

impl SignatureStatus {
    /// Returns true if the transaction reached at least `level` without error.
    #[must_use]
    pub fn satisfies(&self, level: Commitment) -> bool {
        self.err.is_none() && self.confirmation.is_some_and(|c| c >= level)
    }
}
