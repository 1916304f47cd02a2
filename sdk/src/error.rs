//! SDK error types.
//!
//! Every error here is raised locally, before any interaction with the ledger.

/// SDK errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SdkError {
    /// Integer does not fit the target width.
    #[error("encoding error: {value} does not fit in {bits} bits")]
    Encoding {
        /// Value that was rejected.
        value: u64,
        /// Width of the target integer.
        bits: u32,
    },

    /// Instruction discriminant outside the known variants.
    #[error("unknown instruction variant: {0}")]
    UnknownVariant(u8),

    /// Instruction payload could not be encoded.
    #[error("payload encoding error: {0}")]
    PayloadEncoding(String),

    /// Seeds produced no valid program address.
    #[error("derivation error: {0}")]
    Derivation(String),

    /// On-chain account data does not match the expected layout.
    #[error("malformed account data: {0}")]
    MalformedAccountData(String),

    /// Invalid or missing address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}
