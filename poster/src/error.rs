//! Session error types.

use std::fmt;

use articles_sdk::{ClientError, SdkError};
use solana_sdk::signature::Signature;
use thiserror::Error;

/// A phase of the posting session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Creating the index account.
    Initialize,
    /// Posting the batch of articles.
    Post,
    /// Listing every posted article.
    List,
    /// Closing the session.
    Finish,
    /// Reading accounts back.
    Fetch,
}

impl Phase {
    /// Returns the lowercase phase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Initialize => "initialize",
            Self::Post => "post",
            Self::List => "list",
            Self::Finish => "finish",
            Self::Fetch => "fetch",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while driving a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Encoding, derivation or decoding failed.
    #[error(transparent)]
    Sdk(#[from] SdkError),

    /// The transaction could not be signed.
    #[error("signing failed: {0}")]
    Signing(String),

    /// The ledger refused the transaction or it failed on execution.
    #[error("{phase} transaction rejected: {reason}")]
    SubmissionRejected {
        /// Phase that submitted the transaction.
        phase: Phase,
        /// Reason reported by the ledger.
        reason: String,
    },

    /// The transaction was accepted but not confirmed in time. Its outcome
    /// is unknown.
    #[error("{phase} transaction {signature} not confirmed before the deadline")]
    ConfirmationTimeout {
        /// Phase that submitted the transaction.
        phase: Phase,
        /// Signature to look up later.
        signature: Signature,
    },

    /// Talking to the ledger failed.
    #[error("ledger error during {phase}: {source}")]
    Ledger {
        /// Phase in progress.
        phase: Phase,
        /// Underlying client error.
        #[source]
        source: ClientError,
    },

    /// An expected account does not exist.
    #[error("account not found: {0}")]
    AccountNotFound(String),

    /// A transition was called from the wrong state.
    #[error("cannot {attempted} from state {state}")]
    InvalidTransition {
        /// Requested phase.
        attempted: Phase,
        /// State name at the time of the call.
        state: String,
    },

    /// No articles were given to post.
    #[error("article batch is empty")]
    EmptyBatch,
}

impl SessionError {
    /// Returns the phase a ledger-facing error belongs to, if any.
    #[must_use]
    pub fn phase(&self) -> Option<Phase> {
        match self {
            Self::SubmissionRejected { phase, .. }
            | Self::ConfirmationTimeout { phase, .. }
            | Self::Ledger { phase, .. } => Some(*phase),
            Self::InvalidTransition { attempted, .. } => Some(*attempted),
            _ => None,
        }
    }

    /// Returns true if the outcome on the ledger is unknown.
    #[must_use]
    pub const fn is_ambiguous(&self) -> bool {
        matches!(self, Self::ConfirmationTimeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::Initialize.to_string(), "initialize");
        assert_eq!(Phase::Post.to_string(), "post");
        assert_eq!(Phase::List.to_string(), "list");
    }

    #[test]
    fn test_rejected_display() {
        let err = SessionError::SubmissionRejected {
            phase: Phase::Initialize,
            reason: "already in use".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "initialize transaction rejected: already in use"
        );
        assert_eq!(err.phase(), Some(Phase::Initialize));
        assert!(!err.is_ambiguous());
    }

    #[test]
    fn test_timeout_is_ambiguous() {
        let err = SessionError::ConfirmationTimeout {
            phase: Phase::Post,
            signature: Signature::default(),
        };
        assert!(err.is_ambiguous());
        assert_eq!(err.phase(), Some(Phase::Post));
    }

    #[test]
    fn test_from_sdk_error() {
        let err: SessionError = SdkError::Encoding { value: 256, bits: 8 }.into();
        assert!(matches!(err, SessionError::Sdk(_)));
        assert_eq!(err.phase(), None);
    }
}
