//! Transaction submission for the poster.
//!
//! Sends a transaction once and tracks it until it reaches the target
//! commitment, fails, or the confirmation deadline passes. Nothing is
//! resubmitted.

use std::sync::Arc;
use std::time::Duration;

use articles_sdk::{ClientError, Commitment, Ledger};
use solana_sdk::signature::Signature;
use tracing::{debug, warn};

use super::builder::BuiltTransaction;
use super::metrics::SessionMetrics;

/// Configuration for the transaction submitter.
#[derive(Debug, Clone)]
pub struct SubmitterConfig {
    /// Commitment level a transaction must reach.
    pub commitment: Commitment,

    /// How long to wait for confirmation.
    pub confirmation_timeout: Duration,

    /// Delay between status polls.
    pub poll_interval: Duration,
}

impl Default for SubmitterConfig {
    fn default() -> Self {
        Self {
            commitment: Commitment::Confirmed,
            confirmation_timeout: Duration::from_secs(60),
            poll_interval: Duration::from_millis(500),
        }
    }
}

/// Result of a transaction submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitResult {
    /// Transaction confirmed successfully.
    Confirmed {
        /// Transaction signature.
        signature: Signature,
        /// Slot confirmed.
        slot: u64,
    },

    /// The ledger refused the transaction outright.
    Rejected {
        /// Reason given by the ledger.
        reason: String,
    },

    /// Transaction landed but its execution failed.
    Failed {
        /// Transaction signature.
        signature: Signature,
        /// Error message.
        reason: String,
    },

    /// Transaction not confirmed in time; outcome unknown.
    TimedOut {
        /// Transaction signature.
        signature: Signature,
    },
}

impl SubmitResult {
    /// Returns true if the transaction was confirmed.
    #[must_use]
    pub const fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed { .. })
    }

    /// Returns the signature if the ledger accepted the transaction.
    #[must_use]
    pub const fn signature(&self) -> Option<&Signature> {
        match self {
            Self::Confirmed { signature, .. }
            | Self::Failed { signature, .. }
            | Self::TimedOut { signature } => Some(signature),
            Self::Rejected { .. } => None,
        }
    }
}

/// Transaction submitter for the poster.
pub struct TransactionSubmitter {
    /// Ledger to submit to.
    ledger: Arc<dyn Ledger>,

    /// Configuration.
    config: SubmitterConfig,

    /// Metrics.
    metrics: Arc<SessionMetrics>,
}

impl TransactionSubmitter {
    /// Creates a submitter reporting into `metrics`.
    #[must_use]
    pub fn with_metrics(
        ledger: Arc<dyn Ledger>,
        config: SubmitterConfig,
        metrics: Arc<SessionMetrics>,
    ) -> Self {
        Self {
            ledger,
            config,
            metrics,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &SubmitterConfig {
        &self.config
    }

    /// Submits a transaction and waits for its confirmation.
    ///
    /// When the submission request times out or fails on the server side,
    /// the transaction may still have landed: its signature is polled like
    /// any other and reported as [`SubmitResult::TimedOut`] if it never
    /// shows up.
    ///
    /// # Errors
    ///
    /// Returns an error only if the submission request failed before
    /// reaching the ledger. Ledger refusals and execution failures are
    /// reported through [`SubmitResult`].
    pub async fn submit(&self, tx: &BuiltTransaction) -> Result<SubmitResult, ClientError> {
        let signature = match self.ledger.submit(&tx.transaction).await {
            Ok(signature) => signature,
            Err(ClientError::Rejected(reason)) => {
                self.metrics.record_rejected();
                return Ok(SubmitResult::Rejected { reason });
            }
            Err(e) if e.is_indeterminate() => {
                warn!("submission of {} unanswered: {}", tx.signature(), e);
                tx.signature()
            }
            Err(e) => return Err(e),
        };

        self.metrics.record_submission(tx.instruction_count);
        debug!(
            "submitted {} ({} instructions)",
            signature, tx.instruction_count
        );

        let result = self.wait_for_confirmation(signature).await;
        match &result {
            SubmitResult::Confirmed { .. } => self.metrics.record_confirmed(),
            SubmitResult::Rejected { .. } | SubmitResult::Failed { .. } => {
                self.metrics.record_rejected();
            }
            SubmitResult::TimedOut { .. } => self.metrics.record_timeout(),
        }

        Ok(result)
    }

    /// Waits for a submitted transaction to reach the configured commitment.
    pub async fn wait_for_confirmation(&self, signature: Signature) -> SubmitResult {
        self.wait_until(signature, self.config.commitment).await
    }

    /// Waits for a submitted transaction to reach `level`, bounded by the
    /// confirmation timeout.
    pub async fn wait_until(&self, signature: Signature, level: Commitment) -> SubmitResult {
        match tokio::time::timeout(
            self.config.confirmation_timeout,
            self.poll_status(signature, level),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    "{} not {} after {:?}",
                    signature, level, self.config.confirmation_timeout
                );
                SubmitResult::TimedOut { signature }
            }
        }
    }

    /// Polls the signature status until it settles. Poll errors are logged
    /// and polling continues.
    async fn poll_status(&self, signature: Signature, level: Commitment) -> SubmitResult {
        loop {
            self.metrics.record_poll();

            match self.ledger.signature_status(&signature).await {
                Ok(Some(status)) => {
                    if let Some(reason) = status.err {
                        return SubmitResult::Failed { signature, reason };
                    }
                    if status.satisfies(level) {
                        return SubmitResult::Confirmed {
                            signature,
                            slot: status.slot,
                        };
                    }
                    debug!("{} at {:?}, waiting", signature, status.confirmation);
                }
                Ok(None) => debug!("{} not yet visible", signature),
                Err(e) => warn!("status poll for {} failed: {}", signature, e),
            }

            tokio::time::sleep(self.config.poll_interval).await;
        }
    }
}
