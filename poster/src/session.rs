//! Posting session.
//!
//! Drives one initialize, post, list sequence against a ledger. Each phase is
//! its own transaction and waits for confirmation before the next one starts.
//! A failed phase leaves the session in [`SessionState::Failed`]; whatever
//! already landed stays on the ledger.

use std::fmt;
use std::sync::Arc;

use articles_sdk::codec::{decode_article, decode_index};
use articles_sdk::instructions::pda::{derive_article_address, derive_index_address};
use articles_sdk::{Article, ArticleIndex, Commitment, Ledger};
use solana_sdk::{
    hash::Hash,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
};
use tracing::{debug, error, info, warn};

use super::builder::{BuiltTransaction, TransactionBuilder};
use super::error::{Phase, SessionError};
use super::metrics::SessionMetrics;
use super::submitter::{SubmitResult, SubmitterConfig, TransactionSubmitter};

/// Where a session stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing submitted yet.
    Start,
    /// The index account exists.
    Initialized,
    /// The batch of articles is confirmed.
    Posted,
    /// The listing transaction is confirmed.
    Listed,
    /// The session is closed.
    Done,
    /// A phase failed. No further transitions are accepted.
    Failed {
        /// Phase that failed.
        phase: Phase,
        /// Error message.
        reason: String,
    },
}

impl SessionState {
    /// Returns true if no further transitions are possible.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed { .. })
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::Initialized => f.write_str("initialized"),
            Self::Posted => f.write_str("posted"),
            Self::Listed => f.write_str("listed"),
            Self::Done => f.write_str("done"),
            Self::Failed { phase, reason } => write!(f, "failed during {}: {}", phase, reason),
        }
    }
}

/// Outcome of the listing phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    /// Listing transaction signature.
    pub signature: Signature,
    /// Execution log lines of the listing transaction.
    pub logs: Vec<String>,
}

/// Everything a completed session produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    /// Initialize transaction signature.
    pub initialize: Signature,
    /// PostArticle transaction signature.
    pub post: Signature,
    /// ListArticles transaction signature.
    pub list: Signature,
    /// Article accounts, in sequence order.
    pub articles: Vec<Pubkey>,
    /// Execution log lines of the listing transaction.
    pub logs: Vec<String>,
}

/// A posting session.
pub struct Session {
    /// Fee payer and only signer.
    payer: Keypair,

    /// Ledger to talk to.
    ledger: Arc<dyn Ledger>,

    /// Transaction builder.
    builder: TransactionBuilder,

    /// Transaction submitter.
    submitter: TransactionSubmitter,

    /// Metrics.
    metrics: Arc<SessionMetrics>,

    /// Current state.
    state: SessionState,

    /// Article accounts written by the post phase.
    articles: Vec<Pubkey>,
}

impl Session {
    /// Creates a new session in [`SessionState::Start`].
    #[must_use]
    pub fn new(
        ledger: Arc<dyn Ledger>,
        payer: Keypair,
        program_id: Pubkey,
        config: SubmitterConfig,
    ) -> Self {
        let metrics = Arc::new(SessionMetrics::new());

        Self {
            payer,
            builder: TransactionBuilder::new(program_id),
            submitter: TransactionSubmitter::with_metrics(
                Arc::clone(&ledger),
                config,
                Arc::clone(&metrics),
            ),
            ledger,
            metrics,
            state: SessionState::Start,
            articles: Vec::new(),
        }
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    /// Returns the payer's public key.
    #[must_use]
    pub fn payer(&self) -> Pubkey {
        self.payer.pubkey()
    }

    /// Returns the program ID.
    #[must_use]
    pub const fn program_id(&self) -> &Pubkey {
        self.builder.program_id()
    }

    /// Returns the article accounts posted so far.
    #[must_use]
    pub fn articles(&self) -> &[Pubkey] {
        &self.articles
    }

    /// Returns the metrics.
    #[must_use]
    pub fn metrics(&self) -> Arc<SessionMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Creates the index account.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidTransition`] outside
    /// [`SessionState::Start`]. Any other error moves the session to
    /// [`SessionState::Failed`].
    pub async fn initialize(&mut self) -> Result<Signature, SessionError> {
        self.expect_state(&SessionState::Start, Phase::Initialize)?;

        let result = self.submit_initialize().await;
        self.settle(Phase::Initialize, result, SessionState::Initialized)
    }

    /// Posts every article of `batch` in a single transaction. Article `i`
    /// gets sequence number `i`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidTransition`] outside
    /// [`SessionState::Initialized`] and [`SessionError::EmptyBatch`] for an
    /// empty batch, neither of which changes the state. Any other error
    /// moves the session to [`SessionState::Failed`].
    pub async fn post_articles(&mut self, batch: &[Article]) -> Result<Signature, SessionError> {
        self.expect_state(&SessionState::Initialized, Phase::Post)?;
        if batch.is_empty() {
            return Err(SessionError::EmptyBatch);
        }

        let result = self.submit_post(batch).await;
        let (signature, articles) = self.settle(Phase::Post, result, SessionState::Posted)?;

        self.metrics.record_articles(articles.len());
        self.articles = articles;
        Ok(signature)
    }

    /// Lists every posted article and returns the listing's log lines.
    ///
    /// Logs are served for confirmed transactions only, so below
    /// [`Commitment::Confirmed`] the listing is awaited up to that level
    /// before its logs are read.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidTransition`] outside
    /// [`SessionState::Posted`]. Any other error moves the session to
    /// [`SessionState::Failed`].
    pub async fn list_articles(&mut self) -> Result<Listing, SessionError> {
        self.expect_state(&SessionState::Posted, Phase::List)?;

        let result = self.submit_list().await;
        let signature = self.settle(Phase::List, result, SessionState::Listed)?;

        if self.submitter.config().commitment < Commitment::Confirmed
            && !self
                .submitter
                .wait_until(signature, Commitment::Confirmed)
                .await
                .is_confirmed()
        {
            warn!("{} not confirmed, its logs may be unavailable", signature);
        }

        let logs = match self.ledger.transaction_logs(&signature).await {
            Ok(logs) => logs,
            Err(e) => {
                warn!("could not fetch logs for {}: {}", signature, e);
                Vec::new()
            }
        };

        Ok(Listing { signature, logs })
    }

    /// Closes a listed session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidTransition`] outside
    /// [`SessionState::Listed`].
    pub fn finish(&mut self) -> Result<(), SessionError> {
        self.expect_state(&SessionState::Listed, Phase::Finish)?;
        self.state = SessionState::Done;

        let snapshot = self.metrics.snapshot();
        info!(
            "session done: {} transactions ({} instructions), {} articles in {:?}",
            snapshot.transactions_confirmed,
            snapshot.instructions_submitted,
            snapshot.articles_posted,
            snapshot.elapsed
        );
        Ok(())
    }

    /// Runs every phase in order.
    ///
    /// # Errors
    ///
    /// Returns the first phase error. An empty batch is refused before
    /// anything is submitted.
    pub async fn run(&mut self, batch: &[Article]) -> Result<SessionReport, SessionError> {
        if batch.is_empty() {
            return Err(SessionError::EmptyBatch);
        }

        let initialize = self.initialize().await?;
        let post = self.post_articles(batch).await?;
        let Listing {
            signature: list,
            logs,
        } = self.list_articles().await?;
        self.finish()?;

        Ok(SessionReport {
            initialize,
            post,
            list,
            articles: self.articles.clone(),
            logs,
        })
    }

    /// Reads and decodes the index account.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::AccountNotFound`] if the index does not exist
    /// or [`SessionError::Sdk`] if its data is malformed.
    pub async fn fetch_index(&self) -> Result<ArticleIndex, SessionError> {
        let (address, _) = derive_index_address(self.program_id())?;
        let data = self.fetch_account(&address, "index").await?;
        Ok(decode_index(&data)?)
    }

    /// Reads and decodes the article with the given sequence number.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::AccountNotFound`] if the article does not
    /// exist or [`SessionError::Sdk`] if its data is malformed.
    pub async fn fetch_article(&self, sequence: u32) -> Result<Article, SessionError> {
        let (address, _) = derive_article_address(self.program_id(), sequence)?;
        let data = self.fetch_account(&address, "article").await?;
        Ok(decode_article(&data)?)
    }

    async fn fetch_account(&self, address: &Pubkey, kind: &str) -> Result<Vec<u8>, SessionError> {
        self.ledger
            .account_data(address)
            .await
            .map_err(|source| SessionError::Ledger {
                phase: Phase::Fetch,
                source,
            })?
            .ok_or_else(|| SessionError::AccountNotFound(format!("{} {}", kind, address)))
    }

    async fn submit_initialize(&self) -> Result<Signature, SessionError> {
        let blockhash = self.blockhash(Phase::Initialize).await?;
        let tx = self.builder.build_initialize(&self.payer, blockhash)?;
        self.submit_phase(Phase::Initialize, &tx).await
    }

    async fn submit_post(&self, batch: &[Article]) -> Result<(Signature, Vec<Pubkey>), SessionError> {
        let blockhash = self.blockhash(Phase::Post).await?;
        let tx = self
            .builder
            .build_post_articles(&self.payer, batch, blockhash)?;
        let signature = self.submit_phase(Phase::Post, &tx).await?;
        Ok((signature, tx.articles))
    }

    async fn submit_list(&self) -> Result<Signature, SessionError> {
        let blockhash = self.blockhash(Phase::List).await?;
        let tx = self
            .builder
            .build_list_articles(&self.payer, &self.articles, blockhash)?;
        self.submit_phase(Phase::List, &tx).await
    }

    async fn blockhash(&self, phase: Phase) -> Result<Hash, SessionError> {
        self.ledger
            .latest_blockhash()
            .await
            .map_err(|source| SessionError::Ledger { phase, source })
    }

    async fn submit_phase(
        &self,
        phase: Phase,
        tx: &BuiltTransaction,
    ) -> Result<Signature, SessionError> {
        debug!(
            "{}: submitting {} with {} instructions",
            phase,
            tx.signature(),
            tx.instruction_count
        );

        let result = self
            .submitter
            .submit(tx)
            .await
            .map_err(|source| SessionError::Ledger { phase, source })?;

        match result {
            SubmitResult::Confirmed { signature, slot } => {
                info!("{}: {} confirmed in slot {}", phase, signature, slot);
                Ok(signature)
            }
            SubmitResult::Rejected { reason } => {
                Err(SessionError::SubmissionRejected { phase, reason })
            }
            SubmitResult::Failed { signature, reason } => Err(SessionError::SubmissionRejected {
                phase,
                reason: format!("{} failed: {}", signature, reason),
            }),
            SubmitResult::TimedOut { signature } => {
                Err(SessionError::ConfirmationTimeout { phase, signature })
            }
        }
    }

    fn expect_state(&self, expected: &SessionState, attempted: Phase) -> Result<(), SessionError> {
        if &self.state == expected {
            Ok(())
        } else {
            Err(SessionError::InvalidTransition {
                attempted,
                state: self.state.to_string(),
            })
        }
    }

    fn settle<T>(
        &mut self,
        phase: Phase,
        result: Result<T, SessionError>,
        next: SessionState,
    ) -> Result<T, SessionError> {
        match result {
            Ok(value) => {
                self.state = next;
                Ok(value)
            }
            Err(err) => {
                error!("{} failed: {}", phase, err);
                self.state = SessionState::Failed {
                    phase,
                    reason: err.to_string(),
                };
                Err(err)
            }
        }
    }
}
