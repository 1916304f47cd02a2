//! Session metrics.
//!
//! Provides atomic counters for monitoring a posting session.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Metrics for a posting session.
#[derive(Debug)]
pub struct SessionMetrics {
    /// Transactions handed to the ledger.
    transactions_submitted: AtomicU64,

    /// Transactions confirmed at the target commitment.
    transactions_confirmed: AtomicU64,

    /// Transactions refused or failed on execution.
    transactions_rejected: AtomicU64,

    /// Transactions whose confirmation wait ran out.
    transactions_timed_out: AtomicU64,

    /// Instructions carried by submitted transactions.
    instructions_submitted: AtomicU64,

    /// Articles confirmed on the ledger.
    articles_posted: AtomicU64,

    /// Status polls issued while waiting.
    status_polls: AtomicU64,

    /// Start time for elapsed calculation.
    start_time: Instant,
}

impl Default for SessionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionMetrics {
    /// Creates a new metrics instance.
    #[must_use]
    pub fn new() -> Self {
        Self {
            transactions_submitted: AtomicU64::new(0),
            transactions_confirmed: AtomicU64::new(0),
            transactions_rejected: AtomicU64::new(0),
            transactions_timed_out: AtomicU64::new(0),
            instructions_submitted: AtomicU64::new(0),
            articles_posted: AtomicU64::new(0),
            status_polls: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Records a submitted transaction.
    pub fn record_submission(&self, instruction_count: usize) {
        self.transactions_submitted.fetch_add(1, Ordering::Relaxed);
        self.instructions_submitted
            .fetch_add(instruction_count as u64, Ordering::Relaxed);
    }

    /// Records a confirmed transaction.
    pub fn record_confirmed(&self) {
        self.transactions_confirmed.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a rejected transaction.
    pub fn record_rejected(&self) {
        self.transactions_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a confirmation timeout.
    pub fn record_timeout(&self) {
        self.transactions_timed_out.fetch_add(1, Ordering::Relaxed);
    }

    /// Records confirmed articles.
    pub fn record_articles(&self, count: usize) {
        self.articles_posted
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Records a status poll.
    pub fn record_poll(&self) {
        self.status_polls.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns transactions submitted.
    #[must_use]
    pub fn transactions_submitted(&self) -> u64 {
        self.transactions_submitted.load(Ordering::Relaxed)
    }

    /// Returns transactions confirmed.
    #[must_use]
    pub fn transactions_confirmed(&self) -> u64 {
        self.transactions_confirmed.load(Ordering::Relaxed)
    }

    /// Returns transactions rejected.
    #[must_use]
    pub fn transactions_rejected(&self) -> u64 {
        self.transactions_rejected.load(Ordering::Relaxed)
    }

    /// Returns transactions timed out.
    #[must_use]
    pub fn transactions_timed_out(&self) -> u64 {
        self.transactions_timed_out.load(Ordering::Relaxed)
    }

    /// Returns instructions submitted.
    #[must_use]
    pub fn instructions_submitted(&self) -> u64 {
        self.instructions_submitted.load(Ordering::Relaxed)
    }

    /// Returns articles posted.
    #[must_use]
    pub fn articles_posted(&self) -> u64 {
        self.articles_posted.load(Ordering::Relaxed)
    }

    /// Returns status polls issued.
    #[must_use]
    pub fn status_polls(&self) -> u64 {
        self.status_polls.load(Ordering::Relaxed)
    }

    /// Returns time since the metrics were created.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Returns a snapshot of all metrics.
    #[must_use]
    pub fn snapshot(&self) -> SessionMetricsSnapshot {
        SessionMetricsSnapshot {
            transactions_submitted: self.transactions_submitted(),
            transactions_confirmed: self.transactions_confirmed(),
            transactions_rejected: self.transactions_rejected(),
            transactions_timed_out: self.transactions_timed_out(),
            instructions_submitted: self.instructions_submitted(),
            articles_posted: self.articles_posted(),
            status_polls: self.status_polls(),
            elapsed: self.elapsed(),
        }
    }
}

/// A point-in-time snapshot of session metrics.
#[derive(Debug, Clone)]
pub struct SessionMetricsSnapshot {
    /// Transactions submitted.
    pub transactions_submitted: u64,
    /// Transactions confirmed.
    pub transactions_confirmed: u64,
    /// Transactions rejected.
    pub transactions_rejected: u64,
    /// Transactions timed out.
    pub transactions_timed_out: u64,
    /// Instructions submitted.
    pub instructions_submitted: u64,
    /// Articles posted.
    pub articles_posted: u64,
    /// Status polls.
    pub status_polls: u64,
    /// Elapsed time.
    pub elapsed: Duration,
}
