//! Articles Poster - drives a posting session against the articles program.
//!
//! A session creates the index account, posts a batch of articles in one
//! transaction, then lists them all, waiting for each transaction to be
//! confirmed before moving on.
//!
//! # Components
//!
//! - [`config`]: Poster configuration
//! - [`keypair`]: Signer loading
//! - [`builder`]: Transaction building
//! - [`submitter`]: Transaction submission and confirmation
//! - [`session`]: The session state machine
//! - [`metrics`]: Session metrics
//! - [`error`]: Session errors

pub mod builder;
pub mod config;
pub mod error;
pub mod keypair;
pub mod metrics;
pub mod session;
pub mod submitter;

pub use builder::{BuiltTransaction, TransactionBuilder};
pub use config::{ConfigError, PosterConfig};
pub use error::{Phase, SessionError};
pub use keypair::load_keypair;
pub use metrics::SessionMetrics;
pub use session::{Listing, Session, SessionReport, SessionState};
pub use submitter::{SubmitResult, SubmitterConfig, TransactionSubmitter};
