//! Core types for the articles SDK.
//!
//! On-chain records and the ledger status types the client works with.

pub mod article;
pub mod commitment;
pub mod index;

pub use article::Article;
pub use commitment::{Commitment, SignatureStatus};
pub use index::ArticleIndex;
