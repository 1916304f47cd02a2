//! Articles SDK - Rust client library for the on-ledger articles program.
//!
//! This crate provides the protocol pieces a client needs to publish and
//! enumerate short text articles on Solana without a lookup table: every
//! account is a program-derived address.
//!
//! # Modules
//!
//! - [`codec`]: Fixed-width integer and length-prefixed string encoding
//! - [`instructions`]: PDA derivation and instruction builders
//! - [`types`]: [`Article`], [`ArticleIndex`], [`Commitment`]
//! - [`ledger`]: The [`Ledger`] seam and the in-memory [`MemoryLedger`]
//! - [`client`]: [`RpcLedger`], the JSON-RPC implementation
//!
//! # Example
//!
//! ```rust
//! use articles_sdk::{codec, Article};
//!
//! let article = Article::new("Hello", "Hello World!");
//! let bytes = codec::encode_article(&article).expect("encode");
//! assert_eq!(codec::decode_article(&bytes).expect("decode"), article);
//! ```

pub mod client;
pub mod codec;
pub mod error;
pub mod instructions;
pub mod ledger;
pub mod types;

pub use client::{ClientConfig, ClientError, RpcLedger};
pub use error::SdkError;
pub use instructions::{
    ArticleInstruction, ArticlePdas, InitializeBuilder, InstructionVariant, ListArticlesBuilder,
    PostArticleBuilder,
};
pub use ledger::{Ledger, MemoryLedger};
pub use types::{Article, ArticleIndex, Commitment, SignatureStatus};
