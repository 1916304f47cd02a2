//! Instruction builders for article program transactions.
//!
//! This module provides builders for the three instructions of the article
//! program. Each builder handles PDA derivation, the account list (whose
//! order is part of the protocol), and instruction serialization.
//!
//! # Example
//!
//! ```rust
//! use articles_sdk::instructions::{PostArticleBuilder, pda};
//! use articles_sdk::types::Article;
//! use solana_sdk::pubkey::Pubkey;
//!
//! let program_id = Pubkey::new_unique();
//! let payer = Pubkey::new_unique();
//!
//! let ix = PostArticleBuilder::new(program_id)
//!     .payer(payer)
//!     .sequence(0)
//!     .article(Article::new("Hello", "Hello World!"))
//!     .build()
//!     .expect("should build instruction");
//!
//! let (article, _) = pda::derive_article_address(&program_id, 0).expect("derive");
//! assert_eq!(ix.accounts[2].pubkey, article);
//! ```

pub mod initialize;
pub mod list_articles;
pub mod pda;
pub mod post_article;
pub mod variant;

pub use initialize::{InitializeBuilder, SYSTEM_PROGRAM_ID};
pub use list_articles::{ListArticlesBuilder, LEADING_ACCOUNTS};
pub use pda::{
    derive_article_address, derive_article_addresses, derive_index_address, ArticlePdas,
};
pub use post_article::PostArticleBuilder;
pub use variant::{ArticleInstruction, InstructionVariant};
