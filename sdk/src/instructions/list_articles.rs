//! ListArticles instruction builder.
//!
//! Builds the instruction that makes the program log every posted article.
//! The account list grows with the number of articles, which is acceptable
//! only while the client tracks a small set of them.

use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};

use crate::error::SdkError;

use super::initialize::SYSTEM_PROGRAM_ID;
use super::pda::{derive_article_addresses, derive_index_address};
use super::variant::ArticleInstruction;

/// Number of fixed accounts ahead of the article accounts.
pub const LEADING_ACCOUNTS: usize = 3;

/// Builder for the ListArticles instruction.
///
/// Accounts:
///
/// 0. `[signer, writable]` Payer
/// 1. `[writable]` Index PDA
/// 2. `[]` System program
/// 3.. `[]` Article PDAs, ascending sequence order
#[derive(Debug, Clone)]
pub struct ListArticlesBuilder {
    program_id: Pubkey,
    payer: Option<Pubkey>,
    articles: Vec<Pubkey>,
}

impl ListArticlesBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new(program_id: Pubkey) -> Self {
        Self {
            program_id,
            payer: None,
            articles: Vec::new(),
        }
    }

    /// Sets the payer account.
    #[must_use]
    pub fn payer(mut self, payer: Pubkey) -> Self {
        self.payer = Some(payer);
        self
    }

    /// Sets the article accounts, which must already be in ascending
    /// sequence order.
    #[must_use]
    pub fn articles(mut self, articles: Vec<Pubkey>) -> Self {
        self.articles = articles;
        self
    }

    /// Derives the article accounts for sequence numbers `0..count`.
    ///
    /// # Errors
    ///
    /// Returns an error if derivation fails.
    pub fn article_count(mut self, count: u32) -> Result<Self, SdkError> {
        self.articles = derive_article_addresses(&self.program_id, count)?;
        Ok(self)
    }

    /// Builds the instruction.
    ///
    /// # Errors
    ///
    /// Returns an error if the payer is not set or derivation fails.
    pub fn build(self) -> Result<Instruction, SdkError> {
        let payer = self
            .payer
            .ok_or_else(|| SdkError::InvalidAddress("payer not set".to_string()))?;

        let (index, _) = derive_index_address(&self.program_id)?;

        let mut accounts = Vec::with_capacity(LEADING_ACCOUNTS + self.articles.len());
        accounts.push(AccountMeta::new(payer, true));
        accounts.push(AccountMeta::new(index, false));
        accounts.push(AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false));
        accounts.extend(
            self.articles
                .into_iter()
                .map(|article| AccountMeta::new_readonly(article, false)),
        );

        Ok(Instruction {
            program_id: self.program_id,
            accounts,
            data: ArticleInstruction::ListArticles.pack()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_program_id() -> Pubkey {
        Pubkey::new_unique()
    }

    #[test]
    fn test_list_articles_builder_empty() {
        let program_id = test_program_id();
        let payer = Pubkey::new_unique();
        let (index, _) = derive_index_address(&program_id).expect("derive");

        let ix = ListArticlesBuilder::new(program_id)
            .payer(payer)
            .build()
            .expect("should build instruction");

        assert_eq!(ix.data, vec![2]);
        assert_eq!(
            ix.accounts,
            vec![
                AccountMeta::new(payer, true),
                AccountMeta::new(index, false),
                AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
            ]
        );
    }

    #[test]
    fn test_list_articles_builder_article_count() {
        let program_id = test_program_id();
        let payer = Pubkey::new_unique();
        let expected = derive_article_addresses(&program_id, 5).expect("derive");

        let ix = ListArticlesBuilder::new(program_id)
            .payer(payer)
            .article_count(5)
            .expect("derive")
            .build()
            .expect("should build instruction");

        assert_eq!(ix.accounts.len(), LEADING_ACCOUNTS + 5);
        for (meta, address) in ix.accounts[LEADING_ACCOUNTS..].iter().zip(&expected) {
            assert_eq!(meta, &AccountMeta::new_readonly(*address, false));
        }
    }

    #[test]
    fn test_list_articles_builder_explicit_articles() {
        let program_id = test_program_id();
        let articles = vec![Pubkey::new_unique(), Pubkey::new_unique()];

        let ix = ListArticlesBuilder::new(program_id)
            .payer(Pubkey::new_unique())
            .articles(articles.clone())
            .build()
            .expect("should build instruction");

        let listed: Vec<Pubkey> = ix.accounts[LEADING_ACCOUNTS..]
            .iter()
            .map(|meta| meta.pubkey)
            .collect();
        assert_eq!(listed, articles);
    }

    #[test]
    fn test_list_articles_builder_missing_payer() {
        let result = ListArticlesBuilder::new(test_program_id()).build();
        assert!(result.is_err());
    }
}
