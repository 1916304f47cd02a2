//! PostArticle instruction builder.
//!
//! Builds the instruction that creates one article account. The sequence
//! number is chosen by the client and must equal the index count at the
//! moment the instruction executes, or the program rejects the article
//! address.

use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};

use crate::error::SdkError;
use crate::types::Article;

use super::initialize::SYSTEM_PROGRAM_ID;
use super::pda::{derive_article_address, derive_index_address};
use super::variant::ArticleInstruction;

/// Builder for the PostArticle instruction.
///
/// Accounts:
///
/// 0. `[signer, writable]` Payer
/// 1. `[writable]` Index PDA
/// 2. `[writable]` Article PDA for `sequence`
/// 3. `[]` System program
#[derive(Debug, Clone)]
pub struct PostArticleBuilder {
    program_id: Pubkey,
    payer: Option<Pubkey>,
    sequence: Option<u32>,
    article: Option<Article>,
}

impl PostArticleBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new(program_id: Pubkey) -> Self {
        Self {
            program_id,
            payer: None,
            sequence: None,
            article: None,
        }
    }

    /// Sets the payer account.
    #[must_use]
    pub fn payer(mut self, payer: Pubkey) -> Self {
        self.payer = Some(payer);
        self
    }

    /// Sets the article sequence number.
    #[must_use]
    pub fn sequence(mut self, sequence: u32) -> Self {
        self.sequence = Some(sequence);
        self
    }

    /// Sets the article to post.
    #[must_use]
    pub fn article(mut self, article: Article) -> Self {
        self.article = Some(article);
        self
    }

    /// Returns the derived article PDA.
    ///
    /// # Errors
    ///
    /// Returns an error if the sequence number is not set.
    pub fn get_article_address(&self) -> Result<(Pubkey, u8), SdkError> {
        let sequence = self
            .sequence
            .ok_or_else(|| SdkError::InvalidAddress("sequence not set".to_string()))?;

        derive_article_address(&self.program_id, sequence)
    }

    /// Builds the instruction.
    ///
    /// # Errors
    ///
    /// Returns an error if any required field is not set or the article
    /// cannot be encoded.
    pub fn build(self) -> Result<Instruction, SdkError> {
        let payer = self
            .payer
            .ok_or_else(|| SdkError::InvalidAddress("payer not set".to_string()))?;
        let (article_address, _) = self.get_article_address()?;
        let article = self
            .article
            .ok_or_else(|| SdkError::PayloadEncoding("article not set".to_string()))?;

        let (index, _) = derive_index_address(&self.program_id)?;

        let accounts = vec![
            AccountMeta::new(payer, true),
            AccountMeta::new(index, false),
            AccountMeta::new(article_address, false),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
        ];

        Ok(Instruction {
            program_id: self.program_id,
            accounts,
            data: ArticleInstruction::PostArticle(article).pack()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode_article;

    fn test_program_id() -> Pubkey {
        Pubkey::new_unique()
    }

    #[test]
    fn test_post_article_builder_chain() {
        let program_id = test_program_id();
        let payer = Pubkey::new_unique();
        let article = Article::new("Hello", "Hello World!");

        let builder = PostArticleBuilder::new(program_id)
            .payer(payer)
            .sequence(4)
            .article(article.clone());

        assert_eq!(builder.payer, Some(payer));
        assert_eq!(builder.sequence, Some(4));
        assert_eq!(builder.article, Some(article));
    }

    #[test]
    fn test_post_article_builder_build() {
        let program_id = test_program_id();
        let payer = Pubkey::new_unique();
        let article = Article::new("Hello", "Hello World!");
        let (index, _) = derive_index_address(&program_id).expect("derive");
        let (article_address, _) = derive_article_address(&program_id, 0).expect("derive");

        let ix = PostArticleBuilder::new(program_id)
            .payer(payer)
            .sequence(0)
            .article(article.clone())
            .build()
            .expect("should build instruction");

        assert_eq!(ix.program_id, program_id);
        assert_eq!(
            ix.accounts,
            vec![
                AccountMeta::new(payer, true),
                AccountMeta::new(index, false),
                AccountMeta::new(article_address, false),
                AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
            ]
        );

        let mut expected = vec![1u8];
        expected.extend(encode_article(&article).expect("encode"));
        assert_eq!(ix.data, expected);
    }

    #[test]
    fn test_post_article_builder_sequence_changes_address() {
        let program_id = test_program_id();
        let payer = Pubkey::new_unique();
        let article = Article::new("Hello", "Hello World!");

        let first = PostArticleBuilder::new(program_id)
            .payer(payer)
            .sequence(0)
            .article(article.clone())
            .build()
            .expect("build");
        let second = PostArticleBuilder::new(program_id)
            .payer(payer)
            .sequence(1)
            .article(article)
            .build()
            .expect("build");

        assert_ne!(first.accounts[2].pubkey, second.accounts[2].pubkey);
        assert_eq!(first.accounts[1].pubkey, second.accounts[1].pubkey);
    }

    #[test]
    fn test_post_article_builder_build_missing_article() {
        let result = PostArticleBuilder::new(test_program_id())
            .payer(Pubkey::new_unique())
            .sequence(0)
            .build();

        assert!(matches!(result, Err(SdkError::PayloadEncoding(_))));
    }

    #[test]
    fn test_post_article_builder_build_missing_sequence() {
        let result = PostArticleBuilder::new(test_program_id())
            .payer(Pubkey::new_unique())
            .article(Article::new("Hello", "Hello World!"))
            .build();

        assert!(result.is_err());
    }
}
