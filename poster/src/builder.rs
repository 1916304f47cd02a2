//! Transaction building for the poster.
//!
//! Builds the Initialize, PostArticle and ListArticles transactions and signs
//! them with the fee payer.

use articles_sdk::{
    Article, ArticlePdas, InitializeBuilder, ListArticlesBuilder, PostArticleBuilder, SdkError,
};
use solana_sdk::{
    hash::Hash,
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
    transaction::Transaction,
};

use crate::error::SessionError;

/// Transaction builder for session phases.
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    /// Article program address.
    program_id: Pubkey,
}

/// A signed transaction ready for submission.
#[derive(Debug, Clone)]
pub struct BuiltTransaction {
    /// The signed transaction.
    pub transaction: Transaction,

    /// Number of instructions it carries.
    pub instruction_count: usize,

    /// Article accounts it writes or reads, in sequence order.
    pub articles: Vec<Pubkey>,
}

impl BuiltTransaction {
    /// Returns the fee payer's signature, which identifies the transaction.
    #[must_use]
    pub fn signature(&self) -> Signature {
        self.transaction
            .signatures
            .first()
            .copied()
            .unwrap_or_default()
    }
}

impl TransactionBuilder {
    /// Creates a new transaction builder.
    #[must_use]
    pub const fn new(program_id: Pubkey) -> Self {
        Self { program_id }
    }

    /// Returns the program ID.
    #[must_use]
    pub const fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    /// Builds the Initialize transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if derivation or signing fails.
    pub fn build_initialize(
        &self,
        payer: &Keypair,
        blockhash: Hash,
    ) -> Result<BuiltTransaction, SessionError> {
        let ix = InitializeBuilder::new(self.program_id)
            .payer(payer.pubkey())
            .build()?;

        self.sign(vec![ix], Vec::new(), payer, blockhash)
    }

    /// Builds one transaction holding a PostArticle instruction per article.
    /// Article `i` of the batch is posted under sequence number `i`.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch is empty, too large, or if encoding,
    /// derivation or signing fails.
    pub fn build_post_articles(
        &self,
        payer: &Keypair,
        batch: &[Article],
        blockhash: Hash,
    ) -> Result<BuiltTransaction, SessionError> {
        if batch.is_empty() {
            return Err(SessionError::EmptyBatch);
        }

        let count = u32::try_from(batch.len()).map_err(|_| SdkError::Encoding {
            value: batch.len() as u64,
            bits: 32,
        })?;
        let pdas = ArticlePdas::derive(&self.program_id, count)?;

        let instructions = (0..count)
            .zip(batch)
            .map(|(sequence, article)| {
                PostArticleBuilder::new(self.program_id)
                    .payer(payer.pubkey())
                    .sequence(sequence)
                    .article(article.clone())
                    .build()
            })
            .collect::<Result<Vec<Instruction>, SdkError>>()?;

        self.sign(instructions, pdas.articles, payer, blockhash)
    }

    /// Builds the ListArticles transaction over the given article accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if signing fails.
    pub fn build_list_articles(
        &self,
        payer: &Keypair,
        articles: &[Pubkey],
        blockhash: Hash,
    ) -> Result<BuiltTransaction, SessionError> {
        let ix = ListArticlesBuilder::new(self.program_id)
            .payer(payer.pubkey())
            .articles(articles.to_vec())
            .build()?;

        self.sign(vec![ix], articles.to_vec(), payer, blockhash)
    }

    /// Signs `instructions` with `fee_payer`. Fails without touching the
    /// ledger when an instruction requires a signer other than the payer.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Signing`] if the signers do not cover the
    /// message's required signatures.
    pub fn sign(
        &self,
        instructions: Vec<Instruction>,
        articles: Vec<Pubkey>,
        fee_payer: &Keypair,
        blockhash: Hash,
    ) -> Result<BuiltTransaction, SessionError> {
        let instruction_count = instructions.len();
        let mut transaction = Transaction::new_with_payer(&instructions, Some(&fee_payer.pubkey()));

        transaction
            .try_sign(&[fee_payer], blockhash)
            .map_err(|e| SessionError::Signing(e.to_string()))?;

        Ok(BuiltTransaction {
            transaction,
            instruction_count,
            articles,
        })
    }
}
