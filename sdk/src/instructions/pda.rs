//! PDA derivation utilities for article accounts.
//!
//! Provides functions to derive Program Derived Addresses (PDAs) for the
//! index account and each article account. Derivation is pure: the same
//! seeds and program id always give the same address, and no private key
//! exists for it.

use solana_sdk::pubkey::Pubkey;

use crate::codec::encode_u32_le;
use crate::error::SdkError;

/// Seed for the index PDA.
pub const INDEX_SEED: &[u8] = b"INDEX_PDA";

/// Namespace seed for article PDAs.
pub const ARTICLE_SEED: &[u8] = b"ARTICLE_PDA";

/// Derives a PDA from a namespace tag and an optional suffix.
///
/// # Errors
///
/// Returns `SdkError::Derivation` if no bump seed yields an off-curve address.
pub fn derive(
    program_id: &Pubkey,
    namespace: &[u8],
    suffix: Option<&[u8]>,
) -> Result<(Pubkey, u8), SdkError> {
    let found = match suffix {
        Some(suffix) => Pubkey::try_find_program_address(&[namespace, suffix], program_id),
        None => Pubkey::try_find_program_address(&[namespace], program_id),
    };

    found.ok_or_else(|| {
        SdkError::Derivation(format!(
            "no program address for namespace {:?}",
            String::from_utf8_lossy(namespace)
        ))
    })
}

/// Derives the index PDA.
///
/// Seeds: `[b"INDEX_PDA"]`
///
/// # Errors
///
/// Returns `SdkError::Derivation` if derivation fails.
pub fn derive_index_address(program_id: &Pubkey) -> Result<(Pubkey, u8), SdkError> {
    derive(program_id, INDEX_SEED, None)
}

/// Derives the PDA of the article with the given sequence number.
///
/// Seeds: `[b"ARTICLE_PDA", sequence.to_le_bytes()]`
///
/// # Errors
///
/// Returns `SdkError::Derivation` if derivation fails.
pub fn derive_article_address(
    program_id: &Pubkey,
    sequence: u32,
) -> Result<(Pubkey, u8), SdkError> {
    let suffix = encode_u32_le(u64::from(sequence))?;
    derive(program_id, ARTICLE_SEED, Some(&suffix))
}

/// Derives the PDAs of articles `0..count`, in ascending sequence order.
///
/// # Errors
///
/// Returns `SdkError::Derivation` if any derivation fails.
pub fn derive_article_addresses(program_id: &Pubkey, count: u32) -> Result<Vec<Pubkey>, SdkError> {
    (0..count)
        .map(|sequence| derive_article_address(program_id, sequence).map(|(address, _)| address))
        .collect()
}

/// Index PDA together with the article PDAs of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticlePdas {
    /// Index address.
    pub index: Pubkey,
    /// Index bump.
    pub index_bump: u8,
    /// Article addresses, position `i` holding sequence number `i`.
    pub articles: Vec<Pubkey>,
}

impl ArticlePdas {
    /// Derives the index PDA and the PDAs of articles `0..count`.
    ///
    /// # Errors
    ///
    /// Returns `SdkError::Derivation` if any derivation fails.
    pub fn derive(program_id: &Pubkey, count: u32) -> Result<Self, SdkError> {
        let (index, index_bump) = derive_index_address(program_id)?;
        let articles = derive_article_addresses(program_id, count)?;

        Ok(Self {
            index,
            index_bump,
            articles,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn test_program_id() -> Pubkey {
        Pubkey::new_unique()
    }

    #[test]
    fn test_derive_index_address() {
        let program_id = test_program_id();

        let (index, bump) = derive_index_address(&program_id).expect("derive");
        assert_ne!(index, Pubkey::default());

        // Same inputs should give same output
        let (index2, bump2) = derive_index_address(&program_id).expect("derive");
        assert_eq!(index, index2);
        assert_eq!(bump, bump2);
    }

    #[test]
    fn test_derive_index_matches_raw_seeds() {
        let program_id = test_program_id();

        let (index, _) = derive_index_address(&program_id).expect("derive");
        let (expected, _) = Pubkey::find_program_address(&[b"INDEX_PDA".as_ref()], &program_id);
        assert_eq!(index, expected);
    }

    #[test]
    fn test_derive_article_matches_raw_seeds() {
        let program_id = test_program_id();

        let (article, _) = derive_article_address(&program_id, 1).expect("derive");
        let (expected, _) =
            Pubkey::find_program_address(&[b"ARTICLE_PDA".as_ref(), &1u32.to_le_bytes()], &program_id);
        assert_eq!(article, expected);
    }

    #[test]
    fn test_derive_article_addresses_distinct() {
        let program_id = test_program_id();
        let (index, _) = derive_index_address(&program_id).expect("derive");

        let articles = derive_article_addresses(&program_id, 64).expect("derive");
        assert_eq!(articles.len(), 64);

        let unique: HashSet<_> = articles.iter().collect();
        assert_eq!(unique.len(), articles.len());
        assert!(!articles.contains(&index));
    }

    #[test]
    fn test_derive_depends_on_program_id() {
        let (a, _) = derive_article_address(&test_program_id(), 0).expect("derive");
        let (b, _) = derive_article_address(&test_program_id(), 0).expect("derive");
        assert_ne!(a, b);
    }

    #[test]
    fn test_article_pdas_derive() {
        let program_id = test_program_id();

        let pdas = ArticlePdas::derive(&program_id, 3).expect("derive");
        assert_eq!(pdas.articles.len(), 3);
        assert_eq!(pdas.index, derive_index_address(&program_id).expect("derive").0);
        assert_eq!(
            pdas.articles[2],
            derive_article_address(&program_id, 2).expect("derive").0
        );
    }

    #[test]
    fn test_article_pdas_empty() {
        let pdas = ArticlePdas::derive(&test_program_id(), 0).expect("derive");
        assert!(pdas.articles.is_empty());
    }
}
