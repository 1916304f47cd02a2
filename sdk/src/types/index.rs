//! Article index state.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

/// Singleton on-chain record counting the articles posted so far.
///
/// Created once by `Initialize` and incremented by every `PostArticle`.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    BorshSerialize,
    BorshDeserialize,
    Serialize,
    Deserialize,
)]
pub struct ArticleIndex {
    /// Sequence number the next article will receive.
    pub cur_index: u32,
}

impl ArticleIndex {
    /// Size of the index account data in bytes.
    pub const LEN: usize = 4;

    /// Creates an index at the given position.
    #[must_use]
    pub const fn new(cur_index: u32) -> Self {
        Self { cur_index }
    }

    /// Returns the number of articles posted.
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.cur_index
    }

    /// Returns the index after one more article is posted, or `None` once
    /// the counter is exhausted.
    #[must_use]
    pub fn incremented(&self) -> Option<Self> {
        self.cur_index.checked_add(1).map(Self::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_default() {
        let index = ArticleIndex::default();
        assert_eq!(index.count(), 0);
    }

    #[test]
    fn test_index_incremented() {
        assert_eq!(ArticleIndex::new(2).incremented(), Some(ArticleIndex::new(3)));
        assert_eq!(ArticleIndex::new(u32::MAX).incremented(), None);
    }

    #[test]
    fn test_index_len_matches_encoding() {
        let bytes = borsh::to_vec(&ArticleIndex::new(9)).expect("serialize");
        assert_eq!(bytes.len(), ArticleIndex::LEN);
        assert_eq!(bytes, vec![9, 0, 0, 0]);
    }
}
