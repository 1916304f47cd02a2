//! Article type.
//!
//! An article is the unit of content posted to the ledger. Its on-chain
//! encoding is two length-prefixed UTF-8 strings, title then content.

use std::fmt;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::error::SdkError;

/// Size of each string length prefix in bytes.
pub const LENGTH_PREFIX_LEN: usize = 4;

/// A short text article.
///
/// Immutable once posted. The client enforces no size limit; the on-ledger
/// program is the authority on title and content length.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, BorshSerialize, BorshDeserialize, Serialize, Deserialize,
)]
pub struct Article {
    /// Article title.
    pub title: String,
    /// Article body.
    pub content: String,
}

impl Article {
    /// Creates a new article.
    #[must_use]
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// Creates an article from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns `SdkError::PayloadEncoding` if either field is not valid UTF-8.
    pub fn from_utf8(title: Vec<u8>, content: Vec<u8>) -> Result<Self, SdkError> {
        let title = String::from_utf8(title)
            .map_err(|e| SdkError::PayloadEncoding(format!("title: {}", e)))?;
        let content = String::from_utf8(content)
            .map_err(|e| SdkError::PayloadEncoding(format!("content: {}", e)))?;
        Ok(Self { title, content })
    }

    /// Returns the length of the encoded article in bytes.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        2 * LENGTH_PREFIX_LEN + self.title.len() + self.content.len()
    }
}

impl fmt::Display for Article {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_new() {
        let article = Article::new("Hello", "Hello World!");
        assert_eq!(article.title, "Hello");
        assert_eq!(article.content, "Hello World!");
    }

    #[test]
    fn test_article_from_utf8() {
        let article = Article::from_utf8(b"Test title".to_vec(), b"Test Content".to_vec())
            .expect("valid utf-8");
        assert_eq!(article, Article::new("Test title", "Test Content"));
    }

    #[test]
    fn test_article_from_invalid_utf8() {
        let result = Article::from_utf8(vec![0xff, 0xfe], b"body".to_vec());
        assert!(matches!(result, Err(SdkError::PayloadEncoding(_))));
    }

    #[test]
    fn test_article_encoded_len_counts_bytes() {
        // "é" is two bytes in UTF-8
        let article = Article::new("é", "");
        assert_eq!(article.encoded_len(), 10);
    }

    #[test]
    fn test_article_serde() {
        let json = r#"{"title":"Hello","content":"Hello World!"}"#;
        let article: Article = serde_json::from_str(json).expect("deserialize");
        assert_eq!(article, Article::new("Hello", "Hello World!"));
    }

    #[test]
    fn test_article_display() {
        let article = Article::new("Hello", "Hello World!");
        assert_eq!(article.to_string(), "Hello: Hello World!");
    }
}
