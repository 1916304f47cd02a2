//! Instruction variants and their wire encoding.
//!
//! Instruction data is a one-byte discriminant followed by the variant's
//! payload, so the program can dispatch on the first byte before decoding
//! anything else.

use std::fmt;

use borsh::BorshDeserialize;

use crate::codec::{encode_article, encode_u8};
use crate::error::SdkError;
use crate::types::Article;

/// Discriminant of an article program instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstructionVariant {
    /// Creates the index account.
    Initialize,
    /// Creates one article account and bumps the index.
    PostArticle,
    /// Logs every posted article.
    ListArticles,
}

impl From<InstructionVariant> for u8 {
    fn from(variant: InstructionVariant) -> Self {
        match variant {
            InstructionVariant::Initialize => 0,
            InstructionVariant::PostArticle => 1,
            InstructionVariant::ListArticles => 2,
        }
    }
}

impl TryFrom<u8> for InstructionVariant {
    type Error = SdkError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Initialize),
            1 => Ok(Self::PostArticle),
            2 => Ok(Self::ListArticles),
            _ => Err(SdkError::UnknownVariant(value)),
        }
    }
}

impl fmt::Display for InstructionVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initialize => write!(f, "initialize"),
            Self::PostArticle => write!(f, "post_article"),
            Self::ListArticles => write!(f, "list_articles"),
        }
    }
}

/// A decoded article program instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleInstruction {
    /// Create the index account.
    Initialize,
    /// Post one article.
    PostArticle(Article),
    /// List all posted articles.
    ListArticles,
}

impl ArticleInstruction {
    /// Returns the variant of this instruction.
    #[must_use]
    pub const fn variant(&self) -> InstructionVariant {
        match self {
            Self::Initialize => InstructionVariant::Initialize,
            Self::PostArticle(_) => InstructionVariant::PostArticle,
            Self::ListArticles => InstructionVariant::ListArticles,
        }
    }

    /// Encodes the instruction as discriminant then payload.
    ///
    /// # Errors
    ///
    /// Returns `SdkError::Encoding` if the discriminant does not fit a byte
    /// and `SdkError::PayloadEncoding` if the article cannot be encoded.
    pub fn pack(&self) -> Result<Vec<u8>, SdkError> {
        let mut data = encode_u8(u64::from(u8::from(self.variant())))?.to_vec();
        if let Self::PostArticle(article) = self {
            data.extend(encode_article(article)?);
        }
        Ok(data)
    }

    /// Decodes instruction data.
    ///
    /// Trailing bytes after a payload-less variant are ignored, as the
    /// program never reads them.
    ///
    /// # Errors
    ///
    /// Returns `SdkError::UnknownVariant` for an unknown discriminant and
    /// `SdkError::PayloadEncoding` for empty data or an undecodable article.
    pub fn unpack(data: &[u8]) -> Result<Self, SdkError> {
        let (&tag, payload) = data
            .split_first()
            .ok_or_else(|| SdkError::PayloadEncoding("empty instruction data".to_string()))?;

        match InstructionVariant::try_from(tag)? {
            InstructionVariant::Initialize => Ok(Self::Initialize),
            InstructionVariant::PostArticle => Article::try_from_slice(payload)
                .map(Self::PostArticle)
                .map_err(|e| SdkError::PayloadEncoding(e.to_string())),
            InstructionVariant::ListArticles => Ok(Self::ListArticles),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_discriminants() {
        assert_eq!(u8::from(InstructionVariant::Initialize), 0);
        assert_eq!(u8::from(InstructionVariant::PostArticle), 1);
        assert_eq!(u8::from(InstructionVariant::ListArticles), 2);
    }

    #[test]
    fn test_variant_try_from() {
        for tag in 0u8..=2 {
            let variant = InstructionVariant::try_from(tag).expect("known");
            assert_eq!(u8::from(variant), tag);
        }
    }

    #[test]
    fn test_variant_unknown() {
        assert_eq!(
            InstructionVariant::try_from(3),
            Err(SdkError::UnknownVariant(3))
        );
        assert_eq!(
            InstructionVariant::try_from(255),
            Err(SdkError::UnknownVariant(255))
        );
    }

    #[test]
    fn test_pack_payload_less() {
        assert_eq!(ArticleInstruction::Initialize.pack().expect("pack"), vec![0]);
        assert_eq!(ArticleInstruction::ListArticles.pack().expect("pack"), vec![2]);
    }

    #[test]
    fn test_pack_discriminant_matches_codec() {
        for ix in [
            ArticleInstruction::Initialize,
            ArticleInstruction::PostArticle(Article::new("t", "c")),
            ArticleInstruction::ListArticles,
        ] {
            let data = ix.pack().expect("pack");
            let tag = encode_u8(u64::from(u8::from(ix.variant()))).expect("encode");
            assert_eq!(&data[..1], tag.as_slice());
        }
    }

    #[test]
    fn test_pack_post_article() {
        let article = Article::new("Hello", "Hello World!");
        let data = ArticleInstruction::PostArticle(article.clone())
            .pack()
            .expect("pack");

        assert_eq!(data[0], 1);
        assert_eq!(&data[1..], encode_article(&article).expect("encode").as_slice());
    }

    #[test]
    fn test_unpack_post_article() {
        let ix = ArticleInstruction::PostArticle(Article::new("Test title", "Test Content"));
        let data = ix.pack().expect("pack");
        assert_eq!(ArticleInstruction::unpack(&data).expect("unpack"), ix);
    }

    #[test]
    fn test_unpack_unknown_variant() {
        assert_eq!(
            ArticleInstruction::unpack(&[9]),
            Err(SdkError::UnknownVariant(9))
        );
    }

    #[test]
    fn test_unpack_empty() {
        assert!(ArticleInstruction::unpack(&[]).is_err());
    }

    #[test]
    fn test_unpack_truncated_article() {
        assert!(ArticleInstruction::unpack(&[1, 5, 0, 0, 0, b'H']).is_err());
    }
}
