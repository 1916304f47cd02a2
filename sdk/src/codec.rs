//! Binary encoding for instruction payloads and account data.
//!
//! Integers are little-endian and fixed-width. Strings are a `u32`
//! little-endian byte count followed by the UTF-8 bytes, with no padding or
//! alignment; structs are their fields concatenated in declaration order.
//! This is the Borsh layout, so the struct codecs are thin wrappers over
//! `borsh`.

use borsh::BorshDeserialize;

use crate::error::SdkError;
use crate::types::{Article, ArticleIndex};

/// Encodes a single byte.
///
/// # Errors
///
/// Returns `SdkError::Encoding` if `value` exceeds `u8::MAX`.
pub fn encode_u8(value: u64) -> Result<[u8; 1], SdkError> {
    let byte = u8::try_from(value).map_err(|_| SdkError::Encoding { value, bits: 8 })?;
    Ok([byte])
}

/// Encodes a `u32` in little-endian order.
///
/// # Errors
///
/// Returns `SdkError::Encoding` if `value` exceeds `u32::MAX`.
pub fn encode_u32_le(value: u64) -> Result<[u8; 4], SdkError> {
    let word = u32::try_from(value).map_err(|_| SdkError::Encoding { value, bits: 32 })?;
    Ok(word.to_le_bytes())
}

/// Decodes a single byte.
///
/// # Errors
///
/// Returns `SdkError::MalformedAccountData` unless `data` is exactly one byte.
pub fn decode_u8(data: &[u8]) -> Result<u8, SdkError> {
    match data {
        [byte] => Ok(*byte),
        _ => Err(SdkError::MalformedAccountData(format!(
            "expected 1 byte, got {}",
            data.len()
        ))),
    }
}

/// Decodes a little-endian `u32`.
///
/// # Errors
///
/// Returns `SdkError::MalformedAccountData` unless `data` is exactly four bytes.
pub fn decode_u32_le(data: &[u8]) -> Result<u32, SdkError> {
    let bytes: [u8; 4] = data.try_into().map_err(|_| {
        SdkError::MalformedAccountData(format!("expected 4 bytes, got {}", data.len()))
    })?;
    Ok(u32::from_le_bytes(bytes))
}

/// Encodes an article as title then content, each length-prefixed.
///
/// # Errors
///
/// Returns `SdkError::PayloadEncoding` if serialization fails.
pub fn encode_article(article: &Article) -> Result<Vec<u8>, SdkError> {
    borsh::to_vec(article).map_err(|e| SdkError::PayloadEncoding(e.to_string()))
}

/// Decodes an article from account data.
///
/// # Errors
///
/// Returns `SdkError::MalformedAccountData` if a declared length runs past the
/// buffer, a field is not UTF-8, or bytes remain after the content field.
pub fn decode_article(data: &[u8]) -> Result<Article, SdkError> {
    Article::try_from_slice(data)
        .map_err(|e| SdkError::MalformedAccountData(format!("article: {}", e)))
}

/// Encodes the article index.
///
/// # Errors
///
/// Returns `SdkError::PayloadEncoding` if serialization fails.
pub fn encode_index(index: &ArticleIndex) -> Result<Vec<u8>, SdkError> {
    borsh::to_vec(index).map_err(|e| SdkError::PayloadEncoding(e.to_string()))
}

/// Decodes the article index from account data.
///
/// # Errors
///
/// Returns `SdkError::MalformedAccountData` if the data is not exactly
/// [`ArticleIndex::LEN`] bytes.
pub fn decode_index(data: &[u8]) -> Result<ArticleIndex, SdkError> {
    ArticleIndex::try_from_slice(data)
        .map_err(|e| SdkError::MalformedAccountData(format!("index: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u8_inverse() {
        for n in [0u64, 1, 127, 128, 255] {
            let encoded = encode_u8(n).expect("in range");
            assert_eq!(u64::from(decode_u8(&encoded).expect("decode")), n);
        }
    }

    #[test]
    fn test_u8_out_of_range() {
        assert_eq!(
            encode_u8(256),
            Err(SdkError::Encoding {
                value: 256,
                bits: 8
            })
        );
    }

    #[test]
    fn test_u32_inverse() {
        for n in [0u64, 1, 255, 256, 65_535, 1 << 24, u64::from(u32::MAX)] {
            let encoded = encode_u32_le(n).expect("in range");
            assert_eq!(u64::from(decode_u32_le(&encoded).expect("decode")), n);
        }
    }

    #[test]
    fn test_u32_little_endian() {
        assert_eq!(encode_u32_le(1).expect("in range"), [1, 0, 0, 0]);
        assert_eq!(encode_u32_le(0x0102_0304).expect("in range"), [4, 3, 2, 1]);
    }

    #[test]
    fn test_u32_out_of_range() {
        assert!(encode_u32_le(u64::from(u32::MAX) + 1).is_err());
    }

    #[test]
    fn test_decode_short_buffer() {
        assert!(matches!(
            decode_u32_le(&[1, 2, 3]),
            Err(SdkError::MalformedAccountData(_))
        ));
        assert!(matches!(decode_u8(&[]), Err(SdkError::MalformedAccountData(_))));
    }

    #[test]
    fn test_encode_article_layout() {
        let encoded = encode_article(&Article::new("Hello", "Hello World!")).expect("encode");

        let mut expected = vec![5, 0, 0, 0];
        expected.extend_from_slice(b"Hello");
        expected.extend_from_slice(&[12, 0, 0, 0]);
        expected.extend_from_slice(b"Hello World!");
        assert_eq!(encoded, expected);
    }

    #[test]
    fn test_encode_article_prefix_counts_bytes() {
        let encoded = encode_article(&Article::new("ü", "")).expect("encode");
        assert_eq!(&encoded[..4], &[2, 0, 0, 0]);
        assert_eq!(encoded.len(), Article::new("ü", "").encoded_len());
    }

    #[test]
    fn test_article_round_trip() {
        let articles = [
            Article::new("Hello", "Hello World!"),
            Article::new("Test title", "Test Content"),
            Article::new("", ""),
            Article::new("日本語", "emoji 🚀"),
        ];
        for article in articles {
            let encoded = encode_article(&article).expect("encode");
            assert_eq!(decode_article(&encoded).expect("decode"), article);
        }
    }

    #[test]
    fn test_decode_article_length_exceeds_buffer() {
        let mut data = vec![50, 0, 0, 0];
        data.extend_from_slice(b"short");
        assert!(matches!(
            decode_article(&data),
            Err(SdkError::MalformedAccountData(_))
        ));
    }

    #[test]
    fn test_decode_article_truncated() {
        let encoded = encode_article(&Article::new("Hello", "Hello World!")).expect("encode");
        let truncated = &encoded[..encoded.len() - 1];
        assert!(decode_article(truncated).is_err());
    }

    #[test]
    fn test_decode_article_invalid_utf8() {
        let data = vec![1, 0, 0, 0, 0xff, 0, 0, 0, 0];
        assert!(matches!(
            decode_article(&data),
            Err(SdkError::MalformedAccountData(_))
        ));
    }

    #[test]
    fn test_index_round_trip() {
        let index = ArticleIndex::new(42);
        let encoded = encode_index(&index).expect("encode");
        assert_eq!(decode_index(&encoded).expect("decode"), index);
    }

    #[test]
    fn test_decode_index_wrong_size() {
        assert!(decode_index(&[1, 0]).is_err());
        assert!(decode_index(&[1, 0, 0, 0, 0]).is_err());
    }
}
