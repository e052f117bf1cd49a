//! Compressed-text codec: zlib then base2048.
//!
//! The text is losslessly compressed and the compressed bytes are encoded
//! into the dense base2048 alphabet, chunked at the per-line ceiling.
//! Symbols can span line and record boundaries, so decode must see the
//! concatenation of every line of every record before inverting the
//! transform - unlike the other codecs, no single line decodes on its own.

use std::io::{Read, Write};

use async_trait::async_trait;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use chainpost_core::{pack, CoreError, MAX_LINE_UNITS};
use chainpost_engine::{Codec, Result};

/// Stores a string compressed and re-encoded into text-safe symbols.
///
/// Worth it for large, repetitive payloads; for short strings the
/// compression overhead usually loses to [`StringCodec`].
pub struct PackedTextCodec;

#[async_trait]
impl Codec for PackedTextCodec {
    type Value = String;

    fn tag(&self) -> &'static str {
        "base2048"
    }

    async fn decode(&self, lines: Vec<String>) -> Result<String> {
        let symbols = lines.concat();
        let compressed = base2048::decode(&symbols)
            .ok_or_else(|| CoreError::Decode("invalid base2048 payload".to_string()))?;
        let mut text = String::new();
        ZlibDecoder::new(compressed.as_slice())
            .read_to_string(&mut text)
            .map_err(|e| CoreError::Decode(format!("invalid zlib payload: {e}")))?;
        Ok(text)
    }

    async fn encode(&self, value: &String) -> Result<Vec<String>> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(value.as_bytes())
            .and_then(|_| encoder.finish())
            .map(|compressed| pack::chunk_units(&base2048::encode(&compressed), MAX_LINE_UNITS))
            .map_err(|e| CoreError::Encode(format!("compression failed: {e}")).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[tokio::test]
    async fn test_round_trip() {
        let value = "hello, packed world".to_string();
        let lines = PackedTextCodec.encode(&value).await.unwrap();
        assert_eq!(PackedTextCodec.decode(lines).await.unwrap(), value);
    }

    #[tokio::test]
    async fn test_empty_string() {
        let value = String::new();
        let lines = PackedTextCodec.encode(&value).await.unwrap();
        assert_eq!(PackedTextCodec.decode(lines).await.unwrap(), value);
    }

    #[tokio::test]
    async fn test_repetitive_text_compresses_well() {
        let value = "the same sentence over and over. ".repeat(2000);
        let lines = PackedTextCodec.encode(&value).await.unwrap();
        let stored: usize = lines.iter().map(|l| l.chars().count()).sum();
        assert!(stored < value.chars().count() / 10);
        assert_eq!(PackedTextCodec.decode(lines).await.unwrap(), value);
    }

    #[tokio::test]
    async fn test_symbols_split_across_lines_still_decode() {
        // Force multiple lines, then re-split them at awkward boundaries.
        let value = format!("{:?}", (0..4000).collect::<Vec<_>>());
        let lines = PackedTextCodec.encode(&value).await.unwrap();
        assert!(lines.len() > 1);

        let resplit = pack::chunk_units(&lines.concat(), 7);
        assert_eq!(PackedTextCodec.decode(resplit).await.unwrap(), value);
    }

    #[tokio::test]
    async fn test_garbage_fails_cleanly() {
        assert!(PackedTextCodec
            .decode(vec!["definitely not base2048 \u{1}".to_string()])
            .await
            .is_err());
    }

    proptest! {
        #[test]
        fn prop_round_trip(value in chainpost_testkit::generators::payload_text()) {
            let rt = tokio::runtime::Builder::new_current_thread()
                .build()
                .unwrap();
            rt.block_on(async {
                let lines = PackedTextCodec.encode(&value).await.unwrap();
                let decoded = PackedTextCodec.decode(lines).await.unwrap();
                prop_assert_eq!(decoded.as_str(), value.as_str());
                Ok(())
            })?;
        }
    }
}
