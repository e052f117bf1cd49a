//! JSON codec.

use async_trait::async_trait;

use chainpost_core::{pack, CoreError, MAX_LINE_UNITS};
use chainpost_engine::{Codec, Result};

/// Stores any JSON value, serialized compactly and chunked at the per-line
/// ceiling. Compact form keeps the text newline-free, so decode is plain
/// concatenation followed by one parse.
pub struct JsonCodec;

#[async_trait]
impl Codec for JsonCodec {
    type Value = serde_json::Value;

    fn tag(&self) -> &'static str {
        "json"
    }

    async fn decode(&self, lines: Vec<String>) -> Result<serde_json::Value> {
        let text = lines.concat();
        serde_json::from_str(&text)
            .map_err(|e| CoreError::Decode(format!("invalid JSON payload: {e}")).into())
    }

    async fn encode(&self, value: &serde_json::Value) -> Result<Vec<String>> {
        let text = serde_json::to_string(value)
            .map_err(|e| CoreError::Encode(format!("unserializable JSON value: {e}")))?;
        Ok(pack::chunk_units(&text, MAX_LINE_UNITS))
    }
}
