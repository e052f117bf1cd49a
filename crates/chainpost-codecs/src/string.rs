//! Plain string codec.

use async_trait::async_trait;

use chainpost_core::{pack, MAX_LINE_UNITS};
use chainpost_engine::{Codec, Result};

/// Stores a string as-is, chunked at the per-line ceiling.
///
/// Lines carry no separators, so the stored string must not contain
/// newlines of its own; decode joins the chunks back by plain
/// concatenation.
pub struct StringCodec;

#[async_trait]
impl Codec for StringCodec {
    type Value = String;

    fn tag(&self) -> &'static str {
        "string"
    }

    async fn decode(&self, lines: Vec<String>) -> Result<String> {
        Ok(lines.concat())
    }

    async fn encode(&self, value: &String) -> Result<Vec<String>> {
        Ok(pack::chunk_units(value, MAX_LINE_UNITS))
    }
}
