//! The codec contract: how a payload type maps to and from chain lines.

use async_trait::async_trait;

use crate::error::Result;

/// Encode a value into ordered payload lines and decode it back.
///
/// `decode` must be a left inverse of `encode` for every value `encode` can
/// produce, and every emitted line must stay within
/// [`chainpost_core::MAX_LINE_UNITS`]. Line order is meaningful to `decode`.
///
/// Leaf codecs are pure and stateless. The trait is async because directory
/// decoding resolves and loads sub-chains from the medium.
#[async_trait]
pub trait Codec: Send + Sync {
    /// The payload type this codec carries.
    type Value: Send + Sync;

    /// The registry tag identifying this codec on the wire.
    fn tag(&self) -> &'static str;

    /// Reassemble a value from payload lines, in chain order.
    async fn decode(&self, lines: Vec<String>) -> Result<Self::Value>;

    /// Serialize a value into ordered payload lines.
    async fn encode(&self, value: &Self::Value) -> Result<Vec<String>>;
}
