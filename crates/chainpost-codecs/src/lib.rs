//! # Chainpost Codecs
//!
//! Leaf payload codecs: the trivial, pure implementations of the
//! [`Codec`](chainpost_engine::Codec) contract. Each one owns a wire type
//! tag used by directory storage:
//!
//! - [`JsonCodec`] (`"json"`) - any [`serde_json::Value`], compact
//! - [`StringCodec`] (`"string"`) - a plain string
//! - [`PixelCodec`] (`"pixel"`) - fixed tuple records, one per line
//! - [`PackedTextCodec`] (`"base2048"`) - zlib-compressed text in a dense
//!   text-safe alphabet
//!
//! All of them chunk their output at the per-line ceiling and decode from
//! the concatenation of all payload lines in chain order.

pub mod json;
pub mod packed;
pub mod pixel;
pub mod string;

pub use json::JsonCodec;
pub use packed::PackedTextCodec;
pub use pixel::{Pixel, PixelCodec};
pub use string::StringCodec;
