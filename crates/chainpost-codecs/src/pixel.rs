//! Fixed tuple-record codec.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use chainpost_core::CoreError;
use chainpost_engine::{Codec, Result};

/// One cell write on a shared canvas: position, color, and the bot that
/// placed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pixel {
    pub x: i64,
    pub y: i64,
    pub color: String,
    pub bot_id: String,
}

impl Pixel {
    pub fn new(x: i64, y: i64, color: impl Into<String>, bot_id: impl Into<String>) -> Self {
        Self {
            x,
            y,
            color: color.into(),
            bot_id: bot_id.into(),
        }
    }
}

/// Stores a list of pixels, one `"{x} {y} {color} {bot_id}"` line each.
///
/// Fields are space-separated on the wire, so `color` and `bot_id` must not
/// contain whitespace; encode rejects values that would not round-trip.
pub struct PixelCodec;

#[async_trait]
impl Codec for PixelCodec {
    type Value = Vec<Pixel>;

    fn tag(&self) -> &'static str {
        "pixel"
    }

    async fn decode(&self, lines: Vec<String>) -> Result<Vec<Pixel>> {
        let mut pixels = Vec::with_capacity(lines.len());
        for line in &lines {
            let bad = || CoreError::Decode(format!("bad pixel line: {line:?}"));
            let mut parts = line.split_whitespace();
            let (Some(x), Some(y), Some(color), Some(bot_id), None) = (
                parts.next(),
                parts.next(),
                parts.next(),
                parts.next(),
                parts.next(),
            ) else {
                return Err(bad().into());
            };
            pixels.push(Pixel {
                x: x.parse().map_err(|_| bad())?,
                y: y.parse().map_err(|_| bad())?,
                color: color.to_string(),
                bot_id: bot_id.to_string(),
            });
        }
        Ok(pixels)
    }

    async fn encode(&self, pixels: &Vec<Pixel>) -> Result<Vec<String>> {
        for pixel in pixels {
            if pixel.color.chars().any(char::is_whitespace)
                || pixel.bot_id.chars().any(char::is_whitespace)
                || pixel.color.is_empty()
                || pixel.bot_id.is_empty()
            {
                return Err(CoreError::Encode(format!(
                    "pixel fields must be non-empty and whitespace-free: {pixel:?}"
                ))
                .into());
            }
        }
        Ok(pixels
            .iter()
            .map(|p| format!("{} {} {} {}", p.x, p.y, p.color, p.bot_id))
            .collect())
    }
}
