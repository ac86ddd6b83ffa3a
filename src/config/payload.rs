use std::io::Cursor;
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::foundation::error::{PromoError, PromoResult};

/// Image payload as it appears in configuration documents and asset stores.
///
/// Accepts a raw byte array, a base64 string (optionally a `data:` URL) or a wrapped object
/// carrying explicit dimensions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImagePayload {
    /// Raw encoded bytes.
    Bytes(Vec<u8>),
    /// Base64 string or `data:` URL.
    Encoded(String),
    /// Encoded bytes with declared dimensions.
    Wrapped {
        /// Encoded bytes.
        data: ImageData,
        /// Declared width in pixels.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        width: Option<u32>,
        /// Declared height in pixels.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        height: Option<u32>,
    },
}

/// Byte carrier inside [`ImagePayload::Wrapped`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageData {
    /// Raw encoded bytes.
    Bytes(Vec<u8>),
    /// Base64 string or `data:` URL.
    Encoded(String),
}

/// Canonical internal image shape: encoded bytes plus pixel dimensions.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedImage {
    /// Encoded bytes (PNG, JPEG, ...).
    pub bytes: Arc<Vec<u8>>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ImagePayload {
    /// Wrap encoded bytes with explicit dimensions.
    pub fn with_size(bytes: Vec<u8>, width: u32, height: u32) -> Self {
        Self::Wrapped {
            data: ImageData::Bytes(bytes),
            width: Some(width),
            height: Some(height),
        }
    }

    /// Whether the payload carries no bytes at all.
    ///
    /// This is a presence check only; undecodable base64 still counts as present.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Bytes(b) | Self::Wrapped { data: ImageData::Bytes(b), .. } => b.is_empty(),
            Self::Encoded(s) | Self::Wrapped { data: ImageData::Encoded(s), .. } => {
                s.trim().is_empty()
            }
        }
    }

    /// Normalize into `(bytes, width, height)`.
    ///
    /// Dimension precedence: declared dimensions, then dimensions read from the encoded
    /// header, then `default_width`/`default_height`. Returns `Ok(None)` when there are no bytes.
    pub fn normalize(
        &self,
        default_width: u32,
        default_height: u32,
    ) -> PromoResult<Option<NormalizedImage>> {
        let (bytes, declared_w, declared_h) = match self {
            Self::Bytes(b) => (b.clone(), None, None),
            Self::Encoded(s) => (decode_base64(s)?, None, None),
            Self::Wrapped {
                data,
                width,
                height,
            } => {
                let bytes = match data {
                    ImageData::Bytes(b) => b.clone(),
                    ImageData::Encoded(s) => decode_base64(s)?,
                };
                (bytes, *width, *height)
            }
        };
        if bytes.is_empty() {
            return Ok(None);
        }

        let (width, height) = match (declared_w, declared_h) {
            (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
            _ => sniff_dimensions(&bytes).unwrap_or((default_width, default_height)),
        };

        Ok(Some(NormalizedImage {
            bytes: Arc::new(bytes),
            width,
            height,
        }))
    }
}

/// `true` when an optional payload is present and non-empty.
pub(crate) fn has_image(payload: &Option<ImagePayload>) -> bool {
    payload.as_ref().is_some_and(|p| !p.is_empty())
}

fn decode_base64(s: &str) -> PromoResult<Vec<u8>> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(Vec::new());
    }
    let body = match s.strip_prefix("data:") {
        Some(rest) => rest
            .split_once(',')
            .map(|(_, b)| b)
            .ok_or_else(|| PromoError::validation("data URL is missing ',' separator"))?,
        None => s,
    };
    STANDARD
        .decode(body.trim())
        .map_err(|e| PromoError::validation(format!("invalid base64 image payload: {e}")))
}

/// Read dimensions from the encoded header without decoding pixels.
fn sniff_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
        .filter(|(w, h)| *w > 0 && *h > 0)
}

#[cfg(test)]
#[path = "../../tests/unit/config/payload.rs"]
mod tests;
