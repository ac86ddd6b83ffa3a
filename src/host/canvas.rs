use std::collections::HashSet;
use std::sync::Mutex;

use crate::foundation::core::Size;
use crate::foundation::error::{PromoError, PromoResult};
use crate::scene::fingerprint::content_hash;
use crate::scene::node::{ImageRef, SceneNode, TextStyle};

/// Default maximum image edge accepted by design-canvas hosts.
pub const DEFAULT_MAX_IMAGE_SIZE: u32 = 4096;

/// Capabilities the engine needs from a design-canvas host.
///
/// Node-level edits (resize, fill, position, reparent, clone) happen on [`SceneNode`] itself;
/// this trait covers what only the host can do. Implement one adapter per target host.
#[allow(async_fn_in_trait)]
pub trait CanvasHost {
    /// Largest width or height the host can create as a single image.
    fn max_image_size(&self) -> u32;

    /// Register encoded image bytes with the host.
    ///
    /// May fail even within size limits (for example on a decode error inside the host).
    async fn create_image(&self, bytes: &[u8], width: u32, height: u32) -> PromoResult<ImageRef>;

    /// Measure laid-out text. `max_width` enables wrapping.
    fn measure_text(&self, text: &str, style: &TextStyle, max_width: Option<f64>) -> Size;

    /// Hand a finished tree to the host, which owns it from then on.
    fn attach(&self, root: SceneNode) -> PromoResult<()>;
}

/// In-memory host adapter used by the CLI and tests.
///
/// Images are accepted when the bytes carry a recognizable image header and fit within
/// `max_image_size`. Text is measured with fixed per-glyph advances.
#[derive(Debug)]
pub struct MemoryHost {
    max_image_size: u32,
    check_format: bool,
    refused: Mutex<HashSet<String>>,
    created: Mutex<Vec<ImageRef>>,
    attached: Mutex<Vec<SceneNode>>,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHost {
    /// Host with [`DEFAULT_MAX_IMAGE_SIZE`] and header checks enabled.
    pub fn new() -> Self {
        Self {
            max_image_size: DEFAULT_MAX_IMAGE_SIZE,
            check_format: true,
            refused: Mutex::new(HashSet::new()),
            created: Mutex::new(Vec::new()),
            attached: Mutex::new(Vec::new()),
        }
    }

    /// Override the image size ceiling.
    pub fn with_max_image_size(mut self, max: u32) -> Self {
        self.max_image_size = max.max(1);
        self
    }

    /// Accept any non-empty bytes without checking the image header.
    pub fn accept_any_bytes(mut self) -> Self {
        self.check_format = false;
        self
    }

    /// Make the host refuse these exact bytes.
    pub fn refuse(&self, bytes: &[u8]) {
        lock(&self.refused).insert(content_hash(bytes));
    }

    /// Images created so far, in creation order.
    pub fn created_images(&self) -> Vec<ImageRef> {
        lock(&self.created).clone()
    }

    /// Trees attached so far.
    pub fn attached(&self) -> Vec<SceneNode> {
        lock(&self.attached).clone()
    }
}

impl CanvasHost for MemoryHost {
    fn max_image_size(&self) -> u32 {
        self.max_image_size
    }

    async fn create_image(&self, bytes: &[u8], width: u32, height: u32) -> PromoResult<ImageRef> {
        if bytes.is_empty() {
            return Err(PromoError::asset_creation("image bytes are empty"));
        }
        if width > self.max_image_size || height > self.max_image_size {
            return Err(PromoError::asset_creation(format!(
                "image {width}x{height} exceeds host limit {}",
                self.max_image_size
            )));
        }
        let hash = content_hash(bytes);
        if lock(&self.refused).contains(&hash) {
            return Err(PromoError::asset_creation("host refused image data"));
        }
        if self.check_format && image::guess_format(bytes).is_err() {
            return Err(PromoError::asset_creation("unrecognized image format"));
        }
        let image = ImageRef {
            hash,
            width,
            height,
        };
        lock(&self.created).push(image.clone());
        Ok(image)
    }

    fn measure_text(&self, text: &str, style: &TextStyle, max_width: Option<f64>) -> Size {
        measure_fixed_advance(text, style, max_width)
    }

    fn attach(&self, root: SceneNode) -> PromoResult<()> {
        lock(&self.attached).push(root);
        Ok(())
    }
}

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Greedy per-glyph line breaking with fixed advances: half-width for ASCII, full width otherwise.
pub(crate) fn measure_fixed_advance(text: &str, style: &TextStyle, max_width: Option<f64>) -> Size {
    let narrow = style.font_size * if style.bold { 0.6 } else { 0.55 };
    let wide = style.font_size;
    let limit = max_width.filter(|w| *w > 0.0);

    let mut lines = 0usize;
    let mut widest = 0.0f64;
    for paragraph in text.split('\n') {
        let mut line = 0.0f64;
        lines += 1;
        for ch in paragraph.chars() {
            let advance = if ch.is_ascii() { narrow } else { wide };
            if let Some(limit) = limit
                && line > 0.0
                && line + advance > limit
            {
                widest = widest.max(line);
                lines += 1;
                line = 0.0;
            }
            line += advance;
        }
        widest = widest.max(line);
    }

    Size::new(widest.ceil(), lines as f64 * style.line_height)
}

#[cfg(test)]
#[path = "../../tests/unit/host/canvas.rs"]
mod tests;
