use std::io::Cursor;

use image::{DynamicImage, ImageFormat};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::slicing::protocol::{Rasterizer, SliceBroker, SliceRequest, SliceResponse, SliceTile};

/// In-process rasterizer: decodes with `image`, crops each planned tile and re-encodes as PNG.
///
/// Work runs on the blocking pool when a tokio runtime is available and inline otherwise.
#[derive(Clone, Debug)]
pub struct LocalRasterizer {
    broker: SliceBroker,
}

impl LocalRasterizer {
    /// Rasterizer that delivers its responses to `broker`.
    pub fn new(broker: SliceBroker) -> Self {
        Self { broker }
    }
}

impl Rasterizer for LocalRasterizer {
    fn submit(&self, request: SliceRequest, cancel: CancellationToken) {
        let broker = self.broker.clone();
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            broker.deliver(cut_tiles(&request));
            return;
        };

        handle.spawn(async move {
            let name = request.name.clone();
            let work = tokio::task::spawn_blocking(move || cut_tiles(&request));
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!(name = %name, "slice work abandoned by requester");
                }
                joined = work => {
                    let response = joined
                        .unwrap_or_else(|e| SliceResponse::failed(&name, format!("slice worker failed: {e}")));
                    broker.deliver(response);
                }
            }
        });
    }
}

/// Cut `request` into its planned tiles.
pub fn cut_tiles(request: &SliceRequest) -> SliceResponse {
    let source = match image::load_from_memory(&request.bytes) {
        Ok(img) => img,
        Err(e) => return SliceResponse::failed(&request.name, format!("decode failed: {e}")),
    };

    let mut slices = Vec::with_capacity(request.strategy.slices_count as usize);
    for tile in request.strategy.tiles() {
        match encode_png(&source.crop_imm(tile.x, tile.y, tile.width, tile.height)) {
            Ok(bytes) => slices.push(SliceTile {
                x: tile.x,
                y: tile.y,
                width: tile.width,
                height: tile.height,
                bytes,
            }),
            Err(e) => {
                return SliceResponse::failed(
                    &request.name,
                    format!("encode failed at ({}, {}): {e}", tile.x, tile.y),
                );
            }
        }
    }
    SliceResponse::ok(&request.name, slices)
}

fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, image::ImageError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(buf)
}
