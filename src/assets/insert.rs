use tracing::{debug, warn};

use crate::config::options::EngineOptions;
use crate::config::payload::ImagePayload;
use crate::foundation::core::NodeFrame;
use crate::foundation::diagnostics::{Diagnostic, Diagnostics};
use crate::foundation::error::PromoResult;
use crate::host::canvas::CanvasHost;
use crate::scene::node::{PlaceholderReason, SceneNode};
use crate::slicing::coordinator::SlicingCoordinator;
use crate::slicing::protocol::{Rasterizer, SliceBroker};

/// Turns image payloads into scene nodes: direct creation, slicing, or a placeholder.
pub struct AssetInsertionService<'a, H, R> {
    host: &'a H,
    slicer: SlicingCoordinator<'a, H, R>,
    diagnostics: &'a Diagnostics,
}

impl<'a, H: CanvasHost, R: Rasterizer> AssetInsertionService<'a, H, R> {
    /// Service over borrowed collaborators.
    pub fn new(
        host: &'a H,
        rasterizer: &'a R,
        broker: &'a SliceBroker,
        diagnostics: &'a Diagnostics,
        options: &EngineOptions,
    ) -> Self {
        Self {
            host,
            slicer: SlicingCoordinator::new(
                host,
                rasterizer,
                broker,
                diagnostics,
                options.slice_timeout,
                options.slice,
            ),
            diagnostics,
        }
    }

    /// The host images are created on.
    pub fn host(&self) -> &'a H {
        self.host
    }

    /// Insert `payload` as a node named `name`.
    ///
    /// Returns `Ok(None)` when the payload carries no bytes. Host refusals become a placeholder;
    /// the only error is a total slice-assembly failure.
    pub async fn insert_image(
        &self,
        payload: &ImagePayload,
        name: &str,
        default_width: u32,
        default_height: u32,
    ) -> PromoResult<Option<SceneNode>> {
        let image = match payload.normalize(default_width, default_height) {
            Ok(Some(image)) => image,
            Ok(None) => {
                debug!(asset = name, "empty image payload; nothing to insert");
                return Ok(None);
            }
            Err(err) => {
                return Ok(Some(self.refused(
                    name,
                    default_width,
                    default_height,
                    err.to_string(),
                )));
            }
        };

        let max = self.host.max_image_size();
        if image.width > max || image.height > max {
            return self
                .slicer
                .insert_oversized_image(image.bytes, image.width, image.height, name)
                .await
                .map(Some);
        }

        match self
            .host
            .create_image(&image.bytes, image.width, image.height)
            .await
        {
            Ok(handle) => Ok(Some(SceneNode::image(
                name,
                handle,
                NodeFrame::sized(f64::from(image.width), f64::from(image.height)),
            ))),
            Err(err) => Ok(Some(self.refused(
                name,
                image.width,
                image.height,
                err.to_string(),
            ))),
        }
    }

    /// [`Self::insert_image`] for an optional payload; `None` inserts nothing.
    pub async fn insert_optional(
        &self,
        payload: Option<&ImagePayload>,
        name: &str,
        default_width: u32,
        default_height: u32,
    ) -> PromoResult<Option<SceneNode>> {
        match payload {
            Some(p) => {
                self.insert_image(p, name, default_width, default_height)
                    .await
            }
            None => Ok(None),
        }
    }

    fn refused(&self, name: &str, width: u32, height: u32, reason: String) -> SceneNode {
        warn!(asset = name, reason = %reason, "image creation refused; using placeholder");
        self.diagnostics.push(Diagnostic::AssetCreationFailure {
            asset: name.to_string(),
            reason,
        });
        SceneNode::placeholder(
            name,
            PlaceholderReason::Generic,
            format!("image unavailable: {name}"),
            NodeFrame::sized(f64::from(width), f64::from(height)),
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/insert.rs"]
mod tests;
