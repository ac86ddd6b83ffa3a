use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::foundation::core::NodeFrame;
use crate::foundation::diagnostics::{Diagnostic, Diagnostics};
use crate::foundation::error::{PromoError, PromoResult};
use crate::host::canvas::CanvasHost;
use crate::scene::node::{PlaceholderReason, SceneNode};
use crate::slicing::planner::{SliceOptions, compute_slice_strategy_with};
use crate::slicing::protocol::{Rasterizer, SliceBroker, SliceRequest, SliceResponse};

/// Drives one oversized image through plan → cut → reassemble.
pub struct SlicingCoordinator<'a, H, R> {
    host: &'a H,
    rasterizer: &'a R,
    broker: &'a SliceBroker,
    diagnostics: &'a Diagnostics,
    timeout: Duration,
    slice: SliceOptions,
}

impl<'a, H: CanvasHost, R: Rasterizer> SlicingCoordinator<'a, H, R> {
    /// Build a coordinator over borrowed collaborators.
    pub fn new(
        host: &'a H,
        rasterizer: &'a R,
        broker: &'a SliceBroker,
        diagnostics: &'a Diagnostics,
        timeout: Duration,
        slice: SliceOptions,
    ) -> Self {
        Self {
            host,
            rasterizer,
            broker,
            diagnostics,
            timeout,
            slice,
        }
    }

    /// Slice an image that exceeds the host limit and reassemble the tiles into one group.
    ///
    /// Timeouts and collaborator failures resolve to an oversize placeholder. The only error is
    /// [`PromoError::Assembly`], returned when no tile could be placed.
    pub async fn insert_oversized_image(
        &self,
        bytes: Arc<Vec<u8>>,
        width: u32,
        height: u32,
        name: &str,
    ) -> PromoResult<SceneNode> {
        let strategy =
            compute_slice_strategy_with(width, height, self.host.max_image_size(), &self.slice);
        info!(
            asset = name,
            width,
            height,
            strategy = %strategy.description,
            "slicing oversized image"
        );

        let key = self.broker.request_key(name);
        let mut ticket = self.broker.register(&key);
        let cancel = CancellationToken::new();
        self.rasterizer.submit(
            SliceRequest {
                bytes,
                width,
                height,
                name: key.clone(),
                tile_width: strategy.tile_width,
                tile_height: strategy.tile_height,
                strategy,
            },
            cancel.clone(),
        );

        let outcome = tokio::time::timeout(self.timeout, ticket.response()).await;
        drop(ticket);

        let response = match outcome {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => {
                warn!(asset = name, error = %err, "slice request abandoned");
                return Ok(self.rasterization_failed(name, width, height, err.to_string()));
            }
            Err(_) => {
                cancel.cancel();
                warn!(
                    asset = name,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "slicing timed out"
                );
                self.diagnostics.push(Diagnostic::SlicingTimeout {
                    asset: name.to_string(),
                });
                return Ok(oversize_placeholder(
                    name,
                    width,
                    height,
                    "slicing timed out",
                ));
            }
        };

        if !response.success {
            let reason = response
                .error
                .unwrap_or_else(|| "rasterizer reported failure".to_string());
            return Ok(self.rasterization_failed(name, width, height, reason));
        }

        self.assemble(response, width, height, name).await
    }

    async fn assemble(
        &self,
        response: SliceResponse,
        width: u32,
        height: u32,
        name: &str,
    ) -> PromoResult<SceneNode> {
        let slices = response.slices.unwrap_or_default();
        let total = slices.len();
        let mut children = Vec::with_capacity(total);
        for (i, tile) in slices.iter().enumerate() {
            match self
                .host
                .create_image(&tile.bytes, tile.width, tile.height)
                .await
            {
                Ok(image) => children.push(SceneNode::image(
                    format!("{name}/slice-{i}"),
                    image,
                    NodeFrame::new(
                        f64::from(tile.x),
                        f64::from(tile.y),
                        f64::from(tile.width),
                        f64::from(tile.height),
                    ),
                )),
                Err(err) => debug!(asset = name, slice = i, error = %err, "tile rejected by host"),
            }
        }

        if children.is_empty() {
            return Err(PromoError::assembly(format!(
                "no usable tiles for '{name}' ({total} returned)"
            )));
        }
        if children.len() < total {
            warn!(
                asset = name,
                placed = children.len(),
                total,
                "oversized image assembled with missing tiles"
            );
            self.diagnostics.push(Diagnostic::PartialAssembly {
                asset: name.to_string(),
                placed: children.len(),
                total,
            });
        }

        Ok(SceneNode::group(
            name,
            NodeFrame::sized(f64::from(width), f64::from(height)),
            children,
        ))
    }

    fn rasterization_failed(
        &self,
        name: &str,
        width: u32,
        height: u32,
        reason: String,
    ) -> SceneNode {
        warn!(asset = name, reason = %reason, "rasterization failed");
        self.diagnostics.push(Diagnostic::RasterizationFailure {
            asset: name.to_string(),
            reason,
        });
        oversize_placeholder(name, width, height, "image could not be sliced")
    }
}

fn oversize_placeholder(name: &str, width: u32, height: u32, label: &str) -> SceneNode {
    SceneNode::placeholder(
        name,
        PlaceholderReason::Oversize,
        format!("{label}: {name} ({width}x{height})"),
        NodeFrame::sized(f64::from(width), f64::from(height)),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/slicing/coordinator.rs"]
mod tests;
