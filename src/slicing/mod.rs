//! Oversized-image pipeline: plan tiles, hand them to a rasterizer, reassemble the result.

/// Plan → cut → reassemble driver.
pub mod coordinator;
/// In-process rasterizer backed by the `image` crate.
pub mod local;
/// Tile planning.
pub mod planner;
/// Request/response correlation with the rasterization collaborator.
pub mod protocol;
