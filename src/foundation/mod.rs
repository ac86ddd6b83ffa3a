//! Geometry, color, errors and diagnostics shared by every layer.

/// Colors and hex parsing.
pub mod color;
/// Frames and re-exported `kurbo` geometry.
pub mod core;
/// Non-fatal conditions collected during a build.
pub mod diagnostics;
/// Error type and result alias.
pub mod error;
