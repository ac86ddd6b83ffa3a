use std::time::Duration;

use crate::foundation::core::Size;
use crate::slicing::planner::SliceOptions;

/// Default page width for mobile marketing designs.
pub const DEFAULT_PAGE_WIDTH: f64 = 750.0;

/// Root size used when no module produces content and there is no background.
pub const MIN_PAGE_SIZE: Size = Size::new(750.0, 1334.0);

/// Bound on one slicing round trip.
pub const DEFAULT_SLICE_TIMEOUT: Duration = Duration::from_secs(15);

/// Engine-wide knobs shared by the composer, builders and slicing pipeline.
#[derive(Clone, Debug)]
pub struct EngineOptions {
    /// Fallback page width when the configuration does not set one.
    pub page_width: f64,
    /// Root size for a prototype with no content and no background.
    pub min_page_size: Size,
    /// Bound on one slicing round trip.
    pub slice_timeout: Duration,
    /// Tile sizing parameters.
    pub slice: SliceOptions,
    /// Height of the error block that replaces a failed module.
    pub error_block_height: f64,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            page_width: DEFAULT_PAGE_WIDTH,
            min_page_size: MIN_PAGE_SIZE,
            slice_timeout: DEFAULT_SLICE_TIMEOUT,
            slice: SliceOptions::default(),
            error_block_height: 80.0,
        }
    }
}

impl EngineOptions {
    /// Override the slicing timeout.
    pub fn with_slice_timeout(mut self, timeout: Duration) -> Self {
        self.slice_timeout = timeout;
        self
    }

    /// Override the tile safety margin.
    pub fn with_safety_margin(mut self, margin: f64) -> Self {
        self.slice.safety_margin = margin;
        self
    }
}
