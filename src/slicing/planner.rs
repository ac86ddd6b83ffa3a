use serde::{Deserialize, Serialize};

/// Fraction of the host limit used for tile edges, leaving headroom for host-side rounding.
pub const DEFAULT_SAFETY_MARGIN: f64 = 0.9;

/// Tunables for [`compute_slice_strategy_with`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SliceOptions {
    /// Tile edge as a fraction of the host limit, in `(0, 1]`.
    pub safety_margin: f64,
}

impl Default for SliceOptions {
    fn default() -> Self {
        Self {
            safety_margin: DEFAULT_SAFETY_MARGIN,
        }
    }
}

impl SliceOptions {
    fn effective_margin(self) -> f64 {
        if self.safety_margin.is_finite() && self.safety_margin > 0.0 && self.safety_margin <= 1.0
        {
            self.safety_margin
        } else {
            DEFAULT_SAFETY_MARGIN
        }
    }
}

/// Which axes are cut. `Vertical` means vertical cuts (the width is split into columns).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SliceDirection {
    /// Fits as-is.
    None,
    /// Height exceeds the limit; split into rows.
    Horizontal,
    /// Width exceeds the limit; split into columns.
    Vertical,
    /// Both exceed; split into a grid.
    Both,
}

impl SliceDirection {
    fn label(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
            Self::Both => "both",
        }
    }
}

/// Tiling plan for one image. Never mutated after creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SliceStrategy {
    /// Cut direction.
    pub direction: SliceDirection,
    /// Nominal tile width; edge tiles may be narrower.
    pub tile_width: u32,
    /// Nominal tile height; edge tiles may be shorter.
    pub tile_height: u32,
    /// Column count.
    pub cols: u32,
    /// Row count.
    pub rows: u32,
    /// Number of non-empty tiles.
    pub slices_count: u32,
    /// One-line summary for logs.
    pub description: String,
    /// Source width.
    pub source_width: u32,
    /// Source height.
    pub source_height: u32,
}

/// One tile of a [`SliceStrategy`], relative to the source image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileRect {
    /// Column index.
    pub col: u32,
    /// Row index.
    pub row: u32,
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width.
    pub width: u32,
    /// Height.
    pub height: u32,
}

/// Plan tiles for a `width × height` image against a host limit of `max_tile`.
pub fn compute_slice_strategy(width: u32, height: u32, max_tile: u32) -> SliceStrategy {
    compute_slice_strategy_with(width, height, max_tile, &SliceOptions::default())
}

/// [`compute_slice_strategy`] with an explicit safety margin.
pub fn compute_slice_strategy_with(
    width: u32,
    height: u32,
    max_tile: u32,
    opts: &SliceOptions,
) -> SliceStrategy {
    let max_tile = max_tile.max(1);
    let margin_tile = ((f64::from(max_tile) * opts.effective_margin()).floor() as u32).max(1);
    let over_w = width > max_tile;
    let over_h = height > max_tile;

    let (direction, tile_width, tile_height) = match (over_w, over_h) {
        (false, false) => (SliceDirection::None, width, height),
        (true, false) => (SliceDirection::Vertical, margin_tile, height),
        (false, true) => (SliceDirection::Horizontal, width, margin_tile),
        (true, true) => (SliceDirection::Both, margin_tile, margin_tile),
    };

    let cols = span_count(width, tile_width);
    let rows = span_count(height, tile_height);
    let slices_count = if width == 0 || height == 0 {
        0
    } else {
        cols * rows
    };

    let description = match direction {
        SliceDirection::None => format!(
            "{}: {slices_count} slice ({width}x{height})",
            direction.label()
        ),
        SliceDirection::Vertical => format!(
            "{}: {cols} cols of {tile_width}x{tile_height}",
            direction.label()
        ),
        SliceDirection::Horizontal => format!(
            "{}: {rows} rows of {tile_width}x{tile_height}",
            direction.label()
        ),
        SliceDirection::Both => format!(
            "{}: {cols} cols x {rows} rows of {tile_width}x{tile_height} ({slices_count} slices)",
            direction.label()
        ),
    };

    SliceStrategy {
        direction,
        tile_width,
        tile_height,
        cols,
        rows,
        slices_count,
        description,
        source_width: width,
        source_height: height,
    }
}

fn span_count(total: u32, tile: u32) -> u32 {
    if tile == 0 {
        return 1;
    }
    total.div_ceil(tile).max(1)
}

impl SliceStrategy {
    /// Whether the image must be sliced at all.
    pub fn needs_slicing(&self) -> bool {
        self.direction != SliceDirection::None
    }

    /// Tiles in row-major order; edge tiles are clipped to the source bounds and zero-area
    /// tiles are skipped, so the result covers the source exactly once.
    pub fn tiles(&self) -> Vec<TileRect> {
        let mut out = Vec::with_capacity(self.slices_count as usize);
        for row in 0..self.rows {
            for col in 0..self.cols {
                let x = col.saturating_mul(self.tile_width);
                let y = row.saturating_mul(self.tile_height);
                let width = self.tile_width.min(self.source_width.saturating_sub(x));
                let height = self.tile_height.min(self.source_height.saturating_sub(y));
                if width == 0 || height == 0 {
                    continue;
                }
                out.push(TileRect {
                    col,
                    row,
                    x,
                    y,
                    width,
                    height,
                });
            }
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/slicing/planner.rs"]
mod tests;
