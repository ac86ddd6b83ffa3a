pub use kurbo::{Point, Rect, Size, Vec2};

/// Position and size of a scene node, relative to its parent container.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NodeFrame {
    /// Left edge in parent space.
    pub x: f64,
    /// Top edge in parent space.
    pub y: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl NodeFrame {
    /// Build a frame from origin and size.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Frame at the origin with the given size.
    pub fn sized(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Convert to a kurbo rectangle in parent space.
    pub fn to_rect(self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Build from a kurbo rectangle.
    pub fn from_rect(rect: Rect) -> Self {
        Self::new(rect.x0, rect.y0, rect.width(), rect.height())
    }

    /// Bottom edge in parent space.
    pub fn bottom(self) -> f64 {
        self.y + self.height
    }

    /// Right edge in parent space.
    pub fn right(self) -> f64 {
        self.x + self.width
    }

    /// Size component.
    pub fn size(self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Whether the frame covers zero area.
    pub fn is_degenerate(self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Horizontal offset that centers `content` inside `container` (never negative).
pub(crate) fn center_offset(container: f64, content: f64) -> f64 {
    ((container - content).max(0.0) * 0.5).floor()
}

/// Union of rectangles; `None` for an empty iterator.
pub(crate) fn union_bounds(rects: impl IntoIterator<Item = Rect>) -> Option<Rect> {
    rects.into_iter().reduce(|acc, r| acc.union(r))
}
