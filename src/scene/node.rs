use serde::Serialize;

use crate::foundation::color::Color;
use crate::foundation::core::{NodeFrame, Rect, union_bounds};

/// Stable node identifier, unique within one tree.
///
/// Identifiers are assigned in depth-first order when a tree is assembled, so two builds of the
/// same configuration produce the same ids.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub(crate) u64);

impl NodeId {
    /// Raw numeric value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Horizontal text alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TextAlign {
    /// Left aligned.
    #[default]
    Left,
    /// Centered.
    Center,
    /// Right aligned.
    Right,
}

/// Text styling consumed by the host's text measurement.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    /// Font size in pixels.
    pub font_size: f64,
    /// Line height in pixels.
    pub line_height: f64,
    /// Bold weight.
    pub bold: bool,
    /// Text color.
    pub color: Color,
    /// Horizontal alignment.
    pub align: TextAlign,
}

impl TextStyle {
    /// Regular style with a 1.4 line-height ratio.
    pub fn regular(font_size: f64, color: Color) -> Self {
        Self {
            font_size,
            line_height: (font_size * 1.4).round(),
            bold: false,
            color,
            align: TextAlign::Left,
        }
    }

    /// Bold variant.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Alignment variant.
    pub fn aligned(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }
}

/// Handle to an image the host has accepted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRef {
    /// Host content hash of the encoded bytes.
    pub hash: String,
    /// Pixel width.
    pub width: u32,
    /// Pixel height.
    pub height: u32,
}

/// Why a placeholder stands in for an image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PlaceholderReason {
    /// The image exceeded host limits and could not be sliced.
    Oversize,
    /// The host refused the image for another reason.
    Generic,
}

impl PlaceholderReason {
    /// Diagnostic fill; the two categories are visually distinct.
    pub fn fill(self) -> Color {
        match self {
            Self::Oversize => Color::rgba(1.0, 0.69, 0.13, 0.35),
            Self::Generic => Color::rgba(0.6, 0.6, 0.6, 0.35),
        }
    }
}

/// Closed set of node kinds.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NodeKind {
    /// Container frame.
    #[serde(rename_all = "camelCase")]
    Frame {
        /// Solid fill, if any.
        fill: Option<Color>,
        /// Whether children are clipped to the frame bounds.
        clips_content: bool,
    },
    /// Text run.
    Text {
        /// Characters.
        content: String,
        /// Style.
        style: TextStyle,
    },
    /// Image-backed rectangle.
    Image {
        /// Host image handle.
        image: ImageRef,
    },
    /// Grouping node without own paint.
    Group,
    /// Labeled stand-in for an image the host could not create.
    Placeholder {
        /// Failure category.
        reason: PlaceholderReason,
        /// Visible label.
        label: String,
    },
    /// Visible marker for a module whose builder failed.
    ErrorBlock {
        /// Module id.
        module: String,
        /// Error text.
        message: String,
    },
}

/// A positioned element of the output design tree.
///
/// `frame` is relative to the nearest container ancestor. Children are owned exclusively;
/// `clone()` produces an independent deep copy.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SceneNode {
    /// Stable identifier.
    pub id: NodeId,
    /// Node name; module frames are named after their module kind.
    pub name: String,
    /// Geometry relative to the parent.
    pub frame: NodeFrame,
    /// Kind-specific payload.
    #[serde(flatten)]
    pub kind: NodeKind,
    /// Children in paint order (first is bottom-most).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    fn new(name: impl Into<String>, frame: NodeFrame, kind: NodeKind) -> Self {
        Self {
            id: NodeId::default(),
            name: name.into(),
            frame,
            kind,
            children: Vec::new(),
        }
    }

    /// Container frame without fill.
    pub fn frame(name: impl Into<String>, frame: NodeFrame) -> Self {
        Self::new(
            name,
            frame,
            NodeKind::Frame {
                fill: None,
                clips_content: false,
            },
        )
    }

    /// Text node.
    pub fn text(
        name: impl Into<String>,
        content: impl Into<String>,
        style: TextStyle,
        frame: NodeFrame,
    ) -> Self {
        Self::new(
            name,
            frame,
            NodeKind::Text {
                content: content.into(),
                style,
            },
        )
    }

    /// Image-backed rectangle.
    pub fn image(name: impl Into<String>, image: ImageRef, frame: NodeFrame) -> Self {
        Self::new(name, frame, NodeKind::Image { image })
    }

    /// Group holding `children`.
    pub fn group(name: impl Into<String>, frame: NodeFrame, children: Vec<SceneNode>) -> Self {
        let mut g = Self::new(name, frame, NodeKind::Group);
        g.children = children;
        g
    }

    /// Placeholder sized like the image it replaces.
    pub fn placeholder(
        name: impl Into<String>,
        reason: PlaceholderReason,
        label: impl Into<String>,
        frame: NodeFrame,
    ) -> Self {
        Self::new(
            name,
            frame,
            NodeKind::Placeholder {
                reason,
                label: label.into(),
            },
        )
    }

    /// Error block standing in for a failed module.
    pub fn error_block(
        module_name: impl Into<String>,
        module_id: impl Into<String>,
        message: impl Into<String>,
        frame: NodeFrame,
    ) -> Self {
        Self::new(
            module_name,
            frame,
            NodeKind::ErrorBlock {
                module: module_id.into(),
                message: message.into(),
            },
        )
    }

    /// Builder-style fill setter.
    pub fn with_fill(mut self, color: Option<Color>) -> Self {
        self.set_fill(color);
        self
    }

    /// Builder-style child append.
    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.append_child(child);
        self
    }

    /// Resize without moving the origin.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.frame.width = width.max(0.0);
        self.frame.height = height.max(0.0);
    }

    /// Resize to `width × height`, scaling descendant geometry by the same factors.
    ///
    /// Degenerate nodes are resized without touching their children.
    pub fn scale_to(&mut self, width: f64, height: f64) {
        if self.frame.is_degenerate() {
            self.resize(width, height);
            return;
        }
        let fx = width.max(0.0) / self.frame.width;
        let fy = height.max(0.0) / self.frame.height;
        self.frame.width = width.max(0.0);
        self.frame.height = height.max(0.0);
        for child in &mut self.children {
            child.scale_by(fx, fy);
        }
    }

    /// Scale to `width`, keeping the aspect ratio.
    pub fn scale_to_width(&mut self, width: f64) {
        let height = if self.frame.width > 0.0 {
            (self.frame.height * width / self.frame.width).round()
        } else {
            self.frame.height
        };
        self.scale_to(width, height);
    }

    fn scale_by(&mut self, fx: f64, fy: f64) {
        self.frame.x *= fx;
        self.frame.y *= fy;
        self.frame.width *= fx;
        self.frame.height *= fy;
        for child in &mut self.children {
            child.scale_by(fx, fy);
        }
    }

    /// Move within the parent.
    pub fn set_position(&mut self, x: f64, y: f64) {
        self.frame.x = x;
        self.frame.y = y;
    }

    /// Set the solid fill. Returns `false` for kinds that carry no fill.
    pub fn set_fill(&mut self, color: Option<Color>) -> bool {
        match &mut self.kind {
            NodeKind::Frame { fill, .. } => {
                *fill = color;
                true
            }
            NodeKind::Text { style, .. } => {
                if let Some(c) = color {
                    style.color = c;
                }
                true
            }
            NodeKind::Image { .. }
            | NodeKind::Group
            | NodeKind::Placeholder { .. }
            | NodeKind::ErrorBlock { .. } => false,
        }
    }

    /// Append a child at the top of the paint order.
    pub fn append_child(&mut self, child: SceneNode) {
        self.children.push(child);
    }

    /// Insert a child at `index` in paint order (clamped).
    pub fn insert_child(&mut self, index: usize, child: SceneNode) {
        let index = index.min(self.children.len());
        self.children.insert(index, child);
    }

    /// Detach the direct child with `id`, handing ownership to the caller for reparenting.
    pub fn take_child(&mut self, id: NodeId) -> Option<SceneNode> {
        let pos = self.children.iter().position(|c| c.id == id)?;
        Some(self.children.remove(pos))
    }

    /// First direct child with the given name.
    pub fn child_named(&self, name: &str) -> Option<&SceneNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Depth-first pre-order traversal including `self`.
    pub fn walk(&self) -> impl Iterator<Item = &SceneNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }

    /// First node in depth-first order (including `self`) with the given name.
    pub fn find_named(&self, name: &str) -> Option<&SceneNode> {
        self.walk().find(|n| n.name == name)
    }

    /// Number of nodes in this subtree.
    pub fn node_count(&self) -> usize {
        self.walk().count()
    }

    /// Union of the children's frames in this node's coordinate space.
    pub fn content_bounds(&self) -> Option<Rect> {
        union_bounds(self.children.iter().map(|c| c.frame.to_rect()))
    }

    /// Lowest bottom edge among children, or 0 without children.
    pub fn content_bottom(&self) -> f64 {
        self.children
            .iter()
            .map(|c| c.frame.bottom())
            .fold(0.0, f64::max)
    }

    /// Largest id in this subtree.
    pub fn max_id(&self) -> NodeId {
        self.walk().map(|n| n.id).max().unwrap_or_default()
    }

    /// Assign ids in depth-first pre-order starting at `next`; returns the next free id.
    pub fn assign_ids(&mut self, next: u64) -> u64 {
        self.id = NodeId(next);
        let mut next = next + 1;
        for child in &mut self.children {
            next = child.assign_ids(next);
        }
        next
    }

    /// Whether this node stands in for something that failed.
    pub fn is_placeholder(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Placeholder { .. } | NodeKind::ErrorBlock { .. }
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/node.rs"]
mod tests;
