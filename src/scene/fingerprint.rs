use xxhash_rust::xxh3::Xxh3;

use crate::foundation::color::Color;
use crate::scene::node::{NodeKind, PlaceholderReason, SceneNode, TextAlign};

const XXH3_SEED: u64 = 0x5c3a_91e7_0b2d_44f1;

/// Structural fingerprint of a scene tree: names, kinds, geometry and content.
///
/// Two builds of the same configuration must produce equal fingerprints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TreeFingerprint {
    /// High 64 bits.
    pub hi: u64,
    /// Low 64 bits.
    pub lo: u64,
    /// Node count.
    pub nodes: usize,
}

impl std::fmt::Display for TreeFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}{:016x}/{}", self.hi, self.lo, self.nodes)
    }
}

/// Fingerprint `root`. Node ids are hashed too, so renumbering changes the result.
pub fn fingerprint_tree(root: &SceneNode) -> TreeFingerprint {
    let mut h = StableHasher::new();
    let mut nodes = 0usize;
    for node in root.walk() {
        nodes += 1;
        write_node(&mut h, node);
    }
    let v = h.inner.digest128();
    TreeFingerprint {
        hi: (v >> 64) as u64,
        lo: v as u64,
        nodes,
    }
}

/// Content hash used as the host image handle.
pub(crate) fn content_hash(bytes: &[u8]) -> String {
    format!("{:016x}", xxhash_rust::xxh3::xxh3_64_with_seed(bytes, XXH3_SEED))
}

struct StableHasher {
    inner: Xxh3,
}

impl StableHasher {
    fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    fn write_str(&mut self, s: &str) {
        self.write_u64(s.len() as u64);
        self.write_bytes(s.as_bytes());
    }

    fn write_color(&mut self, c: Color) {
        for v in [c.r, c.g, c.b, c.a] {
            self.write_f64(v);
        }
    }
}

fn write_node(h: &mut StableHasher, node: &SceneNode) {
    h.write_u64(node.id.as_u64());
    h.write_str(&node.name);
    for v in [
        node.frame.x,
        node.frame.y,
        node.frame.width,
        node.frame.height,
    ] {
        h.write_f64(v);
    }
    h.write_u64(node.children.len() as u64);
    match &node.kind {
        NodeKind::Frame {
            fill,
            clips_content,
        } => {
            h.write_u8(1);
            match fill {
                Some(c) => {
                    h.write_u8(1);
                    h.write_color(*c);
                }
                None => h.write_u8(0),
            }
            h.write_u8(u8::from(*clips_content));
        }
        NodeKind::Text { content, style } => {
            h.write_u8(2);
            h.write_str(content);
            h.write_f64(style.font_size);
            h.write_f64(style.line_height);
            h.write_u8(u8::from(style.bold));
            h.write_color(style.color);
            h.write_u8(match style.align {
                TextAlign::Left => 0,
                TextAlign::Center => 1,
                TextAlign::Right => 2,
            });
        }
        NodeKind::Image { image } => {
            h.write_u8(3);
            h.write_str(&image.hash);
            h.write_u64(u64::from(image.width));
            h.write_u64(u64::from(image.height));
        }
        NodeKind::Group => h.write_u8(4),
        NodeKind::Placeholder { reason, label } => {
            h.write_u8(5);
            h.write_u8(match reason {
                PlaceholderReason::Oversize => 0,
                PlaceholderReason::Generic => 1,
            });
            h.write_str(label);
        }
        NodeKind::ErrorBlock { module, message } => {
            h.write_u8(6);
            h.write_str(module);
            h.write_str(message);
        }
    }
}
