use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{PromoError, PromoResult};

/// One rewrite applied to a module subtree of a channel clone.
///
/// Targets are node names, resolved as the first depth-first match inside the module.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum RewriteOp {
    /// Resize the module frame itself; absent dimensions are kept.
    ResizeModule {
        /// New width.
        #[serde(default)]
        width: Option<f64>,
        /// New height.
        #[serde(default)]
        height: Option<f64>,
    },
    /// Move a node within its parent.
    MoveNode {
        /// Node name.
        target: String,
        /// New x.
        x: f64,
        /// New y.
        y: f64,
    },
    /// Resize a node, scaling its descendants.
    ResizeNode {
        /// Node name.
        target: String,
        /// New width.
        width: f64,
        /// New height.
        height: f64,
    },
    /// Detach a node and its subtree.
    RemoveNode {
        /// Node name.
        target: String,
    },
    /// Insert an image from the per-channel asset store.
    InsertAsset {
        /// Asset key suffix; the store key is `"<channel>/<asset>"`.
        asset: String,
        /// Name of the inserted node.
        name: String,
        /// Parent node name inside the module; the module frame when absent.
        #[serde(default)]
        parent: Option<String>,
        /// Position in the parent.
        x: f64,
        /// Position in the parent.
        y: f64,
        /// Target width; the image's own width when absent.
        #[serde(default)]
        width: Option<f64>,
        /// Target height; the image's own height when absent.
        #[serde(default)]
        height: Option<f64>,
    },
    /// Replace the characters of a text node and re-measure it.
    ReplaceText {
        /// Node name.
        target: String,
        /// New text.
        text: String,
    },
}

impl RewriteOp {
    /// Whether applying this op changes the tree structure (and so invalidates an index).
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::RemoveNode { .. } | Self::InsertAsset { .. })
    }
}

/// Named rule table for one distribution channel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelProfile {
    /// Channel id, e.g. `"vivo"`.
    pub id: String,
    /// Human-facing name.
    #[serde(default)]
    pub display_name: String,
    /// Rewrites keyed by module name (`"gameInfo"`, `"footer"`, ...), applied in order.
    #[serde(default)]
    pub rules: BTreeMap<String, Vec<RewriteOp>>,
}

/// Ordered set of channel profiles. A profile's position is its layout slot.
#[derive(Clone, Debug, Default)]
pub struct ProfileRegistry {
    profiles: Vec<ChannelProfile>,
}

impl ProfileRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in `vivo`, `oppo` and `huawei` profiles.
    pub fn builtin() -> Self {
        let mut out = Self::new();
        for p in builtin_profiles() {
            out.insert(p);
        }
        out
    }

    /// Add `profile`, replacing any profile with the same id in place.
    pub fn insert(&mut self, profile: ChannelProfile) {
        match self.profiles.iter_mut().find(|p| p.id == profile.id) {
            Some(slot) => *slot = profile,
            None => self.profiles.push(profile),
        }
    }

    /// Profile for `id` and its slot.
    pub fn get(&self, id: &str) -> Option<(usize, &ChannelProfile)> {
        self.profiles.iter().enumerate().find(|(_, p)| p.id == id)
    }

    /// Channel ids in slot order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.profiles.iter().map(|p| p.id.as_str())
    }

    /// Number of profiles.
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Merge profiles from a JSON array.
    pub fn extend_from_json_str(&mut self, s: &str) -> PromoResult<()> {
        let profiles: Vec<ChannelProfile> = serde_json::from_str(s)
            .map_err(|e| PromoError::serde(format!("parse channel profiles JSON: {e}")))?;
        for p in profiles {
            if p.id.trim().is_empty() {
                return Err(PromoError::validation("channel profile has an empty id"));
            }
            self.insert(p);
        }
        Ok(())
    }

    /// Merge profiles from a JSON file.
    pub fn extend_from_path(&mut self, path: impl AsRef<Path>) -> PromoResult<()> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path).map_err(|e| {
            PromoError::validation(format!("open channel profiles '{}': {e}", path.display()))
        })?;
        self.extend_from_json_str(&s)
    }
}

fn profile(id: &str, display_name: &str, rules: Vec<(&str, Vec<RewriteOp>)>) -> ChannelProfile {
    ChannelProfile {
        id: id.to_string(),
        display_name: display_name.to_string(),
        rules: rules
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
    }
}

fn builtin_profiles() -> Vec<ChannelProfile> {
    vec![
        profile(
            "vivo",
            "vivo App Store",
            vec![
                (
                    "gameInfo",
                    vec![
                        RewriteOp::RemoveNode {
                            target: "button".into(),
                        },
                        RewriteOp::InsertAsset {
                            asset: "downloadButton".into(),
                            name: "button".into(),
                            parent: None,
                            x: 40.0,
                            y: 196.0,
                            width: Some(670.0),
                            height: Some(96.0),
                        },
                    ],
                ),
                (
                    "footer",
                    vec![RewriteOp::ReplaceText {
                        target: "text".into(),
                        text: "Available on the vivo App Store".into(),
                    }],
                ),
            ],
        ),
        profile(
            "oppo",
            "OPPO Software Store",
            vec![
                (
                    "header",
                    vec![RewriteOp::ResizeModule {
                        width: None,
                        height: Some(360.0),
                    }],
                ),
                (
                    "gameInfo",
                    vec![
                        RewriteOp::ResizeNode {
                            target: "gameIcon".into(),
                            width: 128.0,
                            height: 128.0,
                        },
                        RewriteOp::MoveNode {
                            target: "gameIcon".into(),
                            x: 40.0,
                            y: 44.0,
                        },
                    ],
                ),
            ],
        ),
        profile(
            "huawei",
            "HUAWEI AppGallery",
            vec![
                (
                    "gameInfo",
                    vec![
                        RewriteOp::RemoveNode {
                            target: "buttonText".into(),
                        },
                        RewriteOp::InsertAsset {
                            asset: "badge".into(),
                            name: "channelBadge".into(),
                            parent: None,
                            x: 590.0,
                            y: 20.0,
                            width: Some(120.0),
                            height: Some(40.0),
                        },
                    ],
                ),
                (
                    "rules",
                    vec![RewriteOp::ReplaceText {
                        target: "heading".into(),
                        text: "Event Rules (AppGallery)".into(),
                    }],
                ),
            ],
        ),
    ]
}
