//! promo-canvas turns a marketing-page configuration into a positioned design-canvas tree.
//!
//! The engine is organized around three entrypoints:
//!
//! - [`PrototypeComposer`] builds the page prototype from a [`Configuration`], with per-module
//!   failure isolation
//! - [`SlicingCoordinator`] places images larger than the host limit as a group of tiles cut by a
//!   [`Rasterizer`] collaborator
//! - [`ChannelAdapter`] derives per-channel variants of a composed page from a [`ProfileRegistry`]
//!
//! Non-fatal conditions are reported as [`Diagnostic`] values next to the tree instead of being
//! swallowed.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub(crate) mod assets;
pub(crate) mod builders;

/// Per-channel variants.
pub mod channel;
/// Page assembly.
pub mod compose;
/// Configuration boundary.
pub mod config;
/// Shared primitives.
pub mod foundation;
/// Canvas host and asset store collaborators.
pub mod host;
/// Scene tree model.
pub mod scene;
/// Oversized-image slicing.
pub mod slicing;

pub use crate::foundation::color::Color;
pub use crate::foundation::core::{NodeFrame, Point, Rect, Size, Vec2};
pub use crate::foundation::diagnostics::{Diagnostic, Diagnostics};
pub use crate::foundation::error::{PromoError, PromoResult};

pub use crate::assets::insert::AssetInsertionService;
pub use crate::builders::prize_for_cell;
pub use crate::channel::adapter::{CHANNEL_GAP, ChannelAdapter, ChannelVariant};
pub use crate::channel::profile::{ChannelProfile, ProfileRegistry, RewriteOp};
pub use crate::compose::prototype::{Prototype, PrototypeComposer};
pub use crate::config::model::{Configuration, Module, ModuleContent, ModuleKind};
pub use crate::config::options::EngineOptions;
pub use crate::config::payload::ImagePayload;
pub use crate::host::canvas::{CanvasHost, MemoryHost};
pub use crate::host::store::{KeyValueStore, MemoryStore, channel_asset_key};
pub use crate::scene::fingerprint::{TreeFingerprint, fingerprint_tree};
pub use crate::scene::index::NodeIndex;
pub use crate::scene::node::{NodeId, NodeKind, SceneNode};
pub use crate::slicing::coordinator::SlicingCoordinator;
pub use crate::slicing::local::LocalRasterizer;
pub use crate::slicing::planner::{SliceStrategy, compute_slice_strategy};
pub use crate::slicing::protocol::{ChannelRasterizer, Rasterizer, SliceBroker};
