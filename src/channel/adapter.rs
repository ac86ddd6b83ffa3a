use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::assets::insert::AssetInsertionService;
use crate::channel::profile::{ProfileRegistry, RewriteOp};
use crate::compose::prototype::{BODY_NAME, stack_children};
use crate::config::options::EngineOptions;
use crate::config::payload::ImagePayload;
use crate::foundation::diagnostics::{Diagnostic, Diagnostics};
use crate::foundation::error::{PromoError, PromoResult};
use crate::host::canvas::CanvasHost;
use crate::host::store::{KeyValueStore, channel_asset_key};
use crate::scene::index::NodeIndex;
use crate::scene::node::{NodeId, NodeKind, SceneNode, TextAlign};
use crate::slicing::protocol::{Rasterizer, SliceBroker};

/// Horizontal gap between the source page and each channel variant.
pub const CHANNEL_GAP: f64 = 100.0;

/// A channel-specific copy of a composed page.
#[derive(Clone, Debug)]
pub struct ChannelVariant {
    /// Channel id.
    pub channel: String,
    /// Independent deep copy, rewritten and re-measured.
    pub root: SceneNode,
    /// Skipped rewrites and asset problems.
    pub diagnostics: Vec<Diagnostic>,
}

/// Derives per-channel variants of a composed page.
pub struct ChannelAdapter<'a, H, R> {
    host: &'a H,
    rasterizer: &'a R,
    broker: &'a SliceBroker,
    options: EngineOptions,
    registry: &'a ProfileRegistry,
}

impl<'a, H: CanvasHost, R: Rasterizer> ChannelAdapter<'a, H, R> {
    /// Adapter over borrowed collaborators.
    pub fn new(
        host: &'a H,
        rasterizer: &'a R,
        broker: &'a SliceBroker,
        options: EngineOptions,
        registry: &'a ProfileRegistry,
    ) -> Self {
        Self {
            host,
            rasterizer,
            broker,
            options,
            registry,
        }
    }

    /// Clone `source`, offset the clone next to it and apply the channel's rewrite table.
    ///
    /// `store` supplies channel assets under `"<channel>/<asset>"` and is only read. Unknown
    /// channels are a validation error; a rewrite whose target is missing is skipped. A source
    /// whose node ids are not unique (e.g. built by hand) is renumbered depth-first on the copy.
    #[tracing::instrument(skip(self, source, store))]
    pub async fn generate(
        &self,
        channel_id: &str,
        source: &SceneNode,
        store: &dyn KeyValueStore<ImagePayload>,
    ) -> PromoResult<ChannelVariant> {
        let (slot, profile) = self
            .registry
            .get(channel_id)
            .ok_or_else(|| PromoError::validation(format!("unknown channel '{channel_id}'")))?;

        let diagnostics = Diagnostics::new();
        let assets = AssetInsertionService::new(
            self.host,
            self.rasterizer,
            self.broker,
            &diagnostics,
            &self.options,
        );

        let mut root = source.clone();
        if !has_unique_ids(&root) {
            debug!(channel = channel_id, "source ids are not unique; renumbering the copy");
            root.assign_ids(1);
        }
        root.name = format!("{}@{channel_id}", source.name);
        root.set_position(
            source.frame.x + (slot as f64 + 1.0) * (source.frame.width + CHANNEL_GAP),
            source.frame.y,
        );

        let mut rw = Rewriter {
            channel: channel_id,
            next_id: root.max_id().as_u64() + 1,
            index: NodeIndex::build(&root),
            root: &mut root,
            assets: &assets,
            store,
            diagnostics: &diagnostics,
        };
        let body = rw.index.find_named(rw.root.id, BODY_NAME);
        for (module_name, ops) in &profile.rules {
            let modules = body
                .map(|b| rw.index.children_named(b, module_name))
                .unwrap_or_default();
            if modules.is_empty() {
                rw.miss(module_name, module_name);
                continue;
            }
            for module in modules {
                for op in ops {
                    rw.apply(module_name, module, op).await?;
                }
            }
        }

        if let Some(b) = body
            && let Some(body) = rw.index.get_mut(rw.root, b)
        {
            let height = stack_children(body);
            let width = body.frame.width;
            body.resize(width, height);
        }
        if let Some(bounds) = root.content_bounds() {
            root.resize(bounds.x1.max(0.0), bounds.y1.max(0.0));
        }

        info!(
            channel = channel_id,
            slot,
            x = root.frame.x,
            height = root.frame.height,
            skipped = diagnostics.len(),
            "channel variant generated"
        );
        Ok(ChannelVariant {
            channel: channel_id.to_string(),
            root,
            diagnostics: diagnostics.into_entries(),
        })
    }
}

fn has_unique_ids(root: &SceneNode) -> bool {
    let mut seen = HashSet::new();
    root.walk().all(|n| seen.insert(n.id))
}

struct Rewriter<'r, 'a, H, R> {
    channel: &'r str,
    root: &'r mut SceneNode,
    index: NodeIndex,
    next_id: u64,
    assets: &'r AssetInsertionService<'a, H, R>,
    store: &'r dyn KeyValueStore<ImagePayload>,
    diagnostics: &'r Diagnostics,
}

impl<H: CanvasHost, R: Rasterizer> Rewriter<'_, '_, H, R> {
    fn miss(&self, module: &str, target: &str) {
        warn!(
            channel = self.channel,
            module,
            target,
            "rewrite target not found; skipping"
        );
        self.diagnostics.push(Diagnostic::StructuralLookupMiss {
            channel: self.channel.to_string(),
            module: module.to_string(),
            target: target.to_string(),
        });
    }

    fn target(&self, module_name: &str, module: NodeId, name: &str) -> Option<NodeId> {
        let found = self.index.find_named(module, name);
        if found.is_none() {
            self.miss(module_name, name);
        }
        found
    }

    async fn apply(
        &mut self,
        module_name: &str,
        module: NodeId,
        op: &RewriteOp,
    ) -> PromoResult<()> {
        debug!(channel = self.channel, module = module_name, ?op, "applying rewrite");
        match op {
            RewriteOp::ResizeModule { width, height } => {
                if let Some(node) = self.index.get_mut(self.root, module) {
                    let w = width.unwrap_or(node.frame.width);
                    let h = height.unwrap_or(node.frame.height);
                    node.resize(w, h);
                }
            }
            RewriteOp::MoveNode { target, x, y } => {
                if let Some(id) = self.target(module_name, module, target)
                    && let Some(node) = self.index.get_mut(self.root, id)
                {
                    node.set_position(*x, *y);
                }
            }
            RewriteOp::ResizeNode {
                target,
                width,
                height,
            } => {
                if let Some(id) = self.target(module_name, module, target)
                    && let Some(node) = self.index.get_mut(self.root, id)
                {
                    node.scale_to(*width, *height);
                }
            }
            RewriteOp::RemoveNode { target } => {
                if let Some(id) = self.target(module_name, module, target)
                    && let Some(parent) = self.index.parent_of(id)
                    && let Some(parent) = self.index.get_mut(self.root, parent)
                {
                    parent.take_child(id);
                }
            }
            RewriteOp::InsertAsset {
                asset,
                name,
                parent,
                x,
                y,
                width,
                height,
            } => {
                self.insert_asset(
                    module_name,
                    module,
                    asset,
                    name,
                    parent.as_deref(),
                    (*x, *y),
                    (*width, *height),
                )
                .await?;
            }
            RewriteOp::ReplaceText { target, text } => {
                let Some(id) = self.target(module_name, module, target) else {
                    return Ok(());
                };
                let max_width = self
                    .index
                    .get(self.root, module)
                    .map(|m| m.frame.width)
                    .unwrap_or(0.0);
                let host = self.assets.host();
                let Some(node) = self.index.get_mut(self.root, id) else {
                    return Ok(());
                };
                let NodeKind::Text { content, style } = &mut node.kind else {
                    warn!(
                        channel = self.channel,
                        target = %target,
                        "replaceText target is not text"
                    );
                    self.diagnostics.push(Diagnostic::StructuralLookupMiss {
                        channel: self.channel.to_string(),
                        module: module_name.to_string(),
                        target: target.clone(),
                    });
                    return Ok(());
                };
                *content = text.clone();
                let avail = (max_width - node.frame.x).max(1.0);
                let size = host.measure_text(text, style, Some(avail));
                if style.align == TextAlign::Center {
                    node.frame.x = (node.frame.x + (node.frame.width - size.width) * 0.5)
                        .floor()
                        .max(0.0);
                }
                node.resize(size.width, size.height);
            }
        }
        if op.is_structural() {
            self.index = NodeIndex::build(self.root);
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    async fn insert_asset(
        &mut self,
        module_name: &str,
        module: NodeId,
        asset: &str,
        name: &str,
        parent: Option<&str>,
        (x, y): (f64, f64),
        (width, height): (Option<f64>, Option<f64>),
    ) -> PromoResult<()> {
        let key = channel_asset_key(self.channel, asset);
        let Some(payload) = self.store.get(&key) else {
            self.miss(module_name, &key);
            return Ok(());
        };
        let parent_id = match parent {
            Some(p) => match self.target(module_name, module, p) {
                Some(id) => id,
                None => return Ok(()),
            },
            None => module,
        };

        let default_w = width.unwrap_or(1.0) as u32;
        let default_h = height.unwrap_or(1.0) as u32;
        let Some(mut node) = self
            .assets
            .insert_image(&payload, name, default_w, default_h)
            .await?
        else {
            self.miss(module_name, &key);
            return Ok(());
        };
        let w = width.unwrap_or(node.frame.width);
        let h = height.unwrap_or(node.frame.height);
        node.scale_to(w, h);
        node.set_position(x, y);
        self.next_id = node.assign_ids(self.next_id);

        if let Some(parent) = self.index.get_mut(self.root, parent_id) {
            parent.append_child(node);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/channel/adapter.rs"]
mod tests;
