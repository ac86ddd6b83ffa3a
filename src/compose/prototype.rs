use futures::future::join_all;
use tracing::{debug, info};

use crate::assets::insert::AssetInsertionService;
use crate::builders::{BuildContext, build_module};
use crate::config::model::{Configuration, Module};
use crate::config::options::EngineOptions;
use crate::foundation::core::NodeFrame;
use crate::foundation::diagnostics::{Diagnostic, Diagnostics};
use crate::foundation::error::PromoResult;
use crate::host::canvas::CanvasHost;
use crate::scene::fingerprint::{TreeFingerprint, fingerprint_tree};
use crate::scene::node::SceneNode;
use crate::slicing::protocol::{Rasterizer, SliceBroker};

/// Name of the root frame of a composed page.
pub const ROOT_NAME: &str = "prototype";
/// Name of the frame the modules are stacked in.
pub const BODY_NAME: &str = "body";
/// Name of the page background node.
pub const BACKGROUND_NAME: &str = "background";

/// A composed page plus the non-fatal conditions observed while building it.
#[derive(Clone, Debug)]
pub struct Prototype {
    /// Root frame.
    pub root: SceneNode,
    /// Non-fatal conditions, in the order they were recorded.
    pub diagnostics: Vec<Diagnostic>,
}

impl Prototype {
    /// Whether some oversized image was assembled with missing tiles.
    pub fn has_partial_assembly(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::PartialAssembly { .. }))
    }

    /// Structural fingerprint of the root.
    pub fn fingerprint(&self) -> TreeFingerprint {
        fingerprint_tree(&self.root)
    }

    /// Hand the tree to `host`, keeping the diagnostics.
    pub fn attach_to<H: CanvasHost>(self, host: &H) -> PromoResult<Vec<Diagnostic>> {
        host.attach(self.root)?;
        Ok(self.diagnostics)
    }
}

/// Builds a [`Prototype`] from a [`Configuration`].
pub struct PrototypeComposer<'a, H, R> {
    host: &'a H,
    rasterizer: &'a R,
    broker: &'a SliceBroker,
    options: EngineOptions,
}

impl<'a, H: CanvasHost, R: Rasterizer> PrototypeComposer<'a, H, R> {
    /// Composer over borrowed collaborators.
    pub fn new(
        host: &'a H,
        rasterizer: &'a R,
        broker: &'a SliceBroker,
        options: EngineOptions,
    ) -> Self {
        Self {
            host,
            rasterizer,
            broker,
            options,
        }
    }

    /// Engine options in effect.
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Compose `config` into a fresh tree.
    ///
    /// Modules are built concurrently and assembled in family order (header, game info, custom
    /// modules in configuration order, rules, footer). When no module produces a node the root
    /// is a minimal frame sized to the page background or the minimum page size.
    #[tracing::instrument(skip_all, fields(modules = config.modules.len()))]
    pub async fn build(&self, config: &Configuration) -> PromoResult<Prototype> {
        config.validate()?;
        let width = config.page.width.unwrap_or(self.options.page_width);
        let diagnostics = Diagnostics::new();
        let ctx = BuildContext::new(
            AssetInsertionService::new(
                self.host,
                self.rasterizer,
                self.broker,
                &diagnostics,
                &self.options,
            ),
            &self.options,
            &diagnostics,
            width,
        );

        let background = self.background(&ctx, config, width).await?;
        let body = if config.has_any_content() {
            Some(self.body(&ctx, &config.modules, width).await?)
                .filter(|b| !b.children.is_empty())
        } else {
            None
        };
        let mut root = if let Some(body) = body {
            let height = body
                .frame
                .height
                .max(background.as_ref().map_or(0.0, |b| b.frame.height));
            let mut root = SceneNode::frame(ROOT_NAME, NodeFrame::sized(width, height));
            root.children.extend(background);
            root.append_child(body);
            root
        } else {
            debug!("no module produces content; emitting minimal page");
            let size = background
                .as_ref()
                .map_or(self.options.min_page_size, |b| b.frame.size());
            let mut root = SceneNode::frame(ROOT_NAME, NodeFrame::sized(size.width, size.height));
            root.children.extend(background);
            root
        };
        root.set_fill(config.page.background_color);
        root.assign_ids(1);

        info!(
            nodes = root.node_count(),
            width = root.frame.width,
            height = root.frame.height,
            diagnostics = diagnostics.len(),
            "prototype composed"
        );
        Ok(Prototype {
            root,
            diagnostics: diagnostics.into_entries(),
        })
    }

    async fn background(
        &self,
        ctx: &BuildContext<'_, H, R>,
        config: &Configuration,
        width: f64,
    ) -> PromoResult<Option<SceneNode>> {
        let min = self.options.min_page_size;
        let node = ctx
            .assets()
            .insert_optional(
                config.page.background.as_ref(),
                BACKGROUND_NAME,
                width as u32,
                min.height as u32,
            )
            .await?;
        Ok(node.map(|mut bg| {
            bg.scale_to_width(width);
            bg.set_position(0.0, 0.0);
            bg
        }))
    }

    async fn body(
        &self,
        ctx: &BuildContext<'_, H, R>,
        modules: &[Module],
        width: f64,
    ) -> PromoResult<SceneNode> {
        let mut ordered: Vec<&Module> = modules.iter().collect();
        ordered.sort_by_key(|m| m.kind().family());

        let built = join_all(ordered.iter().map(|m| build_module(ctx, m))).await;

        let mut body = SceneNode::frame(BODY_NAME, NodeFrame::sized(width, 0.0));
        for (module, result) in ordered.iter().zip(built) {
            match result? {
                Some(node) => body.append_child(node),
                None => debug!(module = %module.id, "module omitted: no content"),
            }
        }
        let height = stack_children(&mut body);
        body.resize(width, height);
        Ok(body)
    }
}

/// Stack children top to bottom at x = 0 in their current order; returns the total height.
pub(crate) fn stack_children(container: &mut SceneNode) -> f64 {
    let mut y = 0.0;
    for child in &mut container.children {
        child.set_position(0.0, y);
        y += child.frame.height;
    }
    y
}

#[cfg(test)]
#[path = "../../tests/unit/compose/prototype.rs"]
mod tests;
