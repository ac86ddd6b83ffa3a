//! One builder per module kind, plus the failure-isolation boundary around them.
//!
//! Builders return `Ok(None)` when their content is empty; the module is then omitted rather
//! than rendered as an empty frame.

use tracing::error;

use crate::assets::insert::AssetInsertionService;
use crate::config::model::{Module, ModuleContent};
use crate::config::options::EngineOptions;
use crate::foundation::color::Color;
use crate::foundation::core::{NodeFrame, center_offset};
use crate::foundation::diagnostics::{Diagnostic, Diagnostics};
use crate::foundation::error::{PromoError, PromoResult};
use crate::host::canvas::CanvasHost;
use crate::scene::node::{SceneNode, TextAlign, TextStyle};
use crate::slicing::protocol::Rasterizer;

mod activity;
mod footer;
mod game_info;
mod header;
mod image_block;
mod nine_grid;
mod rules;

pub use nine_grid::prize_for_cell;

pub(crate) const TEXT_DARK: Color = Color::rgba(0.2, 0.2, 0.2, 1.0);
pub(crate) const TEXT_MUTED: Color = Color::rgba(0.4, 0.4, 0.4, 1.0);
const ERROR_FILL: Color = Color::rgba(0.86, 0.15, 0.15, 1.0);

/// Everything a builder needs: asset insertion, options and the page width in effect.
pub struct BuildContext<'a, H, R> {
    assets: AssetInsertionService<'a, H, R>,
    options: &'a EngineOptions,
    diagnostics: &'a Diagnostics,
    page_width: f64,
}

impl<'a, H: CanvasHost, R: Rasterizer> BuildContext<'a, H, R> {
    /// Context for one build.
    pub fn new(
        assets: AssetInsertionService<'a, H, R>,
        options: &'a EngineOptions,
        diagnostics: &'a Diagnostics,
        page_width: f64,
    ) -> Self {
        Self {
            assets,
            options,
            diagnostics,
            page_width,
        }
    }

    /// Asset insertion service.
    pub fn assets(&self) -> &AssetInsertionService<'a, H, R> {
        &self.assets
    }

    /// Page width in effect for this build.
    pub fn page_width(&self) -> f64 {
        self.page_width
    }

    /// Engine options.
    pub fn options(&self) -> &EngineOptions {
        self.options
    }

    fn host(&self) -> &'a H {
        self.assets.host()
    }

    /// Width left after `inset` on both sides; errors when nothing is left.
    pub(crate) fn content_width(&self, inset: f64) -> PromoResult<f64> {
        let w = self.page_width - 2.0 * inset;
        if w > 0.0 {
            Ok(w)
        } else {
            Err(PromoError::module_build(format!(
                "page width {} leaves no room for content",
                self.page_width
            )))
        }
    }

    /// Measured text node at `(x, y)`.
    pub(crate) fn text(
        &self,
        name: &str,
        content: &str,
        style: TextStyle,
        x: f64,
        y: f64,
        max_width: Option<f64>,
    ) -> SceneNode {
        let size = self.host().measure_text(content, &style, max_width);
        SceneNode::text(
            name,
            content,
            style,
            NodeFrame::new(x, y, size.width, size.height),
        )
    }

    /// Measured text node centered horizontally within `container_width`.
    pub(crate) fn centered_text(
        &self,
        name: &str,
        content: &str,
        style: TextStyle,
        container_width: f64,
        y: f64,
    ) -> SceneNode {
        let mut node = self.text(
            name,
            content,
            style.aligned(TextAlign::Center),
            0.0,
            y,
            Some(container_width),
        );
        node.frame.x = center_offset(container_width, node.frame.width);
        node
    }
}

/// Trimmed, non-blank text.
pub(crate) fn present(s: &Option<String>) -> Option<&str> {
    s.as_deref().map(str::trim).filter(|t| !t.is_empty())
}

/// Build one module's content without isolation.
pub async fn build_content<H: CanvasHost, R: Rasterizer>(
    ctx: &BuildContext<'_, H, R>,
    content: &ModuleContent,
) -> PromoResult<Option<SceneNode>> {
    match content {
        ModuleContent::Header(c) => header::build(ctx, c).await,
        ModuleContent::GameInfo(c) => game_info::build(ctx, c).await,
        ModuleContent::Activity(c) => activity::build(ctx, c).await,
        ModuleContent::NineGrid(c) => nine_grid::build(ctx, c).await,
        ModuleContent::ImageBlock(c) => image_block::build(ctx, c).await,
        ModuleContent::Rules(c) => rules::build(ctx, c).await,
        ModuleContent::Footer(c) => footer::build(ctx, c).await,
    }
}

/// Build one module, converting internal failures into a visible error block.
///
/// Only [`PromoError::Assembly`] escapes; sibling modules keep building either way.
pub async fn build_module<H: CanvasHost, R: Rasterizer>(
    ctx: &BuildContext<'_, H, R>,
    module: &Module,
) -> PromoResult<Option<SceneNode>> {
    match build_content(ctx, &module.content).await {
        Ok(node) => Ok(node),
        Err(err) if err.is_terminal() => Err(err),
        Err(err) => {
            error!(
                module = %module.id,
                kind = module.kind().key(),
                error = %err,
                "module build failed"
            );
            let message = err.to_string();
            ctx.diagnostics.push(Diagnostic::ModuleBuildFailure {
                module: module.id.clone(),
                message: message.clone(),
            });
            Ok(Some(error_block(ctx, module, message)))
        }
    }
}

fn error_block<H: CanvasHost, R: Rasterizer>(
    ctx: &BuildContext<'_, H, R>,
    module: &Module,
    message: String,
) -> SceneNode {
    let width = ctx.page_width.max(1.0);
    let height = ctx.options.error_block_height;
    let label = ctx.text(
        "errorLabel",
        &format!("module '{}' failed", module.id),
        TextStyle::regular(24.0, Color::WHITE).bold(),
        16.0,
        16.0,
        Some((width - 32.0).max(1.0)),
    );
    let mut block = SceneNode::error_block(
        module.kind().key(),
        module.id.clone(),
        message,
        NodeFrame::sized(width, height),
    );
    block.append_child(
        SceneNode::frame("errorFill", NodeFrame::sized(width, height)).with_fill(Some(ERROR_FILL)),
    );
    block.append_child(label);
    block
}

#[cfg(test)]
#[path = "../../tests/unit/builders/mod.rs"]
mod tests;
