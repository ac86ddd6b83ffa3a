use crate::builders::{BuildContext, TEXT_DARK, TEXT_MUTED, present};
use crate::config::model::{ButtonLayout, GameInfoContent};
use crate::foundation::color::Color;
use crate::foundation::core::NodeFrame;
use crate::foundation::error::{PromoError, PromoResult};
use crate::host::canvas::CanvasHost;
use crate::scene::node::{SceneNode, TextStyle};
use crate::slicing::protocol::Rasterizer;

const STACKED_HEIGHT: f64 = 316.0;
const INLINE_HEIGHT: f64 = 180.0;
const ICON_SIZE: f64 = 144.0;
const ICON_ORIGIN: (f64, f64) = (40.0, 36.0);
const TEXT_X_WITH_ICON: f64 = 208.0;
const EDGE: f64 = 40.0;
const TEXT_TOP: f64 = 40.0;
const LINE_GAP: f64 = 12.0;
const INLINE_BUTTON_GAP: f64 = 24.0;

/// Module height and button rectangle for a layout variant on a page `width` wide.
pub(crate) fn layout_metrics(layout: ButtonLayout, width: f64) -> (f64, NodeFrame) {
    match layout {
        ButtonLayout::Stacked => (
            STACKED_HEIGHT,
            NodeFrame::new(EDGE, 196.0, width - 2.0 * EDGE, 96.0),
        ),
        ButtonLayout::Inline => (
            INLINE_HEIGHT,
            NodeFrame::new(width - 240.0, 54.0, 200.0, 72.0),
        ),
    }
}

/// Icon, name, description and an optional download button.
///
/// The module height is fixed by the button layout; it only grows when the text column runs
/// past it.
pub(crate) async fn build<H: CanvasHost, R: Rasterizer>(
    ctx: &BuildContext<'_, H, R>,
    content: &GameInfoContent,
) -> PromoResult<Option<SceneNode>> {
    if !content.has_content() {
        return Ok(None);
    }
    let w = ctx.page_width();
    let (mut height, button_frame) = layout_metrics(content.button_layout, w);
    let mut frame = SceneNode::frame("gameInfo", NodeFrame::sized(w, height))
        .with_fill(content.background_color);

    let mut text_x = EDGE;
    if let Some(mut icon) = ctx
        .assets()
        .insert_optional(
            content.game_icon.as_ref(),
            "gameIcon",
            ICON_SIZE as u32,
            ICON_SIZE as u32,
        )
        .await?
    {
        icon.scale_to(ICON_SIZE, ICON_SIZE);
        icon.set_position(ICON_ORIGIN.0, ICON_ORIGIN.1);
        frame.append_child(icon);
        text_x = TEXT_X_WITH_ICON;
    }

    let text_right = match content.button_layout {
        ButtonLayout::Inline => button_frame.x - INLINE_BUTTON_GAP,
        ButtonLayout::Stacked => w - EDGE,
    };
    let text_width = text_right - text_x;
    if text_width <= 0.0 {
        return Err(PromoError::module_build(format!(
            "page width {w} leaves no room for the game info text"
        )));
    }

    let mut y = TEXT_TOP;
    let mut text_bottom: f64 = 0.0;
    if let Some(name) = present(&content.game_name) {
        let node = ctx.text(
            "gameName",
            name,
            TextStyle::regular(36.0, TEXT_DARK).bold(),
            text_x,
            y,
            Some(text_width),
        );
        y = node.frame.bottom() + LINE_GAP;
        text_bottom = node.frame.bottom();
        frame.append_child(node);
    }
    if let Some(desc) = present(&content.game_desc) {
        let node = ctx.text(
            "gameDesc",
            desc,
            TextStyle::regular(24.0, TEXT_MUTED),
            text_x,
            y,
            Some(text_width),
        );
        text_bottom = node.frame.bottom();
        frame.append_child(node);
    }

    if let Some(background) = ctx
        .assets()
        .insert_optional(
            content.button_background.as_ref(),
            "buttonBackground",
            button_frame.width as u32,
            button_frame.height as u32,
        )
        .await?
    {
        frame.append_child(button(ctx, background, button_frame, content));
    }

    height = height.max(text_bottom + EDGE);
    frame.resize(w, height);
    Ok(Some(frame))
}

fn button<H: CanvasHost, R: Rasterizer>(
    ctx: &BuildContext<'_, H, R>,
    mut background: SceneNode,
    at: NodeFrame,
    content: &GameInfoContent,
) -> SceneNode {
    background.scale_to(at.width, at.height);
    background.set_position(0.0, 0.0);
    let mut button = SceneNode::group("button", at, vec![background]);
    if let Some(label) = present(&content.button_text) {
        let mut text = ctx.centered_text(
            "buttonText",
            label,
            TextStyle::regular(32.0, Color::WHITE).bold(),
            at.width,
            0.0,
        );
        text.frame.y = ((at.height - text.frame.height).max(0.0) * 0.5).floor();
        button.append_child(text);
    }
    button
}
