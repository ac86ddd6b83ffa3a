use crate::builders::{BuildContext, present};
use crate::config::model::HeaderContent;
use crate::foundation::color::Color;
use crate::foundation::core::{NodeFrame, center_offset};
use crate::foundation::error::PromoResult;
use crate::host::canvas::CanvasHost;
use crate::scene::node::{SceneNode, TextStyle};
use crate::slicing::protocol::Rasterizer;

const DEFAULT_HEIGHT: f64 = 400.0;
const TITLE_TOP_RATIO: f64 = 0.3;
const SUBTITLE_GAP: f64 = 16.0;
const BOTTOM_PADDING: f64 = 24.0;

/// Hero image at the top, title artwork centered over it, optional subtitle below the title.
pub(crate) async fn build<H: CanvasHost, R: Rasterizer>(
    ctx: &BuildContext<'_, H, R>,
    content: &HeaderContent,
) -> PromoResult<Option<SceneNode>> {
    if !content.has_content() {
        return Ok(None);
    }
    let w = ctx.page_width();
    let mut frame = SceneNode::frame("header", NodeFrame::sized(w, DEFAULT_HEIGHT));
    let mut height = DEFAULT_HEIGHT;

    if let Some(mut hero) = ctx
        .assets()
        .insert_optional(
            content.hero_image.as_ref(),
            "heroImage",
            w as u32,
            DEFAULT_HEIGHT as u32,
        )
        .await?
    {
        hero.scale_to_width(w);
        hero.set_position(0.0, 0.0);
        height = hero.frame.height;
        frame.append_child(hero);
    }

    let mut title_bottom = None;
    if let Some(mut title) = ctx
        .assets()
        .insert_optional(content.title_image.as_ref(), "titleImage", 600, 200)
        .await?
    {
        if title.frame.width > w {
            title.scale_to_width(w);
        }
        title.set_position(
            center_offset(w, title.frame.width),
            (height * TITLE_TOP_RATIO).floor(),
        );
        title_bottom = Some(title.frame.bottom());
        frame.append_child(title);
    }

    if let Some(subtitle) = present(&content.subtitle) {
        let y = title_bottom
            .map(|b| b + SUBTITLE_GAP)
            .unwrap_or((height * TITLE_TOP_RATIO).floor());
        let node = ctx.centered_text(
            "subtitle",
            subtitle,
            TextStyle::regular(28.0, Color::WHITE),
            w,
            y,
        );
        height = height.max(node.frame.bottom() + BOTTOM_PADDING);
        frame.append_child(node);
    }

    frame.resize(w, height);
    Ok(Some(frame))
}
