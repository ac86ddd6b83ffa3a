use crate::builders::{BuildContext, TEXT_DARK, TEXT_MUTED, present};
use crate::config::model::ActivityContent;
use crate::foundation::core::NodeFrame;
use crate::foundation::error::PromoResult;
use crate::host::canvas::CanvasHost;
use crate::scene::node::{SceneNode, TextStyle};
use crate::slicing::protocol::Rasterizer;

const PADDING: f64 = 40.0;
const HEADING_GAP: f64 = 16.0;
const BODY_GAP: f64 = 24.0;

pub(crate) async fn build<H: CanvasHost, R: Rasterizer>(
    ctx: &BuildContext<'_, H, R>,
    content: &ActivityContent,
) -> PromoResult<Option<SceneNode>> {
    if !content.has_content() {
        return Ok(None);
    }
    let w = ctx.page_width();
    let cw = ctx.content_width(PADDING)?;
    let mut frame =
        SceneNode::frame("activity", NodeFrame::sized(w, 0.0)).with_fill(content.background_color);

    let mut y = PADDING;
    let mut bottom = PADDING;
    if let Some(heading) = present(&content.heading) {
        let node = ctx.text(
            "heading",
            heading,
            TextStyle::regular(36.0, TEXT_DARK).bold(),
            PADDING,
            y,
            Some(cw),
        );
        bottom = node.frame.bottom();
        y = bottom + HEADING_GAP;
        frame.append_child(node);
    }
    if let Some(body) = present(&content.body) {
        let node = ctx.text(
            "body",
            body,
            TextStyle::regular(28.0, TEXT_MUTED),
            PADDING,
            y,
            Some(cw),
        );
        bottom = node.frame.bottom();
        y = bottom + BODY_GAP;
        frame.append_child(node);
    }
    if let Some(mut image) = ctx
        .assets()
        .insert_optional(content.image.as_ref(), "image", cw as u32, cw as u32)
        .await?
    {
        image.scale_to_width(cw);
        image.set_position(PADDING, y);
        bottom = image.frame.bottom();
        frame.append_child(image);
    }

    frame.resize(w, bottom + PADDING);
    Ok(Some(frame))
}
