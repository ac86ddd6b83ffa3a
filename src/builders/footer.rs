use crate::builders::{BuildContext, TEXT_MUTED, present};
use crate::config::model::FooterContent;
use crate::foundation::core::{NodeFrame, center_offset};
use crate::foundation::error::PromoResult;
use crate::host::canvas::CanvasHost;
use crate::scene::node::{SceneNode, TextStyle};
use crate::slicing::protocol::Rasterizer;

const EDGE: f64 = 20.0;
const LOGO_GAP: f64 = 12.0;

/// Centered logo with fine print below; 20px above and below the content.
pub(crate) async fn build<H: CanvasHost, R: Rasterizer>(
    ctx: &BuildContext<'_, H, R>,
    content: &FooterContent,
) -> PromoResult<Option<SceneNode>> {
    if !content.has_content() {
        return Ok(None);
    }
    let w = ctx.page_width();
    let mut frame = SceneNode::frame("footer", NodeFrame::sized(w, 0.0));

    let mut y = EDGE;
    let mut bottom = EDGE;
    if let Some(mut logo) = ctx
        .assets()
        .insert_optional(content.logo.as_ref(), "logo", 200, 80)
        .await?
    {
        if logo.frame.width > w {
            logo.scale_to_width(w);
        }
        logo.set_position(center_offset(w, logo.frame.width), y);
        bottom = logo.frame.bottom();
        y = bottom + LOGO_GAP;
        frame.append_child(logo);
    }
    if let Some(text) = present(&content.text) {
        let node = ctx.centered_text("text", text, TextStyle::regular(20.0, TEXT_MUTED), w, y);
        bottom = node.frame.bottom();
        frame.append_child(node);
    }

    frame.resize(w, bottom + EDGE);
    Ok(Some(frame))
}
