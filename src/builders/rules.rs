use crate::builders::{BuildContext, TEXT_DARK, TEXT_MUTED, present};
use crate::config::model::RulesContent;
use crate::foundation::core::NodeFrame;
use crate::foundation::error::PromoResult;
use crate::host::canvas::CanvasHost;
use crate::scene::node::{SceneNode, TextStyle};
use crate::slicing::protocol::Rasterizer;

const PADDING: f64 = 40.0;
const LINE_SPACING: f64 = 12.0;

pub(crate) async fn build<H: CanvasHost, R: Rasterizer>(
    ctx: &BuildContext<'_, H, R>,
    content: &RulesContent,
) -> PromoResult<Option<SceneNode>> {
    if !content.has_content() {
        return Ok(None);
    }
    let w = ctx.page_width();
    let cw = ctx.content_width(PADDING)?;
    let mut frame =
        SceneNode::frame("rules", NodeFrame::sized(w, 0.0)).with_fill(content.background_color);

    let mut y = PADDING;
    let mut bottom = PADDING;
    if let Some(heading) = present(&content.heading) {
        let node = ctx.text(
            "heading",
            heading,
            TextStyle::regular(32.0, TEXT_DARK).bold(),
            PADDING,
            y,
            Some(cw),
        );
        bottom = node.frame.bottom();
        y = bottom + LINE_SPACING;
        frame.append_child(node);
    }
    let lines = content
        .lines
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty());
    for (n, line) in lines.enumerate() {
        let node = ctx.text(
            &format!("line-{n}"),
            line,
            TextStyle::regular(24.0, TEXT_MUTED),
            PADDING,
            y,
            Some(cw),
        );
        bottom = node.frame.bottom();
        y = bottom + LINE_SPACING;
        frame.append_child(node);
    }

    frame.resize(w, bottom + PADDING);
    Ok(Some(frame))
}
