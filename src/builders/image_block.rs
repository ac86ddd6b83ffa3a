use crate::builders::BuildContext;
use crate::config::model::ImageBlockContent;
use crate::foundation::core::NodeFrame;
use crate::foundation::error::PromoResult;
use crate::host::canvas::CanvasHost;
use crate::scene::node::SceneNode;
use crate::slicing::protocol::Rasterizer;

/// A single image at the module origin; wider images are scaled down to the page width.
pub(crate) async fn build<H: CanvasHost, R: Rasterizer>(
    ctx: &BuildContext<'_, H, R>,
    content: &ImageBlockContent,
) -> PromoResult<Option<SceneNode>> {
    let w = ctx.page_width();
    let Some(mut image) = ctx
        .assets()
        .insert_optional(content.image.as_ref(), "image", w as u32, w as u32)
        .await?
    else {
        return Ok(None);
    };
    if image.frame.width > w {
        image.scale_to_width(w);
    }
    image.set_position(0.0, 0.0);
    let frame = SceneNode::frame(
        "imageBlock",
        NodeFrame::sized(w, image.frame.height),
    )
    .with_child(image);
    Ok(Some(frame))
}
