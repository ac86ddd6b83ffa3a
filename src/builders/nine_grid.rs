use crate::builders::{BuildContext, TEXT_DARK, present};
use crate::config::model::{NineGridContent, Prize};
use crate::foundation::color::Color;
use crate::foundation::core::{NodeFrame, center_offset};
use crate::foundation::error::PromoResult;
use crate::host::canvas::CanvasHost;
use crate::scene::node::{SceneNode, TextStyle};
use crate::slicing::protocol::Rasterizer;

const CELL: f64 = 200.0;
const GAP: f64 = 20.0;
const BOARD: f64 = 3.0 * CELL + 2.0 * GAP;
const FRAME_HEIGHT: f64 = 740.0;
const PRIZE_ART: f64 = 140.0;
const ACTION_CELL: usize = 4;
const CELL_FILL: Color = Color::rgba(1.0, 0.96, 0.88, 1.0);

/// Prize index shown in board cell `cell` (row-major, `0..=8`).
///
/// The center cell holds the action button and maps to no prize; cells after it shift down
/// by one so eight prizes fill the perimeter.
pub fn prize_for_cell(cell: usize) -> Option<usize> {
    match cell {
        ACTION_CELL => None,
        0..ACTION_CELL => Some(cell),
        5..=8 => Some(cell - 1),
        _ => None,
    }
}

/// 3×3 lottery board: eight prize cells around a center action cell.
pub(crate) async fn build<H: CanvasHost, R: Rasterizer>(
    ctx: &BuildContext<'_, H, R>,
    content: &NineGridContent,
) -> PromoResult<Option<SceneNode>> {
    if !content.has_content() {
        return Ok(None);
    }
    let w = ctx.page_width();
    let mut frame = SceneNode::frame("nineGrid", NodeFrame::sized(w, FRAME_HEIGHT));
    let mut board = SceneNode::frame(
        "board",
        NodeFrame::new(
            center_offset(w, BOARD),
            ((FRAME_HEIGHT - BOARD) * 0.5).floor(),
            BOARD,
            BOARD,
        ),
    );

    if let Some(mut background) = ctx
        .assets()
        .insert_optional(
            content.background.as_ref(),
            "boardBackground",
            BOARD as u32,
            BOARD as u32,
        )
        .await?
    {
        background.scale_to(BOARD, BOARD);
        background.set_position(0.0, 0.0);
        board.append_child(background);
    }

    for i in 0..9 {
        let col = (i % 3) as f64;
        let row = (i / 3) as f64;
        let mut cell = SceneNode::frame(
            format!("cell-{i}"),
            NodeFrame::new(col * (CELL + GAP), row * (CELL + GAP), CELL, CELL),
        )
        .with_fill(Some(CELL_FILL));
        match prize_for_cell(i) {
            None => action(ctx, content, &mut cell).await?,
            Some(p) => {
                if let Some(prize) = content.prizes.get(p) {
                    prize_cell(ctx, prize, &mut cell).await?;
                }
            }
        }
        board.append_child(cell);
    }

    frame.append_child(board);
    Ok(Some(frame))
}

async fn action<H: CanvasHost, R: Rasterizer>(
    ctx: &BuildContext<'_, H, R>,
    content: &NineGridContent,
    cell: &mut SceneNode,
) -> PromoResult<()> {
    if let Some(mut art) = ctx
        .assets()
        .insert_optional(
            content.action_image.as_ref(),
            "actionImage",
            CELL as u32,
            CELL as u32,
        )
        .await?
    {
        art.scale_to(CELL, CELL);
        art.set_position(0.0, 0.0);
        cell.append_child(art);
    } else if let Some(label) = present(&content.action_text) {
        let mut text = ctx.centered_text(
            "actionText",
            label,
            TextStyle::regular(40.0, TEXT_DARK).bold(),
            CELL,
            0.0,
        );
        text.frame.y = center_offset(CELL, text.frame.height);
        cell.append_child(text);
    }
    Ok(())
}

async fn prize_cell<H: CanvasHost, R: Rasterizer>(
    ctx: &BuildContext<'_, H, R>,
    prize: &Prize,
    cell: &mut SceneNode,
) -> PromoResult<()> {
    if let Some(mut art) = ctx
        .assets()
        .insert_optional(
            prize.image.as_ref(),
            "prizeImage",
            PRIZE_ART as u32,
            PRIZE_ART as u32,
        )
        .await?
    {
        art.scale_to(PRIZE_ART, PRIZE_ART);
        art.set_position(center_offset(CELL, PRIZE_ART), 12.0);
        cell.append_child(art);
    }
    if let Some(name) = present(&prize.name) {
        cell.append_child(ctx.centered_text(
            "prizeName",
            name,
            TextStyle::regular(24.0, TEXT_DARK),
            CELL,
            160.0,
        ));
    }
    Ok(())
}
