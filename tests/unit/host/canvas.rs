use super::*;
use crate::foundation::color::Color;
use crate::foundation::core::NodeFrame;

const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 0, 0, 0];

#[tokio::test]
async fn creates_images_within_limits() {
    let host = MemoryHost::new();
    let img = host.create_image(PNG_MAGIC, 100, 50).await.unwrap();
    assert_eq!((img.width, img.height), (100, 50));
    assert_eq!(host.created_images(), vec![img]);
}

#[tokio::test]
async fn refuses_oversize_unknown_and_blocked_bytes() {
    let host = MemoryHost::new().with_max_image_size(64);
    assert!(host.create_image(PNG_MAGIC, 65, 10).await.is_err());
    assert!(host.create_image(&[1, 2, 3], 10, 10).await.is_err());
    assert!(host.create_image(&[], 10, 10).await.is_err());

    host.refuse(PNG_MAGIC);
    let err = host.create_image(PNG_MAGIC, 10, 10).await.unwrap_err();
    assert!(matches!(err, PromoError::AssetCreation(_)));
    assert!(host.created_images().is_empty());
}

#[tokio::test]
async fn accept_any_bytes_skips_header_check() {
    let host = MemoryHost::new().accept_any_bytes();
    assert!(host.create_image(&[1, 2, 3], 10, 10).await.is_ok());
}

#[test]
fn measures_single_line_and_wraps() {
    let style = TextStyle::regular(20.0, Color::BLACK);
    let one = measure_fixed_advance("abcd", &style, None);
    assert_eq!(one.width, 44.0);
    assert_eq!(one.height, style.line_height);

    let wrapped = measure_fixed_advance("abcdefghij", &style, Some(50.0));
    assert_eq!(wrapped.height, 3.0 * style.line_height);
    assert!(wrapped.width <= 50.0);

    let wide = measure_fixed_advance("游戏", &style, None);
    assert_eq!(wide.width, 40.0);

    let two = measure_fixed_advance("a\nb", &style, None);
    assert_eq!(two.height, 2.0 * style.line_height);
}

#[test]
fn attach_hands_over_the_tree() {
    let host = MemoryHost::new();
    host.attach(SceneNode::frame("root", NodeFrame::sized(1.0, 1.0)))
        .unwrap();
    assert_eq!(host.attached().len(), 1);
}
