use serde_json::json;

use super::*;

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

#[test]
fn empty_payloads_normalize_to_none() {
    assert!(ImagePayload::Bytes(vec![]).normalize(10, 10).unwrap().is_none());
    assert!(
        ImagePayload::Encoded("  ".to_string())
            .normalize(10, 10)
            .unwrap()
            .is_none()
    );
    assert!(ImagePayload::Bytes(vec![]).is_empty());
    assert!(!has_image(&None));
    assert!(!has_image(&Some(ImagePayload::Bytes(vec![]))));
}

#[test]
fn declared_dimensions_win_over_header() {
    let payload = ImagePayload::with_size(png_bytes(4, 3), 400, 300);
    let n = payload.normalize(1, 1).unwrap().unwrap();
    assert_eq!((n.width, n.height), (400, 300));
}

#[test]
fn raw_bytes_use_header_dimensions() {
    let n = ImagePayload::Bytes(png_bytes(7, 5))
        .normalize(1, 1)
        .unwrap()
        .unwrap();
    assert_eq!((n.width, n.height), (7, 5));
}

#[test]
fn unknown_format_falls_back_to_defaults() {
    let n = ImagePayload::Bytes(vec![1, 2, 3, 4])
        .normalize(64, 32)
        .unwrap()
        .unwrap();
    assert_eq!((n.width, n.height), (64, 32));
    assert_eq!(n.bytes.as_slice(), &[1, 2, 3, 4]);
}

#[test]
fn base64_and_data_urls_decode() {
    let raw = STANDARD.encode(png_bytes(2, 2));
    let n = ImagePayload::Encoded(raw.clone())
        .normalize(1, 1)
        .unwrap()
        .unwrap();
    assert_eq!((n.width, n.height), (2, 2));

    let url = format!("data:image/png;base64,{raw}");
    let n = ImagePayload::Encoded(url).normalize(1, 1).unwrap().unwrap();
    assert_eq!((n.width, n.height), (2, 2));

    assert!(
        ImagePayload::Encoded("not base64 !!".to_string())
            .normalize(1, 1)
            .is_err()
    );
}

#[test]
fn deserializes_all_shapes() {
    let p: ImagePayload = serde_json::from_value(json!([1, 2, 3])).unwrap();
    assert_eq!(p, ImagePayload::Bytes(vec![1, 2, 3]));

    let p: ImagePayload = serde_json::from_value(json!("AQID")).unwrap();
    assert_eq!(p, ImagePayload::Encoded("AQID".to_string()));

    let p: ImagePayload =
        serde_json::from_value(json!({"data": "AQID", "width": 10, "height": 20})).unwrap();
    let n = p.normalize(1, 1).unwrap().unwrap();
    assert_eq!(n.bytes.as_slice(), &[1, 2, 3]);
    assert_eq!((n.width, n.height), (10, 20));
}
