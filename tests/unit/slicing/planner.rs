use super::*;

fn assert_exact_cover(s: &SliceStrategy) {
    let tiles = s.tiles();
    assert_eq!(tiles.len() as u32, s.slices_count);
    let area: u64 = tiles
        .iter()
        .map(|t| u64::from(t.width) * u64::from(t.height))
        .sum();
    assert_eq!(area, u64::from(s.source_width) * u64::from(s.source_height));
    for (i, a) in tiles.iter().enumerate() {
        assert!(a.x + a.width <= s.source_width);
        assert!(a.y + a.height <= s.source_height);
        for b in &tiles[i + 1..] {
            let overlap_x = a.x < b.x + b.width && b.x < a.x + a.width;
            let overlap_y = a.y < b.y + b.height && b.y < a.y + a.height;
            assert!(!(overlap_x && overlap_y), "{a:?} overlaps {b:?}");
        }
    }
}

#[test]
fn fits_within_limit_is_single_slice() {
    for (w, h) in [(1, 1), (4096, 4096), (100, 4096), (4096, 7)] {
        let s = compute_slice_strategy(w, h, 4096);
        assert_eq!(s.direction, SliceDirection::None);
        assert_eq!(s.slices_count, 1);
        assert!(!s.needs_slicing());
        assert_exact_cover(&s);
    }
}

#[test]
fn wide_image_is_cut_vertically() {
    let s = compute_slice_strategy(5000, 2000, 4096);
    assert_eq!(s.direction, SliceDirection::Vertical);
    assert_eq!(s.tile_width, 3686);
    assert_eq!(s.tile_height, 2000);
    assert_eq!((s.cols, s.rows, s.slices_count), (2, 1, 2));
    assert_eq!(s.description, "vertical: 2 cols of 3686x2000");
    let tiles = s.tiles();
    assert_eq!(tiles[1].x, 3686);
    assert_eq!(tiles[1].width, 5000 - 3686);
    assert_exact_cover(&s);
}

#[test]
fn tall_image_is_cut_horizontally() {
    let s = compute_slice_strategy(750, 9000, 4096);
    assert_eq!(s.direction, SliceDirection::Horizontal);
    assert_eq!((s.tile_width, s.tile_height), (750, 3686));
    assert_eq!((s.cols, s.rows, s.slices_count), (1, 3, 3));
    assert!(s.description.starts_with("horizontal: 3 rows"));
    assert_exact_cover(&s);
}

#[test]
fn large_image_is_cut_both_ways() {
    let s = compute_slice_strategy(5000, 5000, 4096);
    assert_eq!(s.direction, SliceDirection::Both);
    assert_eq!((s.tile_width, s.tile_height), (3686, 3686));
    assert_eq!((s.cols, s.rows, s.slices_count), (2, 2, 4));
    assert!(s.description.contains("(4 slices)"));
    assert_exact_cover(&s);
}

#[test]
fn exact_multiples_have_no_sliver_tiles() {
    let s = compute_slice_strategy_with(200, 50, 100, &SliceOptions { safety_margin: 0.5 });
    assert_eq!(s.tile_width, 50);
    assert_eq!(s.cols, 4);
    assert!(s.tiles().iter().all(|t| t.width == 50));
    assert_exact_cover(&s);
}

#[test]
fn margin_is_overridable_and_sanitized() {
    let s = compute_slice_strategy_with(5000, 10, 4096, &SliceOptions { safety_margin: 1.0 });
    assert_eq!(s.tile_width, 4096);
    assert_eq!(s.cols, 2);

    let s = compute_slice_strategy_with(5000, 10, 4096, &SliceOptions { safety_margin: 7.0 });
    assert_eq!(s.tile_width, 3686);
}

#[test]
fn zero_area_has_no_slices() {
    let s = compute_slice_strategy(0, 100, 4096);
    assert_eq!(s.slices_count, 0);
    assert!(s.tiles().is_empty());
}

#[test]
fn strategy_is_deterministic() {
    assert_eq!(
        compute_slice_strategy(12345, 6789, 4096),
        compute_slice_strategy(12345, 6789, 4096)
    );
}
